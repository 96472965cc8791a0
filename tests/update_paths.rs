use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use SheafDB::{DocStore, StoreError, MAX_ROOM, SLOT_HDR_SIZE};

#[test]
fn update_within_room_keeps_id() -> Result<()> {
    let path = unique_path("inplace");
    let mut store = DocStore::open(&path)?;

    let id = store.insert(b"0123456789")?; // room 20
    let used_before = store.used_size();

    // Короче исходного: префикс перезаписан, хвост добит заполнителем.
    let new_id = store.update(id, b"tiny")?;
    assert_eq!(new_id, id, "update within room must keep the id");
    let payload = store.read(id).expect("doc");
    assert_eq!(payload.len(), 20, "room never changes after insert");
    assert_eq!(&payload[..4], b"tiny");
    assert!(payload[4..].iter().all(|&b| b == b' '));

    // Ровно в room: заполнителя не остаётся.
    let exact = b"ABCDEFGHIJKLMNOPQRST";
    let new_id = store.update(id, exact)?;
    assert_eq!(new_id, id);
    let payload = store.read(id).expect("doc");
    assert_eq!(&payload[..], &exact[..]);

    assert_eq!(store.used_size(), used_before, "in-place update must not grow the file");

    drop(store);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn update_beyond_room_relocates() -> Result<()> {
    let path = unique_path("relocate");
    let mut store = DocStore::open(&path)?;

    let id = store.insert(b"0123456789")?; // room 20
    let used_before = store.used_size();

    let bigger = b"ABCDEFGHIJKLMNOPQRSTU"; // 21 > room
    let new_id = store.update(id, bigger)?;
    assert_ne!(new_id, id, "oversized update must relocate");
    assert_eq!(new_id, used_before, "relocated doc is appended at the old used_size");

    assert!(store.read(id).is_none(), "old slot must be dead");
    let payload = store.read(new_id).expect("relocated doc");
    assert_eq!(payload.len(), bigger.len() * 2);
    assert_eq!(&payload[..bigger.len()], &bigger[..]);

    // Скан видит один живой документ и один погашенный слот.
    let stats = store.for_all(|_, _| true);
    assert_eq!(stats.visited, 1);
    assert_eq!(stats.deleted, 1);

    drop(store);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn update_missing_is_not_found() -> Result<()> {
    let path = unique_path("notfound");
    let mut store = DocStore::open(&path)?;

    // Пустое хранилище.
    let err = store.update(0, b"x").unwrap_err();
    assert_not_found(&err, 0);

    let id = store.insert(b"abcdef")?;

    // Смещение мимо заголовка слота.
    let err = store.update(id + 1, b"x").unwrap_err();
    assert_not_found(&err, id + 1);

    // За занятой областью.
    let err = store.update(id + 999, b"x").unwrap_err();
    assert_not_found(&err, id + 999);

    // Погашенный слот.
    store.delete(id);
    let err = store.update(id, b"x").unwrap_err();
    assert_not_found(&err, id);

    drop(store);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn update_larger_than_cap_fails_before_lookup() -> Result<()> {
    let path = unique_path("cap");
    let mut store = DocStore::open(&path)?;

    let id = store.insert(b"keep me intact")?;
    let huge = vec![b'y'; (MAX_ROOM + 1) as usize];

    let err = store.update(id, &huge).unwrap_err();
    let store_err = err.downcast_ref::<StoreError>().expect("typed store error");
    assert!(matches!(store_err, StoreError::TooLarge { .. }), "unexpected: {store_err:?}");

    // Проверка размера идёт до каких-либо записей: документ цел.
    let payload = store.read(id).expect("doc survives the rejected update");
    assert_eq!(&payload[..14], b"keep me intact");

    drop(store);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn relocation_to_oversized_content_loses_the_slot() -> Result<()> {
    let path = unique_path("lossy");
    let mut store = DocStore::open(&path)?;

    let id = store.insert(b"small")?; // room 10

    // Контент в пределах MAX_ROOM проходит первую проверку, но требует
    // room = 2 * len > MAX_ROOM. Переезд начинается с гашения старого
    // слота, и неудачная вставка оставляет документ удалённым.
    // Вызывающий, которому важен контент, обязан проверять размер заранее.
    let big = vec![b'y'; (MAX_ROOM / 2 + 1) as usize];
    let err = store.update(id, &big).unwrap_err();
    let store_err = err.downcast_ref::<StoreError>().expect("typed store error");
    assert!(matches!(store_err, StoreError::TooLarge { .. }));

    assert!(store.read(id).is_none(), "slot is already dead after the failed relocation");
    assert_eq!(
        store.used_size(),
        SLOT_HDR_SIZE + 10,
        "failed relocation must not append anything"
    );

    drop(store);
    let _ = fs::remove_file(&path);
    Ok(())
}

fn unique_path(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sheafdb-update-{}-{}-{}.sheaf", prefix, pid, t))
}

fn assert_not_found(err: &anyhow::Error, expected_id: u64) {
    let store_err = err.downcast_ref::<StoreError>().expect("typed store error");
    assert!(
        matches!(store_err, StoreError::NotFound { id, .. } if *id == expected_id),
        "unexpected error: {store_err:?}"
    );
}
