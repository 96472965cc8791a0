use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use SheafDB::{DocStore, StoreError, GROWTH_STEP, MAX_ROOM, SLOT_HDR_SIZE};

#[test]
fn insert_read_roundtrip_with_padding() -> Result<()> {
    let path = unique_path("roundtrip");
    let mut store = DocStore::open(&path)?;

    let data = b"hello, sheaf document";
    let id = store.insert(data)?;
    assert_eq!(id, 0, "first document lands at offset 0");

    let payload = store.read(id).expect("document must be readable");
    assert_slot_payload(&payload, data);

    assert_eq!(store.used_size(), SLOT_HDR_SIZE + 2 * data.len() as u64);
    assert_eq!(store.size(), GROWTH_STEP, "small insert must not grow the file");
    store.flush()?;

    drop(store);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn inserts_land_at_increasing_offsets() -> Result<()> {
    let path = unique_path("offsets");
    let mut store = DocStore::open(&path)?;

    let a = b"first document body";
    let b = b"second";
    let c = vec![0xABu8; 100];

    let id_a = store.insert(a)?;
    let id_b = store.insert(b)?;
    let id_c = store.insert(&c)?;

    // id — это смещение слота: заголовок + room предыдущих слотов.
    assert_eq!(id_a, 0);
    assert_eq!(id_b, SLOT_HDR_SIZE + 2 * a.len() as u64);
    assert_eq!(id_c, id_b + SLOT_HDR_SIZE + 2 * b.len() as u64);
    assert_eq!(store.used_size(), id_c + SLOT_HDR_SIZE + 2 * c.len() as u64);

    assert_slot_payload(&store.read(id_a).expect("a"), a);
    assert_slot_payload(&store.read(id_b).expect("b"), b);
    assert_slot_payload(&store.read(id_c).expect("c"), &c);

    drop(store);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn empty_document_becomes_readable_after_next_insert() -> Result<()> {
    let path = unique_path("empty");
    let mut store = DocStore::open(&path)?;

    let empty_id = store.insert(b"")?;
    assert_eq!(store.used_size(), SLOT_HDR_SIZE);

    // Слот нулевого room в самом хвосте лежит за правой границей read:
    // видимы только смещения строго ниже used_size - заголовок.
    assert!(store.read(empty_id).is_none());

    let next_id = store.insert(b"x")?;
    assert_eq!(next_id, SLOT_HDR_SIZE);

    // После следующей вставки пустой слот попадает в диапазон.
    let payload = store.read(empty_id).expect("empty doc now visible");
    assert!(payload.is_empty(), "room 0 payload must be empty");

    let one = store.read(next_id).expect("one-byte doc");
    assert_eq!(one.len(), 2);
    assert_eq!(one[0], b'x');
    assert_eq!(one[1], b' ');

    drop(store);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn oversized_insert_is_rejected() -> Result<()> {
    let path = unique_path("oversized");
    let mut store = DocStore::open(&path)?;

    // room = 2 * len, значит на границе проходит ровно MAX_ROOM / 2.
    let at_cap = vec![b'q'; (MAX_ROOM / 2) as usize];
    let big = vec![b'z'; (MAX_ROOM / 2 + 1) as usize];

    let err = store.insert(&big).unwrap_err();
    let store_err = err.downcast_ref::<StoreError>().expect("typed store error");
    assert!(
        matches!(store_err, StoreError::TooLarge { len, max } if *len == MAX_ROOM / 2 + 1 && *max == MAX_ROOM),
        "unexpected error: {store_err:?}"
    );
    assert_eq!(store.used_size(), 0, "rejected insert must not consume space");

    let id = store.insert(&at_cap)?;
    assert_eq!(id, 0);
    let payload = store.read(id).expect("cap-sized doc must be readable");
    assert_eq!(payload.len() as u64, MAX_ROOM);
    assert_eq!(&payload[..at_cap.len()], &at_cap[..]);

    drop(store);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn read_tolerates_out_of_band_ids() -> Result<()> {
    let path = unique_path("oob");
    let mut store = DocStore::open(&path)?;

    // Пустое хранилище: любое смещение отвечает None, без ошибок.
    assert!(store.read(0).is_none());
    assert!(store.read(12_345).is_none());
    assert!(store.read(u64::MAX).is_none());

    let id = store.insert(b"alpha-doc")?;
    assert!(store.read(id).is_some());

    // Смещения внутри чужого заголовка или payload не дают валидного
    // validity-байта и отвечают None.
    assert!(store.read(id + 1).is_none());
    assert!(store.read(id + SLOT_HDR_SIZE).is_none());
    assert!(store.read(store.used_size()).is_none());

    drop(store);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn delete_is_idempotent_and_tolerant() -> Result<()> {
    let path = unique_path("delete");
    let mut store = DocStore::open(&path)?;

    let id = store.insert(b"to-be-removed")?;
    let used_before = store.used_size();

    store.delete(id);
    assert!(store.read(id).is_none(), "deleted doc must be unreadable");

    // Повторное удаление и мусорные смещения безвредны.
    store.delete(id);
    store.delete(9_999);
    store.delete(u64::MAX);
    assert_eq!(store.used_size(), used_before, "delete must not move used_size");

    // Место погашенного слота не переиспользуется, вставка идёт в хвост.
    let next = store.insert(b"fresh")?;
    assert_eq!(next, used_before);

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
    std::env::temp_dir().join(format!("sheafdb-basic-{}-{}-{}.sheaf", prefix, pid, t))
}

fn assert_slot_payload(payload: &[u8], content: &[u8]) {
    assert_eq!(
        payload.len(),
        content.len() * 2,
        "fresh slot room must be twice the content length"
    );
    assert_eq!(&payload[..content.len()], content, "content prefix must match");
    assert!(
        payload[content.len()..].iter().all(|&b| b == b' '),
        "slot tail must be space padding"
    );
}
