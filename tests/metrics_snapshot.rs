// tests/metrics_snapshot.rs
//
// Глобальные счётчики метрик. Файл намеренно содержит один тест: счётчики
// общие на процесс, параллельные тесты в одном бинаре смешали бы цифры.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use SheafDB::config::StoreConfig;
use SheafDB::{metrics, DocStore};

#[test]
fn metrics_reflect_document_operations() -> Result<()> {
    let path = unique_path("metrics");
    let cfg = StoreConfig::default().with_growth_step(4096);

    metrics::reset();
    let mut store = DocStore::open_with_config(&path, cfg)?;

    let id_a = store.insert(&vec![b'a'; 10])?;
    let id_b = store.insert(&vec![b'b'; 20])?;
    let _id_c = store.insert(&vec![b'c'; 30])?;

    let m = metrics::snapshot();
    assert_eq!(m.docs_inserted, 3);

    // Успешные чтения считаются, промахи нет.
    assert!(store.read(id_a).is_some());
    assert!(store.read(id_b).is_some());
    assert!(store.read(99_999).is_none());
    let m = metrics::snapshot();
    assert_eq!(m.docs_read, 2);

    // In-place update: контент в пределах room 20.
    let same = store.update(id_a, &vec![b'x'; 10])?;
    assert_eq!(same, id_a);

    // Переезд: контент больше room. Физическая вставка и гашение
    // старого слота тоже попадают в счётчики.
    let moved = store.update(id_a, &vec![b'y'; 21])?;
    assert_ne!(moved, id_a);

    store.delete(id_b);
    store.delete(id_b); // повторное гашение не считается

    let m = metrics::snapshot();
    assert_eq!(m.docs_updated_inplace, 1);
    assert_eq!(m.docs_relocated, 1);
    assert_eq!(m.docs_inserted, 4);
    assert_eq!(m.docs_deleted, 2);
    assert!((m.inplace_update_ratio() - 0.5).abs() < 1e-9);

    // Мелкие документы умещаются в первый шаг файла.
    assert_eq!(m.file_growths, 0);

    // Слот на 6011 байт не влезает в 4096: один рост на один шаг.
    store.insert(&vec![b'g'; 3_000])?;
    let m = metrics::snapshot();
    assert_eq!(m.file_growths, 1);
    assert_eq!(m.file_growth_bytes, 4096);
    assert_eq!(store.size(), 8192);

    // Чистый скан не двигает счётчики повреждений.
    let _ = store.for_all(|_, _| true);
    let m = metrics::snapshot();
    assert_eq!(m.scan_corruptions, 0);
    assert_eq!(m.scan_resync_bytes, 0);

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
    std::env::temp_dir().join(format!("sheafdb-{}-{}-{}.sheaf", prefix, pid, t))
}
