//! Lightweight global metrics for SheafDB.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Документные операции (insert/read/update/delete)
//! - Сканирование и восстановление после повреждений
//! - Рост data-файла

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Documents -----
static DOCS_INSERTED: AtomicU64 = AtomicU64::new(0);
static DOCS_READ: AtomicU64 = AtomicU64::new(0);
static DOCS_UPDATED_INPLACE: AtomicU64 = AtomicU64::new(0);
static DOCS_RELOCATED: AtomicU64 = AtomicU64::new(0);
static DOCS_DELETED: AtomicU64 = AtomicU64::new(0);

// ----- Scan -----
static SCAN_CORRUPTIONS: AtomicU64 = AtomicU64::new(0);
static SCAN_RESYNC_BYTES: AtomicU64 = AtomicU64::new(0);

// ----- Data file -----
static FILE_GROWTHS: AtomicU64 = AtomicU64::new(0);
static FILE_GROWTH_BYTES: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    // Documents
    pub docs_inserted: u64,
    pub docs_read: u64,
    pub docs_updated_inplace: u64,
    pub docs_relocated: u64,
    pub docs_deleted: u64,

    // Scan
    pub scan_corruptions: u64,
    pub scan_resync_bytes: u64,

    // Data file
    pub file_growths: u64,
    pub file_growth_bytes: u64,
}

impl MetricsSnapshot {
    /// Share of updates served in place (without relocation).
    pub fn inplace_update_ratio(&self) -> f64 {
        let total = self.docs_updated_inplace + self.docs_relocated;
        if total == 0 {
            0.0
        } else {
            self.docs_updated_inplace as f64 / total as f64
        }
    }
}

// ----- Recorders (Documents) -----
pub fn record_doc_insert() {
    DOCS_INSERTED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_doc_read() {
    DOCS_READ.fetch_add(1, Ordering::Relaxed);
}

pub fn record_doc_update_inplace() {
    DOCS_UPDATED_INPLACE.fetch_add(1, Ordering::Relaxed);
}

pub fn record_doc_relocated() {
    DOCS_RELOCATED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_doc_delete() {
    DOCS_DELETED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Scan) -----
pub fn record_scan_corruption(resync_bytes: u64) {
    SCAN_CORRUPTIONS.fetch_add(1, Ordering::Relaxed);
    SCAN_RESYNC_BYTES.fetch_add(resync_bytes, Ordering::Relaxed);
}

// ----- Recorders (Data file) -----
pub fn record_file_growth(bytes: u64) {
    FILE_GROWTHS.fetch_add(1, Ordering::Relaxed);
    FILE_GROWTH_BYTES.fetch_add(bytes, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        docs_inserted: DOCS_INSERTED.load(Ordering::Relaxed),
        docs_read: DOCS_READ.load(Ordering::Relaxed),
        docs_updated_inplace: DOCS_UPDATED_INPLACE.load(Ordering::Relaxed),
        docs_relocated: DOCS_RELOCATED.load(Ordering::Relaxed),
        docs_deleted: DOCS_DELETED.load(Ordering::Relaxed),

        scan_corruptions: SCAN_CORRUPTIONS.load(Ordering::Relaxed),
        scan_resync_bytes: SCAN_RESYNC_BYTES.load(Ordering::Relaxed),

        file_growths: FILE_GROWTHS.load(Ordering::Relaxed),
        file_growth_bytes: FILE_GROWTH_BYTES.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    DOCS_INSERTED.store(0, Ordering::Relaxed);
    DOCS_READ.store(0, Ordering::Relaxed);
    DOCS_UPDATED_INPLACE.store(0, Ordering::Relaxed);
    DOCS_RELOCATED.store(0, Ordering::Relaxed);
    DOCS_DELETED.store(0, Ordering::Relaxed);

    SCAN_CORRUPTIONS.store(0, Ordering::Relaxed);
    SCAN_RESYNC_BYTES.store(0, Ordering::Relaxed);

    FILE_GROWTHS.store(0, Ordering::Relaxed);
    FILE_GROWTH_BYTES.store(0, Ordering::Relaxed);
}
