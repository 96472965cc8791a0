//! store/check — интегрити-скан data-файла (только чтение).
//!
//! Тот же for_all, но без полезной работы в визиторе: после аварийной
//! остановки или подозрения на битый файл отчёт показывает, сколько
//! слотов читается, сколько погашено и сколько байт потеряно на
//! ресинхронизации. Файл не правится.

use serde::{Deserialize, Serialize};

use super::core::DocStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub name: String,
    pub size: u64,
    pub used_size: u64,
    pub docs_valid: u64,
    pub slots_deleted: u64,
    pub corruptions: u64,
    pub resync_bytes: u64,
    pub live_room_bytes: u64,
    pub dead_room_bytes: u64,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.corruptions == 0
    }
}

impl DocStore {
    /// Полный проход по слотам со сбором счётчиков.
    pub fn check(&self) -> CheckReport {
        let stats = self.for_all(|_, _| true);
        CheckReport {
            name: self.name().to_string(),
            size: self.size(),
            used_size: self.used_size(),
            docs_valid: stats.visited,
            slots_deleted: stats.deleted,
            corruptions: stats.corruptions,
            resync_bytes: stats.resync_bytes,
            live_room_bytes: stats.live_room_bytes,
            dead_room_bytes: stats.dead_room_bytes,
        }
    }
}
