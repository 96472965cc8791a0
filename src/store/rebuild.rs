//! store/rebuild — офлайн-пересборка data-файла по живым документам.
//!
//! Читает исходное хранилище одним for_all и переносит каждый живой слот
//! в свежий файл с тем же room (payload копируется целиком, вместе с
//! заполнителем). Погашенные слоты и нечитаемые участки не переносятся,
//! так что пересборка одновременно уплотняет файл и отсекает повреждения.
//!
//! Смещения документов НЕ сохраняются: после уплотнения слоты лежат
//! плотно от нуля. Внешние индексы по старым id надо перестроить.
//! Исходный файл не меняется; целевой путь обязан быть свободен.

use std::path::Path;

use anyhow::{anyhow, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;

use super::core::DocStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebuildReport {
    /// Живые документы, перенесённые в новый файл.
    pub docs_copied: u64,
    /// Документы, сменившие смещение.
    pub remapped: u64,
    /// Повреждённые заголовки, встреченные в исходнике.
    pub corruptions: u64,
    /// Занятые байты исходного файла.
    pub bytes_in: u64,
    /// Занятые байты нового файла.
    pub bytes_out: u64,
}

/// Пересобирает src в новый файл по пути dst_path.
pub fn rebuild(src: &DocStore, dst_path: &Path, cfg: &StoreConfig) -> Result<RebuildReport> {
    if dst_path.exists() {
        return Err(anyhow!("rebuild target {} already exists", dst_path.display()));
    }
    let mut dst = DocStore::open_with_config(dst_path, cfg.clone())?;

    let mut report = RebuildReport {
        docs_copied: 0,
        remapped: 0,
        corruptions: 0,
        bytes_in: 0,
        bytes_out: 0,
    };
    let mut failure: Option<anyhow::Error> = None;

    let stats = src.for_all(|id, payload| {
        // Room переносится как есть: полезная нагрузка визитора и есть
        // все room байт слота.
        match dst.append_slot(payload.len() as u64, payload) {
            Ok(new_id) => {
                report.docs_copied += 1;
                if new_id != id {
                    report.remapped += 1;
                }
                true
            }
            Err(e) => {
                failure = Some(e);
                false
            }
        }
    });
    if let Some(e) = failure {
        return Err(e.context(format!("rebuild into {}", dst_path.display())));
    }
    dst.flush()?;

    report.corruptions = stats.corruptions;
    report.bytes_in = src.used_size();
    report.bytes_out = dst.used_size();

    info!(
        "rebuild {} -> {}: {} docs copied, {} corruptions dropped",
        src.name(),
        dst.name(),
        report.docs_copied,
        report.corruptions
    );
    Ok(report)
}
