//! store — документный слой поверх data-файла
//!
//! Разделение по подмодулям:
//! - core.rs    — базовый тип (DocStore), открытие, общие хелперы заголовка
//! - ops.rs     — одиночные операции (insert/read/update/delete)
//! - scan.rs    — последовательный скан for_all с ресинхронизацией
//! - check.rs   — интегрити-скан с отчётом (без записи)
//! - rebuild.rs — офлайн-пересборка файла по живым документам

pub mod check;
pub mod core;
pub mod ops;
pub mod rebuild;
pub mod scan;

pub use check::CheckReport;
pub use core::DocStore;
pub use rebuild::{rebuild, RebuildReport};
pub use scan::ScanStats;
