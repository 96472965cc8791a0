#![allow(non_snake_case)]

// Базовые модули
pub mod consts;
pub mod varint;
pub mod errors;
pub mod metrics;
pub mod config;

// Модульная раскладка (папки с mod.rs)
pub mod datafile; // src/datafile/mod.rs
pub mod store;    // src/store/{mod,core,ops,scan,check,rebuild}.rs

// Удобные реэкспорты
pub use config::{StoreBuilder, StoreConfig};
pub use datafile::DataFile;
pub use errors::StoreError;
pub use store::{rebuild, CheckReport, DocStore, RebuildReport, ScanStats};

pub use consts::{GROWTH_STEP, MAX_ROOM, SLOT_HDR_SIZE};
