//! store/core — структура DocStore, открытие, общие хелперы заголовка слота.
//!
//! Идентификатор документа - байтовое смещение его слота в data-файле.
//! Сам слой ничего не знает о содержимом: payload хранится как есть,
//! длина контента не записывается, хвост слота добит PAD_BYTE.

use std::path::Path;

use anyhow::Result;

use crate::config::{StoreBuilder, StoreConfig};
use crate::consts::ROOM_FIELD_LEN;
use crate::datafile::DataFile;
use crate::varint::read_uvarint;

pub struct DocStore {
    pub(crate) file: DataFile,
}

impl DocStore {
    /// Открывает хранилище с конфигом из окружения.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(path, StoreConfig::from_env())
    }

    pub fn open_with_config(path: &Path, cfg: StoreConfig) -> Result<Self> {
        let file = DataFile::open(path, &cfg)?;
        Ok(Self { file })
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// Метка хранилища для диагностических сообщений.
    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Выделенный размер data-файла (байт).
    pub fn size(&self) -> u64 {
        self.file.size()
    }

    /// High-water mark занятых байт; растёт монотонно.
    pub fn used_size(&self) -> u64 {
        self.file.used_size()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()
    }
}

impl Drop for DocStore {
    fn drop(&mut self) {
        // Ошибки игнорируем в Drop.
        let _ = self.file.flush();
    }
}

/// Читает заголовок слота по смещению addr: (validity, room).
///
/// Поле room декодируется из фиксированного окна ROOM_FIELD_LEN байт;
/// нечитаемое значение (обрыв или переполнение uvarint) отдаётся как 0,
/// дальше решают проверки вызывающего кода. Вызывающий гарантирует
/// addr + 1 + ROOM_FIELD_LEN <= buf.len().
pub(crate) fn slot_header_at(buf: &[u8], addr: u64) -> (u8, u64) {
    let a = addr as usize;
    let validity = buf[a];
    let room = read_uvarint(&buf[a + 1..a + 1 + ROOM_FIELD_LEN])
        .map(|(v, _)| v)
        .unwrap_or(0);
    (validity, room)
}
