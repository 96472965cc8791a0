//! Общие константы формата data-файла (слоты документов).

// -------- Слот документа --------
// Layout:
// [validity u8]      -- SLOT_VALID / SLOT_INVALID
// [room uvarint]     -- ёмкость слота, фиксированное поле ROOM_FIELD_LEN байт
// [payload room]     -- содержимое + хвост из PAD_BYTE
//
// Total header size = 1 + 10 = 11 bytes.
pub const SLOT_VALID: u8 = 1;
pub const SLOT_INVALID: u8 = 0;
pub const ROOM_FIELD_LEN: usize = 10;
pub const SLOT_HDR_SIZE: u64 = 11;

// Ёмкость слота не превышает MAX_ROOM; заголовок с большим значением
// трактуется как повреждённый.
pub const MAX_ROOM: u64 = 512 * 1024;

// -------- Data-файл --------
// Файл растёт кратно GROWTH_STEP (переопределяется конфигом).
pub const GROWTH_STEP: u64 = 512 * 1024;

// Заполнитель хвоста слота. Пишется прогонами по PAD_RUN байт.
pub const PAD_BYTE: u8 = b' ';
pub const PAD_RUN: usize = 2048;
