//! store/ops — одиночные операции над документами.
//!
//! Политика room: insert выделяет room = 2 * len, запас под будущий
//! in-place update. Update в пределах room перезаписывает префикс и
//! заново добивает хвост заполнителем, id не меняется; больший контент
//! переезжает (delete старого слота + свежий insert). Room слота после
//! вставки не меняется никогда.

use anyhow::Result;

use crate::consts::{MAX_ROOM, PAD_BYTE, PAD_RUN, ROOM_FIELD_LEN, SLOT_HDR_SIZE, SLOT_INVALID, SLOT_VALID};
use crate::errors::StoreError;
use crate::metrics::{
    record_doc_delete, record_doc_insert, record_doc_read, record_doc_relocated,
    record_doc_update_inplace,
};
use crate::varint::write_uvarint;

use super::core::{slot_header_at, DocStore};

// Преднабранный прогон заполнителя.
const PAD_CHUNK: [u8; PAD_RUN] = [PAD_BYTE; PAD_RUN];

/// Добивает диапазон заполнителем, порциями по PAD_RUN байт.
fn write_padding(gap: &mut [u8]) {
    for seg in gap.chunks_mut(PAD_CHUNK.len()) {
        seg.copy_from_slice(&PAD_CHUNK[..seg.len()]);
    }
}

impl DocStore {
    /// Читает документ по id. None - нормальный ответ для отсутствующего,
    /// удалённого или нечитаемого слота, ошибок здесь не бывает.
    ///
    /// Возвращаются все room байт слота (контент + заполнитель): слой не
    /// хранит длину контента, усечение - забота вызывающего кода.
    pub fn read(&self, id: u64) -> Option<Vec<u8>> {
        let used = self.used_size();
        if used < SLOT_HDR_SIZE || id >= used - SLOT_HDR_SIZE {
            return None;
        }
        let buf = self.file.bytes();
        let (validity, room) = slot_header_at(buf, id);
        if validity != SLOT_VALID {
            return None;
        }
        if room > MAX_ROOM {
            return None;
        }
        let doc_end = id + SLOT_HDR_SIZE + room;
        if doc_end >= self.size() {
            return None;
        }
        record_doc_read();
        Some(buf[(id + SLOT_HDR_SIZE) as usize..doc_end as usize].to_vec())
    }

    /// Вставляет документ, возвращает его id (смещение слота).
    ///
    /// Контент длиннее MAX_ROOM / 2 отклоняется как TooLarge, used_size
    /// при этом не меняется. Нехватка места в файле - фатальная ошибка
    /// роста, уходит вызывающему как есть.
    pub fn insert(&mut self, data: &[u8]) -> Result<u64> {
        let room = (data.len() as u64) * 2;
        if room > MAX_ROOM {
            return Err(StoreError::TooLarge {
                len: data.len() as u64,
                max: MAX_ROOM,
            }
            .into());
        }
        let id = self.append_slot(room, data)?;
        record_doc_insert();
        Ok(id)
    }

    /// Дописывает слот заданной ёмкости в конец занятой области.
    ///
    /// used_size продвигается до записи байтов: заголовок и payload ложатся
    /// в свежий, никем не занятый диапазон. Вызывающий гарантирует
    /// data.len() <= room.
    pub(crate) fn append_slot(&mut self, room: u64, data: &[u8]) -> Result<u64> {
        debug_assert!(data.len() as u64 <= room);
        let id = self.used_size();
        let slot_size = SLOT_HDR_SIZE + room;
        self.file.ensure_capacity(slot_size)?;
        self.file.set_used_size(id + slot_size);

        let a = id as usize;
        let hdr = SLOT_HDR_SIZE as usize;
        let buf = self.file.bytes_mut();
        buf[a] = SLOT_VALID;
        write_uvarint(&mut buf[a + 1..a + 1 + ROOM_FIELD_LEN], room);
        let payload = &mut buf[a + hdr..a + hdr + room as usize];
        payload[..data.len()].copy_from_slice(data);
        write_padding(&mut payload[data.len()..]);
        Ok(id)
    }

    /// Обновляет документ, возвращает его новый id.
    ///
    /// Контент в пределах room слота перезаписывается на месте (id
    /// сохраняется), больший переезжает в новый слот. Любое из условий
    /// отсутствия (смещение вне занятой области, невалидный слот,
    /// нечитаемый room) - ошибка NotFound: в отличие от read, вызывающий
    /// update рассчитывает на существующий документ.
    pub fn update(&mut self, id: u64, data: &[u8]) -> Result<u64> {
        let len = data.len() as u64;
        if len > MAX_ROOM {
            return Err(StoreError::TooLarge { len, max: MAX_ROOM }.into());
        }
        let used = self.used_size();
        if used < SLOT_HDR_SIZE || id >= used - SLOT_HDR_SIZE {
            return Err(self.not_found(id));
        }
        let (validity, room) = slot_header_at(self.file.bytes(), id);
        if validity != SLOT_VALID {
            return Err(self.not_found(id));
        }
        if room > MAX_ROOM || id + room >= used {
            return Err(self.not_found(id));
        }

        if len <= room {
            let end = id + SLOT_HDR_SIZE + room;
            if end > self.size() {
                // room прошёл грубые проверки, но перезапись вышла бы
                // за файл: заголовок считается повреждённым.
                return Err(self.not_found(id));
            }
            let a = (id + SLOT_HDR_SIZE) as usize;
            let buf = self.file.bytes_mut();
            buf[a..a + data.len()].copy_from_slice(data);
            write_padding(&mut buf[a + data.len()..a + room as usize]);
            record_doc_update_inplace();
            return Ok(id);
        }

        // Room не хватает: слот гасится, контент вставляется заново.
        // Старое место этим слоем не переиспользуется.
        self.delete(id);
        let new_id = self.insert(data)?;
        record_doc_relocated();
        Ok(new_id)
    }

    /// Удаляет документ: гасит validity-байт слота.
    ///
    /// Идемпотентно и терпимо к мусорным id: выход за занятую область и
    /// уже погашенные слоты молча игнорируются.
    pub fn delete(&mut self, id: u64) {
        let used = self.used_size();
        if used < SLOT_HDR_SIZE || id >= used - SLOT_HDR_SIZE {
            return;
        }
        let buf = self.file.bytes_mut();
        if buf[id as usize] == SLOT_VALID {
            buf[id as usize] = SLOT_INVALID;
            record_doc_delete();
        }
    }

    fn not_found(&self, id: u64) -> anyhow::Error {
        StoreError::NotFound {
            id,
            name: self.name().to_string(),
        }
        .into()
    }
}
