//! store/scan — последовательный обход слотов с ресинхронизацией.
//!
//! Скан идёт от нулевого смещения до used_size. Заголовок с мусорным
//! validity-байтом или неправдоподобным room считается повреждённым:
//! событие логируется, курсор двигается побайтово до следующего байта,
//! похожего на validity-тег, и разбор продолжается. Повреждение никогда
//! не валит скан, теряется только сам нечитаемый слот.

use log::{error, warn};

use crate::consts::{MAX_ROOM, SLOT_HDR_SIZE, SLOT_INVALID, SLOT_VALID};
use crate::metrics::record_scan_corruption;

use super::core::{slot_header_at, DocStore};

/// Итог одного прохода for_all.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Живые документы, отданные визитору.
    pub visited: u64,
    /// Погашенные слоты, пропущенные молча.
    pub deleted: u64,
    /// Повреждённые заголовки.
    pub corruptions: u64,
    /// Байты, пройденные побайтовой ресинхронизацией.
    pub resync_bytes: u64,
    /// Суммарный room живых слотов.
    pub live_room_bytes: u64,
    /// Суммарный room погашенных слотов.
    pub dead_room_bytes: u64,
    /// Визитор остановил скан до конца занятой области.
    pub stopped_early: bool,
}

impl DocStore {
    /// Обходит все слоты по порядку смещений и зовёт визитор для каждого
    /// живого документа: visit(id, payload). Возврат false останавливает
    /// скан немедленно, дальнейшие документы не посещаются.
    ///
    /// Визитор получает срез payload прямо из отображения файла (все room
    /// байт, контент + заполнитель). Хранилище на время скана заимствовано
    /// по &self, так что мутировать его изнутри визитора не выйдет.
    pub fn for_all<F>(&self, mut visit: F) -> ScanStats
    where
        F: FnMut(u64, &[u8]) -> bool,
    {
        let mut stats = ScanStats::default();
        let buf = self.file.bytes();
        let used = self.used_size();
        let size = self.size();

        let mut addr: u64 = 0;
        loop {
            if used < SLOT_HDR_SIZE || addr >= used - SLOT_HDR_SIZE {
                break;
            }
            let (validity, room) = slot_header_at(buf, addr);

            // Структурная проверка заголовка; у живого слота payload
            // обязан помещаться в файл.
            let sound = (validity == SLOT_VALID || validity == SLOT_INVALID) && room <= MAX_ROOM;
            if !sound || (validity == SLOT_VALID && addr + SLOT_HDR_SIZE + room > size) {
                error!("corrupted document header at {} in {}", addr, self.name());
                let from = addr;
                let limit = used - SLOT_HDR_SIZE;
                addr += 1;
                while addr < limit
                    && buf[addr as usize] != SLOT_VALID
                    && buf[addr as usize] != SLOT_INVALID
                {
                    addr += 1;
                }
                let skipped = addr - from;
                stats.corruptions += 1;
                stats.resync_bytes += skipped;
                record_scan_corruption(skipped);
                warn!(
                    "corrupted document skipped, scan resumed at {} in {}",
                    addr,
                    self.name()
                );
                continue;
            }

            if validity == SLOT_VALID {
                stats.visited += 1;
                stats.live_room_bytes += room;
                let start = (addr + SLOT_HDR_SIZE) as usize;
                if !visit(addr, &buf[start..start + room as usize]) {
                    stats.stopped_early = true;
                    break;
                }
            } else {
                stats.deleted += 1;
                stats.dead_room_bytes += room;
            }
            addr += SLOT_HDR_SIZE + room;
        }
        stats
    }
}
