//! LE base-128 uvarint (кодек поля room в заголовке слота).
//!
//! Кодирование младшими семибитными группами вперёд, бит продолжения 0x80.
//! Поле в заголовке фиксированной длины (ROOM_FIELD_LEN), поэтому декодер
//! обязан переживать произвольный мусор: обрыв и переполнение отдаются
//! как None, а не как ошибка.

/// Пишет x в начало buf, возвращает число занятых байт (1..=10).
///
/// Паникует, если buf короче, чем нужно значению. Для поля заголовка
/// слота (10 байт) места хватает любому u64.
pub fn write_uvarint(buf: &mut [u8], mut x: u64) -> usize {
    let mut i = 0usize;
    while x >= 0x80 {
        buf[i] = (x as u8) | 0x80;
        x >>= 7;
        i += 1;
    }
    buf[i] = x as u8;
    i + 1
}

/// Читает uvarint из начала buf.
///
/// Some((значение, длина)) при успехе; байты после терминатора не
/// трогаются. None, если терминатор не встретился до конца buf или
/// значение не влезает в u64.
pub fn read_uvarint(buf: &[u8]) -> Option<(u64, usize)> {
    let mut x = 0u64;
    let mut shift = 0u32;
    for (i, &b) in buf.iter().enumerate() {
        if i == 10 {
            // 11-й байт у u64 невозможен
            return None;
        }
        if b < 0x80 {
            if i == 9 && b > 1 {
                return None;
            }
            return Some((x | (b as u64) << shift, i + 1));
        }
        x |= ((b & 0x7f) as u64) << shift;
        shift += 7;
    }
    None
}
