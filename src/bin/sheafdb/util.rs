use anyhow::{anyhow, Context, Result};
use std::io::Read;
use std::path::Path;

/// Срезает хвост заполнителя для человекочитаемого вывода.
/// Контент, сам оканчивающийся пробелами, при этом тоже обрежется -
/// точную длину знает только вызывающий код уровнем выше.
pub fn trim_pad(payload: &[u8]) -> &[u8] {
    let end = payload
        .iter()
        .rposition(|&b| b != b' ')
        .map(|i| i + 1)
        .unwrap_or(0);
    &payload[..end]
}

/// Содержимое документа из аргумента командной строки:
/// `-` читает stdin, `@path` читает файл, `hex:..` декодирует hex,
/// всё остальное берётся как литеральные байты.
pub fn resolve_content(arg: &str) -> Result<Vec<u8>> {
    if arg == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("read content from stdin")?;
        return Ok(buf);
    }
    if let Some(p) = arg.strip_prefix('@') {
        return read_content_file(Path::new(p));
    }
    if let Some(hx) = arg.strip_prefix("hex:") {
        return decode_hex(hx);
    }
    Ok(arg.as_bytes().to_vec())
}

pub fn read_content_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read content file {}", path.display()))
}

pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    if s.len() % 2 != 0 {
        return Err(anyhow!("odd-length hex string"));
    }
    s.as_bytes()
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let digits = std::str::from_utf8(pair)
                .map_err(|_| anyhow!("invalid hex at pos {}", i * 2))?;
            u8::from_str_radix(digits, 16).map_err(|_| anyhow!("invalid hex at pos {}", i * 2))
        })
        .collect()
}

pub fn display_text(bytes: &[u8]) -> String {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .unwrap_or_else(|_| format!("(binary {} B)", bytes.len()))
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .chunks(16)
        .map(|line| {
            line.iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
