use anyhow::Result;
use std::path::PathBuf;

use SheafDB::store::DocStore;

use super::util::{display_text, to_hex, trim_pad};

pub fn exec(path: PathBuf, limit: Option<u64>, json: bool) -> Result<()> {
    let store = DocStore::open(&path)?;
    let cap = limit.unwrap_or(u64::MAX);
    let mut seen = 0u64;

    let stats = store.for_all(|id, payload| {
        if seen >= cap {
            return false;
        }
        if json {
            println!(
                "{{\"id\":{},\"room\":{},\"payload_hex\":\"{}\"}}",
                id,
                payload.len(),
                to_hex(payload)
            );
        } else {
            let content = trim_pad(payload);
            println!(
                "id={} room={} B -> '{}' ({} B)",
                id,
                payload.len(),
                display_text(content),
                content.len()
            );
        }
        seen += 1;
        seen < cap
    });

    if !json {
        if seen == 0 {
            println!("(no documents)");
        }
        if stats.stopped_early {
            println!("(stopped after {} documents)", seen);
        }
        if stats.corruptions > 0 {
            println!("({} corrupted headers skipped)", stats.corruptions);
        }
    }
    Ok(())
}
