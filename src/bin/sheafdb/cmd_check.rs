use anyhow::Result;
use std::path::PathBuf;

use SheafDB::store::DocStore;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let store = DocStore::open(&path)?;
    let report = store.check();

    if json {
        let s = serde_json::to_string_pretty(&report)?;
        println!("{}", s);
        return Ok(());
    }

    println!("Check report for {}:", report.name);
    println!("  size            = {}", report.size);
    println!("  used_size       = {}", report.used_size);
    println!("  docs_valid      = {}", report.docs_valid);
    println!("  slots_deleted   = {}", report.slots_deleted);
    println!("  corruptions     = {}", report.corruptions);
    println!("  resync_bytes    = {}", report.resync_bytes);
    println!("  live_room_bytes = {}", report.live_room_bytes);
    println!("  dead_room_bytes = {}", report.dead_room_bytes);
    if report.is_clean() {
        println!("OK: no corruption found");
    } else {
        println!("WARNING: {} corrupted headers", report.corruptions);
    }
    Ok(())
}
