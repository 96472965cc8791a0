use anyhow::Result;
use std::path::PathBuf;

use SheafDB::metrics;
use SheafDB::store::DocStore;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let store = DocStore::open(&path)?;
    let size = store.size();
    let used = store.used_size();
    let ms = metrics::snapshot();

    if json {
        print!("{{");

        print!("\"file\":{{");
        print!("\"path\":\"{}\",", escape_json(store.name()));
        print!("\"size\":{},", size);
        print!("\"used_size\":{},", used);
        print!("\"free_tail\":{}", size - used);
        print!("}},"); // file

        print!("\"metrics\":{{");
        print!("\"docs_inserted\":{},", ms.docs_inserted);
        print!("\"docs_read\":{},", ms.docs_read);
        print!("\"docs_updated_inplace\":{},", ms.docs_updated_inplace);
        print!("\"docs_relocated\":{},", ms.docs_relocated);
        print!("\"docs_deleted\":{},", ms.docs_deleted);
        print!("\"inplace_update_ratio\":{:.2},", ms.inplace_update_ratio());
        print!("\"scan_corruptions\":{},", ms.scan_corruptions);
        print!("\"scan_resync_bytes\":{},", ms.scan_resync_bytes);
        print!("\"file_growths\":{},", ms.file_growths);
        print!("\"file_growth_bytes\":{}", ms.file_growth_bytes);
        print!("}}"); // metrics

        println!("}}");
        return Ok(());
    }

    println!("Store {}", path.display());
    println!("  size       = {}", size);
    println!("  used_size  = {}", used);
    println!("  free_tail  = {}", size - used);

    println!("Metrics snapshot:");
    println!("  docs_inserted        = {}", ms.docs_inserted);
    println!("  docs_read            = {}", ms.docs_read);
    println!("  docs_updated_inplace = {}", ms.docs_updated_inplace);
    println!("  docs_relocated       = {}", ms.docs_relocated);
    println!("  docs_deleted         = {}", ms.docs_deleted);
    println!("  inplace_update_ratio = {:.2}", ms.inplace_update_ratio());
    println!("  scan_corruptions     = {}", ms.scan_corruptions);
    println!("  scan_resync_bytes    = {}", ms.scan_resync_bytes);
    println!("  file_growths         = {}", ms.file_growths);
    println!("  file_growth_bytes    = {}", ms.file_growth_bytes);
    Ok(())
}

// ---------- helpers ----------

fn escape_json(s: &str) -> String {
    // экранируем только \ и " - для путей файловой системы этого хватает
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch == '\\' || ch == '"' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
