use anyhow::Result;
use std::path::PathBuf;

use SheafDB::config::StoreConfig;
use SheafDB::store::{rebuild, DocStore};

pub fn exec(path: PathBuf, to: PathBuf, json: bool) -> Result<()> {
    let store = DocStore::open(&path)?;
    let report = rebuild(&store, &to, &StoreConfig::from_env())?;

    if json {
        let s = serde_json::to_string_pretty(&report)?;
        println!("{}", s);
        return Ok(());
    }

    println!("Rebuild {} -> {}:", path.display(), to.display());
    println!("  docs_copied = {}", report.docs_copied);
    println!("  remapped    = {}", report.remapped);
    println!("  corruptions = {}", report.corruptions);
    println!("  bytes_in    = {}", report.bytes_in);
    println!("  bytes_out   = {}", report.bytes_out);
    Ok(())
}
