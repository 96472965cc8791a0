use anyhow::{anyhow, Result};
use std::path::PathBuf;

use SheafDB::store::DocStore;

use super::util::{read_content_file, resolve_content};

pub fn exec(path: PathBuf, value: Option<String>, value_file: Option<PathBuf>) -> Result<()> {
    let val_bytes = match (value, value_file) {
        (_, Some(p)) => read_content_file(&p)?,
        (Some(s), None) => resolve_content(&s)?,
        (None, None) => return Err(anyhow!("either --value or --value-file must be provided")),
    };

    let mut store = DocStore::open(&path)?;
    let id = store.insert(&val_bytes)?;
    store.flush()?;
    println!(
        "OK insert: id={} ({} B content, room {} B)",
        id,
        val_bytes.len(),
        val_bytes.len() * 2
    );
    Ok(())
}
