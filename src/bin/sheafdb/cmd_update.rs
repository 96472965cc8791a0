use anyhow::{anyhow, Result};
use std::path::PathBuf;

use SheafDB::store::DocStore;

use super::util::{read_content_file, resolve_content};

pub fn exec(path: PathBuf, id: u64, value: Option<String>, value_file: Option<PathBuf>) -> Result<()> {
    let val_bytes = match (value, value_file) {
        (_, Some(p)) => read_content_file(&p)?,
        (Some(s), None) => resolve_content(&s)?,
        (None, None) => return Err(anyhow!("either --value or --value-file must be provided")),
    };

    let mut store = DocStore::open(&path)?;
    let new_id = store.update(id, &val_bytes)?;
    store.flush()?;
    if new_id == id {
        println!("OK update: id={} in place ({} B content)", id, val_bytes.len());
    } else {
        println!(
            "OK update: id {} -> {} relocated ({} B content)",
            id,
            new_id,
            val_bytes.len()
        );
    }
    Ok(())
}
