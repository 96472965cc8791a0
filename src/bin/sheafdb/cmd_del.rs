use anyhow::Result;
use std::path::PathBuf;

use SheafDB::store::DocStore;

pub fn exec(path: PathBuf, id: u64) -> Result<()> {
    let mut store = DocStore::open(&path)?;
    let existed = store.read(id).is_some();
    store.delete(id);
    store.flush()?;
    if existed {
        println!("DELETED {}", id);
    } else {
        println!("DELETE requested, but no live document at {}", id);
    }
    Ok(())
}
