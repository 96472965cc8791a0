use anyhow::{Context, Result};
use std::path::PathBuf;

use SheafDB::store::DocStore;

use super::util::{display_text, hex_dump, trim_pad};

pub fn exec(path: PathBuf, id: u64, out: Option<PathBuf>) -> Result<()> {
    let store = DocStore::open(&path)?;
    match store.read(id) {
        Some(v) => {
            if let Some(out_path) = out {
                if let Some(dir) = out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(dir)?;
                }
                std::fs::write(&out_path, &v)
                    .with_context(|| format!("write payload to {}", out_path.display()))?;
                println!(
                    "FOUND {}: room {} B -> wrote to {}",
                    id,
                    v.len(),
                    out_path.display()
                );
            } else {
                let content = trim_pad(&v);
                println!("FOUND {}: room {} B, content {} B", id, v.len(), content.len());
                println!("text: {}", display_text(content));
                println!("hex:  {}", hex_dump(&v[..v.len().min(64)]));
            }
        }
        None => println!("NOT FOUND {}", id),
    }
    Ok(())
}
