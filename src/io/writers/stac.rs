use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::stac::{Collection, Item};

/// Serialize `value` as pretty-printed JSON to `path`, creating parent directories.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

/// Write `item` to `{out_dir}/{id}.json` and return the path.
pub fn save_item(item: &Item, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(format!("{}.json", item.id));
    write_json(item, &path)?;
    info!("Wrote item {} to {:?}", item.id, path);
    Ok(path)
}

/// Write `collection` to `{out_dir}/collection.json` and return the path.
pub fn save_collection(collection: &Collection, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join("collection.json");
    write_json(collection, &path)?;
    info!("Wrote collection {} to {:?}", collection.id, path);
    Ok(path)
}
