use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::OutputError;
use crate::models::{AggregateResult, Item};

/// On-disk shape of `posts.json`. Only the merged list is persisted.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub generated_at: i64,
    pub items: Vec<Item>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    generated_at: i64,
    items: &'a [Item],
}

/// Replace the snapshot at `path` with the current result.
pub fn write_snapshot(result: &AggregateResult, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| OutputError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(&SnapshotRef {
        generated_at: result.generated_at,
        items: &result.items,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| OutputError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(OutputError::io(path, e));
    }

    info!("Wrote {} items to {}", result.items.len(), path.display());
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot, OutputError> {
    let contents = fs::read_to_string(path).map_err(|e| OutputError::io(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}
