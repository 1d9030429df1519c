use std::path::Path;

use anyhow::{Context, Result};
use valarm_core::AlarmDocument;

pub fn run(file: &Path) -> Result<()> {
    let doc = AlarmDocument::load(file)
        .with_context(|| format!("Could not load alarms from {}", file.display()))?;

    let json = serde_json::to_string_pretty(&doc.snapshots())?;
    println!("{}", json);
    Ok(())
}
