use std::path::Path;

use anyhow::{Context, Result};
use valarm_core::AlarmDocument;

pub fn run(file: &Path) -> Result<()> {
    let doc = AlarmDocument::load(file)
        .with_context(|| format!("Could not load alarms from {}", file.display()))?;

    if doc.alarms().is_empty() {
        log::warn!("No alarms defined in {}", file.display());
        return Ok(());
    }

    print!("{}", doc.render()?);
    Ok(())
}
