use std::fs;
use std::path::Path;

use anyhow::Context;
use crawl_core::FormInput;
use crawl_logging::crawl_info;

/// Reads a crawl form written in RON. Missing fields keep their defaults.
pub(crate) fn load_form(path: &Path) -> anyhow::Result<FormInput> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read form file {:?}", path))?;
    let form: FormInput = ron::from_str(&content)
        .with_context(|| format!("Failed to parse form file {:?}", path))?;
    crawl_info!("Loaded form from {:?}", path);
    Ok(form)
}
