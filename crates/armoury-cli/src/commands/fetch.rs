//! `armoury fetch`

use anyhow::{Result, bail};
use armoury_core::Registry;
use armoury_data::DataLoadError;
use armoury_fetch::{FetchOptions, UreqTransport, fetch_all};

use super::resolve_config;
use crate::cli::SourceArgs;

/// Download every table. Fails only when nothing could be downloaded.
pub fn handle(source: &SourceArgs, base_url: Option<String>) -> Result<()> {
    let mut config = resolve_config(source)?;
    if let Some(base_url) = base_url {
        config.source_base_url = base_url;
    }
    if !config.data_dir.is_dir() {
        return Err(DataLoadError::MissingDataDir {
            dir: config.data_dir,
        }
        .into());
    }

    let registry = Registry::builtin()?;
    let options = FetchOptions::from_config(&config);
    let transport = UreqTransport::new(options.timeout);
    let summary = fetch_all(&registry, &options, &transport)?;

    for (table, err) in &summary.failed {
        eprintln!("  {table}: {err}");
    }
    if summary.all_failed() {
        bail!("every table failed to download");
    }
    println!(
        "Downloaded {} tables, {} failed",
        summary.succeeded_count(),
        summary.failed_count()
    );
    Ok(())
}
