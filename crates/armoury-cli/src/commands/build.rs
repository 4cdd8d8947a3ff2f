//! `armoury build`

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use armoury_data::Pipeline;
use armoury_fetch::{FetchOptions, UreqTransport, fetch_all};

use super::resolve_config;
use crate::cli::SourceArgs;

pub fn handle(source: &SourceArgs, output: Option<PathBuf>, redownload: bool) -> Result<()> {
    let mut config = resolve_config(source)?;
    if output.is_some() {
        config.output = output;
    }

    let pipeline = Pipeline::new(config)?;

    if redownload {
        let options = FetchOptions::from_config(pipeline.config());
        let transport = UreqTransport::new(options.timeout);
        let summary = fetch_all(pipeline.registry(), &options, &transport)?;
        if summary.all_failed() {
            bail!("every table failed to download");
        }
    }

    let report = pipeline.run().context("building unit index")?;
    tracing::info!(
        factions = report.factions,
        units = report.units,
        diagnostics = report.diagnostics.len(),
        "done: {}",
        report.output.display()
    );
    Ok(())
}
