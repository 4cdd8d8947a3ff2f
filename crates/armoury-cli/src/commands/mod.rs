//! Command handlers for the armoury CLI
//!
//! Each subcommand has its own module with a `handle` function.

pub mod build;
pub mod fetch;
pub mod show;
pub mod tables;

use anyhow::{Context, Result};
use armoury_data::PipelineConfig;

use crate::cli::SourceArgs;

/// Merge settings: flag or environment (resolved by clap) over the config
/// file over defaults.
pub fn resolve_config(source: &SourceArgs) -> Result<PipelineConfig> {
    let mut config = match &source.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(dir) = &source.data_dir {
        config.data_dir = dir.clone();
    }

    Ok(config)
}
