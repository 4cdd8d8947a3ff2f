use std::path::{Path, PathBuf};
use std::time::Duration;

use armoury_core::schema::DEFAULT_SOURCE_BASE;
use serde::{Deserialize, Serialize};

use crate::loader::{DataLoadError, deserialize_file};

/// File name of the artifact when no output path is configured.
pub const DEFAULT_OUTPUT_FILE: &str = "Parsed_output.json";

/// Settings for one pipeline run. Every field has a default, so a config
/// file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding `<Table>.csv` files.
    pub data_dir: PathBuf,
    /// Artifact destination; `<data_dir>/Parsed_output.json` when unset.
    pub output: Option<PathBuf>,
    pub source_base_url: String,
    /// Maximum simultaneous downloads.
    pub fetch_concurrency: usize,
    pub fetch_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output: None,
            source_base_url: DEFAULT_SOURCE_BASE.to_string(),
            fetch_concurrency: 4,
            fetch_timeout_secs: 30,
        }
    }
}

impl PipelineConfig {
    /// Load from a RON, TOML or JSON file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let config: Self = deserialize_file(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_OUTPUT_FILE))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
