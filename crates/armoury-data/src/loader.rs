//! Reading source tables and configuration files from disk.
//!
//! Provides the load error type, format detection (RON/JSON/TOML) for
//! configuration files, and [`TableLoader`], which resolves a table's file
//! under the data directory and hands its text to the row parser.

use std::path::{Path, PathBuf};

use armoury_core::{Diagnostics, ParseError, Record, Registry, TableDef, parse_table};
use serde::de::DeserializeOwned;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The data directory does not exist.
    #[error("no data directory found at {}", dir.display())]
    MissingDataDir { dir: PathBuf },

    /// A source or configuration file could not be read.
    #[error("failed to read {}: {source}", file.display())]
    Read {
        file: PathBuf,
        source: std::io::Error,
    },

    /// A table failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A unit names a faction that is not in the factions table.
    #[error("faction {faction_id} not found (referenced by datasheet {unit})")]
    UnresolvedReference { unit: String, faction_id: String },

    /// The output artifact could not be written.
    #[error("failed to write {}: {source}", file.display())]
    Write {
        file: PathBuf,
        source: std::io::Error,
    },

    /// The index could not be rendered as JSON.
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A configuration file did not deserialize.
    #[error("invalid configuration in {}: {detail}", file.display())]
    Config { file: PathBuf, detail: String },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {}", file.display())]
    UnsupportedFormat { file: PathBuf },
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| DataLoadError::Read {
        file: path.to_path_buf(),
        source,
    })?;

    let config_error = |detail: String| DataLoadError::Config {
        file: path.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| config_error(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| config_error(e.to_string())),
        Format::Toml => toml::from_str(&content).map_err(|e| config_error(e.to_string())),
    }
}

// ===========================================================================
// Table loading
// ===========================================================================

/// Reads registered tables from a data directory.
#[derive(Debug)]
pub struct TableLoader<'a> {
    data_dir: PathBuf,
    registry: &'a Registry,
}

impl<'a> TableLoader<'a> {
    /// Fails with [`DataLoadError::MissingDataDir`] if `data_dir` is not a
    /// directory.
    pub fn new(data_dir: impl Into<PathBuf>, registry: &'a Registry) -> Result<Self, DataLoadError> {
        let data_dir = data_dir.into();
        if !data_dir.is_dir() {
            return Err(DataLoadError::MissingDataDir { dir: data_dir });
        }
        Ok(Self { data_dir, registry })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Local path of a table's file.
    pub fn path_of(&self, table: &TableDef) -> PathBuf {
        self.data_dir.join(table.file_name())
    }

    /// Raw text of a registered table.
    pub fn read(&self, table: &str) -> Result<String, DataLoadError> {
        let def = self.registry.table(table).map_err(ParseError::from)?;
        let path = self.path_of(def);
        std::fs::read_to_string(&path).map_err(|source| DataLoadError::Read { file: path, source })
    }

    /// Read and parse a registered table, selecting `fields` (or the whole
    /// schema when `None`).
    pub fn load(
        &self,
        table: &str,
        fields: Option<&[&str]>,
        diag: &mut Diagnostics,
    ) -> Result<Vec<Record>, DataLoadError> {
        let def = self.registry.table(table).map_err(ParseError::from)?;
        // Reject unparseable tables before touching the disk.
        def.project(fields).map_err(ParseError::from)?;

        let content = self.read(table)?;
        let records = parse_table(def, &content, fields, diag)?;
        tracing::debug!(table, rows = records.len(), "loaded table");
        Ok(records)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
