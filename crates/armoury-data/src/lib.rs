//! Armoury Data -- file-backed pipeline for the unit index.
//!
//! Reads the source tables from a data directory, joins units to their
//! faction, base stats and weapon options, and writes the result as one JSON
//! document.
//!
//! # Usage
//!
//! ```rust,ignore
//! use armoury_data::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::load("armoury.toml".as_ref())?;
//! let report = Pipeline::new(config)?.run()?;
//! println!("{} units written to {}", report.units, report.output.display());
//! ```

pub mod config;
pub mod index;
pub mod loader;
pub mod output;
pub mod pipeline;

pub use config::PipelineConfig;
pub use index::{OutputEntry, UnitIndex, build_index};
pub use loader::{DataLoadError, TableLoader};
pub use output::{render_index, write_atomic, write_index};
pub use pipeline::{Pipeline, RunReport, SourceRecords};
