//! End-to-end run: load the four index tables, join them, write the artifact.

use std::path::PathBuf;

use armoury_core::schema::{DATASHEETS, DATASHEETS_MODELS, DATASHEETS_WARGEAR, FACTIONS};
use armoury_core::{Diagnostic, Diagnostics, ParseError, Record, Registry};

use crate::config::PipelineConfig;
use crate::index::{UnitIndex, build_index};
use crate::loader::{DataLoadError, TableLoader};
use crate::output::write_index;

// Columns each table contributes to the index.
pub const FACTION_FIELDS: [&str; 2] = ["id", "name"];
pub const UNIT_FIELDS: [&str; 3] = ["id", "name", "faction_id"];
pub const BASE_STATS_FIELDS: [&str; 6] = ["datasheet_id", "T", "Sv", "inv_sv", "W", "name"];
pub const WEAPON_FIELDS: [&str; 8] = ["datasheet_id", "name", "type", "A", "BS_WS", "S", "AP", "D"];

/// Parsed contents of the four index tables.
#[derive(Debug, Clone, Default)]
pub struct SourceRecords {
    pub factions: Vec<Record>,
    pub units: Vec<Record>,
    pub base_stats: Vec<Record>,
    pub weapons: Vec<Record>,
}

impl SourceRecords {
    /// Row count per table, in load order.
    pub fn row_counts(&self) -> [(&'static str, usize); 4] {
        [
            (FACTIONS.name, self.factions.len()),
            (DATASHEETS.name, self.units.len()),
            (DATASHEETS_MODELS.name, self.base_stats.len()),
            (DATASHEETS_WARGEAR.name, self.weapons.len()),
        ]
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output: PathBuf,
    pub rows: [(&'static str, usize); 4],
    pub factions: usize,
    pub units: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    registry: Registry,
}

impl Pipeline {
    /// Fails if the configured data directory does not exist.
    pub fn new(config: PipelineConfig) -> Result<Self, DataLoadError> {
        let registry = Registry::builtin().map_err(ParseError::from)?;
        if !config.data_dir.is_dir() {
            return Err(DataLoadError::MissingDataDir {
                dir: config.data_dir.clone(),
            });
        }
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Load the index tables with their projections.
    pub fn load_sources(&self, diag: &mut Diagnostics) -> Result<SourceRecords, DataLoadError> {
        let loader = TableLoader::new(&self.config.data_dir, &self.registry)?;
        Ok(SourceRecords {
            units: loader.load(DATASHEETS.name, Some(&UNIT_FIELDS), diag)?,
            factions: loader.load(FACTIONS.name, Some(&FACTION_FIELDS), diag)?,
            base_stats: loader.load(DATASHEETS_MODELS.name, Some(&BASE_STATS_FIELDS), diag)?,
            weapons: loader.load(DATASHEETS_WARGEAR.name, Some(&WEAPON_FIELDS), diag)?,
        })
    }

    /// Load and join, without writing anything.
    pub fn build_index(&self, diag: &mut Diagnostics) -> Result<UnitIndex, DataLoadError> {
        let sources = self.load_sources(diag)?;
        build_index(
            &sources.factions,
            &sources.units,
            &sources.base_stats,
            &sources.weapons,
            diag,
        )
    }

    /// Load, join and write the artifact.
    pub fn run(&self) -> Result<RunReport, DataLoadError> {
        let mut diag = Diagnostics::new();
        let sources = self.load_sources(&mut diag)?;
        for (table, rows) in sources.row_counts() {
            tracing::info!(table, rows, "parsed");
        }

        let index = build_index(
            &sources.factions,
            &sources.units,
            &sources.base_stats,
            &sources.weapons,
            &mut diag,
        )?;

        let output = self.config.output_path();
        write_index(&index, &output)?;

        Ok(RunReport {
            output,
            rows: sources.row_counts(),
            factions: index.faction_count(),
            units: index.len(),
            diagnostics: diag.into_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armoury_core::test_utils::SourceTables;
    use std::fs;
    use std::path::Path;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "armoury_data_pipeline_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    fn write_tables(dir: &Path, tables: &SourceTables) {
        for (def, content) in tables.entries() {
            fs::write(dir.join(def.file_name()), content).unwrap();
        }
    }

    fn config_for(dir: &Path) -> PipelineConfig {
        PipelineConfig {
            data_dir: dir.to_path_buf(),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn missing_data_dir_is_fatal() {
        let dir = std::env::temp_dir().join(format!(
            "armoury_data_pipeline_absent_{}",
            std::process::id()
        ));
        let err = Pipeline::new(config_for(&dir)).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingDataDir { .. }));
    }

    #[test]
    fn projections_are_declared_columns() {
        FACTIONS.project(Some(&FACTION_FIELDS)).unwrap();
        DATASHEETS.project(Some(&UNIT_FIELDS)).unwrap();
        DATASHEETS_MODELS.project(Some(&BASE_STATS_FIELDS)).unwrap();
        DATASHEETS_WARGEAR.project(Some(&WEAPON_FIELDS)).unwrap();
    }

    #[test]
    fn run_writes_default_output() {
        let dir = make_test_dir("run");
        write_tables(&dir, &SourceTables::alpha_brigade());

        let report = Pipeline::new(config_for(&dir)).unwrap().run().unwrap();
        assert_eq!(report.output, dir.join("Parsed_output.json"));
        assert_eq!(report.units, 1);
        assert_eq!(report.factions, 1);
        assert!(report.diagnostics.is_empty());
        assert_eq!(
            report.rows,
            [
                ("Factions", 1),
                ("Datasheets", 1),
                ("Datasheets_models", 1),
                ("Datasheets_wargear", 1)
            ]
        );
        assert!(report.output.exists());

        cleanup(&dir);
    }

    #[test]
    fn build_index_does_not_write() {
        let dir = make_test_dir("dry");
        write_tables(&dir, &SourceTables::alpha_brigade());

        let pipeline = Pipeline::new(config_for(&dir)).unwrap();
        let index = pipeline.build_index(&mut Diagnostics::new()).unwrap();
        assert!(index.get("Alpha Brigade", "Trooper").is_some());
        assert!(!pipeline.config().output_path().exists());

        cleanup(&dir);
    }

    #[test]
    fn missing_table_aborts_before_writing() {
        let dir = make_test_dir("partial");
        let tables = SourceTables::alpha_brigade();
        fs::write(dir.join("Datasheets.csv"), &tables.datasheets).unwrap();
        fs::write(dir.join("Factions.csv"), &tables.factions).unwrap();

        let pipeline = Pipeline::new(config_for(&dir)).unwrap();
        let err = pipeline.run().unwrap_err();
        assert!(matches!(err, DataLoadError::Read { .. }));
        assert!(!pipeline.config().output_path().exists());

        cleanup(&dir);
    }
}
