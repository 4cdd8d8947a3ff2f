//! Cross-referencing parsed tables into the faction → unit index.

use std::collections::HashMap;

use armoury_core::{Diagnostic, Diagnostics, Record, Value};
use indexmap::IndexMap;
use serde::Serialize;

use crate::loader::DataLoadError;

/// One unit's base stats with its weapon options attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputEntry {
    #[serde(flatten)]
    pub stats: Record,
    pub gear_options: Vec<Record>,
}

/// Faction name → unit name → entry, in order of first appearance in the
/// units table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnitIndex {
    factions: IndexMap<String, IndexMap<String, OutputEntry>>,
}

impl UnitIndex {
    pub fn factions(&self) -> impl Iterator<Item = &str> {
        self.factions.keys().map(String::as_str)
    }

    /// Unit names of a faction, or `None` if the faction has no entries.
    pub fn units(&self, faction: &str) -> Option<impl Iterator<Item = &str>> {
        self.factions
            .get(faction)
            .map(|units| units.keys().map(String::as_str))
    }

    pub fn get(&self, faction: &str, unit: &str) -> Option<&OutputEntry> {
        self.factions.get(faction)?.get(unit)
    }

    /// Total number of unit entries across all factions.
    pub fn len(&self) -> usize {
        self.factions.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn faction_count(&self) -> usize {
        self.factions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &OutputEntry)> {
        self.factions.iter().flat_map(|(faction, units)| {
            units
                .iter()
                .map(move |(unit, entry)| (faction.as_str(), unit.as_str(), entry))
        })
    }

    /// Returns the entry previously stored under the same key, if any.
    fn insert(&mut self, faction: &str, unit: &str, entry: OutputEntry) -> Option<OutputEntry> {
        self.factions
            .entry(faction.to_string())
            .or_default()
            .insert(unit.to_string(), entry)
    }
}

/// Join units to their faction, base stats and weapon options.
///
/// Units are visited in input order. A unit whose faction cannot be
/// resolved aborts the build. A unit with no base-stats row, or whose base
/// stats have no name, is dropped with a diagnostic. A later unit with the
/// same (faction, name) replaces an earlier one, also with a diagnostic.
pub fn build_index(
    factions: &[Record],
    units: &[Record],
    base_stats: &[Record],
    weapons: &[Record],
    diag: &mut Diagnostics,
) -> Result<UnitIndex, DataLoadError> {
    let faction_by_id = first_by_key(factions, "id");
    let stats_by_unit = first_by_key(base_stats, "datasheet_id");

    let mut weapons_by_unit: HashMap<&Value, Vec<&Record>> = HashMap::new();
    for weapon in weapons {
        if let Some(id) = weapon.present_value("datasheet_id") {
            weapons_by_unit.entry(id).or_default().push(weapon);
        }
    }

    let mut index = UnitIndex::default();
    for unit in units {
        let unit_id = unit.present_value("id");
        let unit_label = || unit_id.map_or_else(|| "-".to_string(), Value::to_string);

        let faction_id = unit.present_value("faction_id");
        let faction_name = faction_id
            .and_then(|id| faction_by_id.get(id))
            .and_then(|faction| faction.text("name"))
            .ok_or_else(|| DataLoadError::UnresolvedReference {
                unit: unit_label(),
                faction_id: faction_id.map_or_else(|| "-".to_string(), Value::to_string),
            })?;

        let Some(stats) = unit_id.and_then(|id| stats_by_unit.get(id)) else {
            diag.report(Diagnostic::MissingBaseStats {
                datasheet_id: unit_label(),
                unit: unit.text("name").unwrap_or_default().to_string(),
            });
            continue;
        };

        let gear_options: Vec<Record> = unit_id
            .and_then(|id| weapons_by_unit.get(id))
            .map(|list| list.iter().map(|&w| w.clone()).collect())
            .unwrap_or_default();

        let Some(name) = stats.text("name") else {
            diag.report(Diagnostic::UnnamedBaseStats {
                datasheet_id: unit_label(),
                unit: unit.text("name").unwrap_or_default().to_string(),
            });
            continue;
        };

        let entry = OutputEntry {
            stats: (*stats).clone(),
            gear_options,
        };
        if let Some(previous) = index.insert(faction_name, name, entry) {
            diag.report(Diagnostic::UnitOverwritten {
                faction: faction_name.to_string(),
                unit: name.to_string(),
                previous: previous
                    .stats
                    .present_value("datasheet_id")
                    .map_or_else(|| "-".to_string(), Value::to_string),
                replacement: unit_label(),
            });
        }
    }

    tracing::info!(
        factions = index.faction_count(),
        units = index.len(),
        "built unit index"
    );
    Ok(index)
}

/// Index records by a key column; the first record per key wins and records
/// without the key are skipped.
fn first_by_key<'r>(records: &'r [Record], field: &str) -> HashMap<&'r Value, &'r Record> {
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        if let Some(key) = record.present_value(field) {
            map.entry(key).or_insert(record);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use armoury_core::parse_table;
    use armoury_core::schema::{DATASHEETS, DATASHEETS_MODELS, DATASHEETS_WARGEAR, FACTIONS, TableDef};
    use armoury_core::test_utils::{SourceTables, table_text};
    use serde_json::json;

    const MODEL_FIELDS: [&str; 6] = ["datasheet_id", "T", "Sv", "inv_sv", "W", "name"];

    fn parse(table: &TableDef, content: &str) -> Vec<Record> {
        parse_table(table, content, None, &mut Diagnostics::new()).unwrap()
    }

    fn parse_fields(table: &TableDef, content: &str, fields: &[&str]) -> Vec<Record> {
        parse_table(table, content, Some(fields), &mut Diagnostics::new()).unwrap()
    }

    fn build(tables: &SourceTables) -> (Result<UnitIndex, DataLoadError>, Diagnostics) {
        let mut diag = Diagnostics::new();
        let result = build_index(
            &parse_fields(&FACTIONS, &tables.factions, &["id", "name"]),
            &parse_fields(&DATASHEETS, &tables.datasheets, &["id", "name", "faction_id"]),
            &parse_fields(&DATASHEETS_MODELS, &tables.models, &MODEL_FIELDS),
            &parse(&DATASHEETS_WARGEAR, &tables.wargear),
            &mut diag,
        );
        (result, diag)
    }

    fn units(header: &[&str], rows: &[&[&str]]) -> Vec<Record> {
        parse_fields(&DATASHEETS, &table_text(header, rows), &["id", "name", "faction_id"])
    }

    fn models(rows: &[&[&str]]) -> Vec<Record> {
        parse_fields(
            &DATASHEETS_MODELS,
            &table_text(&["datasheet_id", "T", "Sv", "W", "name"], rows),
            &["datasheet_id", "T", "Sv", "W", "name"],
        )
    }

    fn alpha_factions() -> Vec<Record> {
        parse_fields(&FACTIONS, &SourceTables::alpha_brigade().factions, &["id", "name"])
    }

    // -----------------------------------------------------------------------
    // Happy path
    // -----------------------------------------------------------------------

    #[test]
    fn alpha_brigade_index() {
        let (result, diag) = build(&SourceTables::alpha_brigade());
        let index = result.unwrap();
        assert!(diag.is_empty());
        assert_eq!(index.len(), 1);

        let entry = index.get("Alpha Brigade", "Trooper").unwrap();
        assert_eq!(entry.stats.number("T"), Some(4));
        assert_eq!(entry.gear_options.len(), 1);
        assert_eq!(entry.gear_options[0].text("name"), Some("Rifle"));

        let value = serde_json::to_value(&index).unwrap();
        assert_eq!(
            value,
            json!({
                "Alpha Brigade": {
                    "Trooper": {
                        "datasheet_id": 1,
                        "T": 4,
                        "Sv": "3+",
                        "W": 2,
                        "name": "Trooper",
                        "gear_options": [{
                            "datasheet_id": 1,
                            "line": 1,
                            "line_in_wargear": 1,
                            "name": "Rifle",
                            "range": 24,
                            "type": "Ranged",
                            "A": 1,
                            "BS_WS": 3,
                            "S": 4,
                            "AP": -1,
                            "D": 1
                        }]
                    }
                }
            })
        );
    }

    #[test]
    fn unit_without_weapons_has_empty_gear() {
        let mut tables = SourceTables::alpha_brigade();
        // Header only.
        tables.wargear = tables.wargear.lines().next().unwrap_or_default().to_string();
        let (result, _) = build(&tables);
        let index = result.unwrap();
        let entry = index.get("Alpha Brigade", "Trooper").unwrap();
        assert!(entry.gear_options.is_empty());

        let value = serde_json::to_value(entry).unwrap();
        assert_eq!(value["gear_options"], json!([]));
    }

    #[test]
    fn weapons_stay_with_their_unit() {
        let units = units(
            &["id", "name", "faction_id"],
            &[&["1", "Trooper", "AB"], &["2", "Sergeant", "AB"]],
        );
        let stats = models(&[&["1", "4", "3+", "2", "Trooper"], &["2", "4", "3+", "3", "Sergeant"]]);
        let weapons = parse_fields(
            &DATASHEETS_WARGEAR,
            &table_text(
                &["datasheet_id", "name", "A", "AP"],
                &[
                    &["1", "Rifle", "1", "0"],
                    &["2", "Pistol", "1", "0"],
                    &["1", "Knife", "2", "0"],
                    &["2", "Sword", "3", "-1"],
                ],
            ),
            &["datasheet_id", "name", "A", "AP"],
        );

        let mut diag = Diagnostics::new();
        let index = build_index(&alpha_factions(), &units, &stats, &weapons, &mut diag).unwrap();

        for (_, _, entry) in index.iter() {
            let id = entry.stats.get("datasheet_id");
            for gear in &entry.gear_options {
                assert_eq!(gear.get("datasheet_id"), id);
            }
        }
        let trooper: Vec<_> = index
            .get("Alpha Brigade", "Trooper")
            .unwrap()
            .gear_options
            .iter()
            .filter_map(|g| g.text("name"))
            .collect();
        assert_eq!(trooper, ["Rifle", "Knife"]);
    }

    #[test]
    fn first_base_stats_row_wins() {
        let units = units(&["id", "name", "faction_id"], &[&["1", "Trooper", "AB"]]);
        let stats = models(&[&["1", "4", "3+", "2", "Trooper"], &["1", "9", "2+", "9", "Other"]]);
        let mut diag = Diagnostics::new();
        let index = build_index(&alpha_factions(), &units, &stats, &[], &mut diag).unwrap();
        assert_eq!(index.get("Alpha Brigade", "Trooper").unwrap().stats.number("T"), Some(4));
        assert!(index.get("Alpha Brigade", "Other").is_none());
    }

    #[test]
    fn preserves_unit_order() {
        let units = units(
            &["id", "name", "faction_id"],
            &[&["3", "Zeta", "AB"], &["1", "Alpha", "AB"], &["2", "Mid", "AB"]],
        );
        let stats = models(&[
            &["1", "4", "3+", "2", "Alpha"],
            &["2", "4", "3+", "2", "Mid"],
            &["3", "4", "3+", "2", "Zeta"],
        ]);
        let mut diag = Diagnostics::new();
        let index = build_index(&alpha_factions(), &units, &stats, &[], &mut diag).unwrap();
        let names: Vec<_> = index.units("Alpha Brigade").unwrap().collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
    }

    // -----------------------------------------------------------------------
    // Recoverable gaps
    // -----------------------------------------------------------------------

    #[test]
    fn unit_without_base_stats_is_dropped() {
        let (result, diag) = build(&SourceTables::with_orphan_unit());
        let index = result.unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get("Alpha Brigade", "Ghost").is_none());
        assert_eq!(diag.len(), 1);
        assert_eq!(
            diag.iter().next(),
            Some(&Diagnostic::MissingBaseStats {
                datasheet_id: "2".to_string(),
                unit: "Ghost".to_string(),
            })
        );
    }

    #[test]
    fn unnamed_base_stats_are_dropped() {
        let units = units(&["id", "name", "faction_id"], &[&["1", "Trooper", "AB"]]);
        let stats = models(&[&["1", "4", "3+", "2", "-"]]);
        let mut diag = Diagnostics::new();
        let index = build_index(&alpha_factions(), &units, &stats, &[], &mut diag).unwrap();
        assert!(index.is_empty());
        assert!(matches!(
            diag.iter().next(),
            Some(Diagnostic::UnnamedBaseStats { .. })
        ));
    }

    #[test]
    fn duplicate_unit_name_last_write_wins() {
        let units = units(
            &["id", "name", "faction_id"],
            &[&["1", "Trooper", "AB"], &["2", "Trooper", "AB"]],
        );
        let stats = models(&[&["1", "4", "3+", "2", "Trooper"], &["2", "5", "2+", "3", "Trooper"]]);
        let mut diag = Diagnostics::new();
        let index = build_index(&alpha_factions(), &units, &stats, &[], &mut diag).unwrap();

        assert_eq!(index.len(), 1);
        let entry = index.get("Alpha Brigade", "Trooper").unwrap();
        assert_eq!(entry.stats.number("datasheet_id"), Some(2));
        assert_eq!(
            diag.into_vec(),
            vec![Diagnostic::UnitOverwritten {
                faction: "Alpha Brigade".to_string(),
                unit: "Trooper".to_string(),
                previous: "1".to_string(),
                replacement: "2".to_string(),
            }]
        );
    }

    // -----------------------------------------------------------------------
    // Fatal gaps
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_faction_is_fatal() {
        let units = units(&["id", "name", "faction_id"], &[&["7", "Stray", "ZZ"]]);
        let mut diag = Diagnostics::new();
        let err = build_index(&alpha_factions(), &units, &[], &[], &mut diag).unwrap_err();
        match err {
            DataLoadError::UnresolvedReference { unit, faction_id } => {
                assert_eq!(unit, "7");
                assert_eq!(faction_id, "ZZ");
            }
            other => panic!("expected UnresolvedReference, got {other:?}"),
        }
    }

    #[test]
    fn missing_faction_id_is_fatal() {
        let units = units(&["id", "name", "faction_id"], &[&["7", "Stray", "-"]]);
        let mut diag = Diagnostics::new();
        let result = build_index(&alpha_factions(), &units, &[], &[], &mut diag);
        assert!(matches!(result, Err(DataLoadError::UnresolvedReference { .. })));
    }
}
