//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::schema::{DATASHEETS, DATASHEETS_MODELS, DATASHEETS_WARGEAR, FACTIONS, TableDef};

// ===========================================================================
// Table text builder
// ===========================================================================

/// Render a header and rows the way the publisher does: one line per row,
/// every cell followed by the delimiter.
pub fn table_text(header: &[&str], rows: &[&[&str]]) -> String {
    let mut out = String::new();
    for line in std::iter::once(header).chain(rows.iter().copied()) {
        for cell in line {
            out.push_str(cell);
            out.push('|');
        }
        out.push('\n');
    }
    out
}

// ===========================================================================
// Alpha Brigade fixture
// ===========================================================================

pub const ALPHA_FACTIONS: &str = "id|name|link|\nAB|Alpha Brigade|x|\n";

pub const ALPHA_DATASHEETS: &str = "\
id|name|faction_id|source_id|legend|role|loadout|transport|virtual|leader_head|leader_footer|damaged_w|damaged_description|link|
1|Trooper|AB|1||Battleline|Rifle||false|||||x|
";

pub const ALPHA_MODELS: &str = "\
datasheet_id|line|name|M|T|Sv|inv_sv|inv_sv_descr|W|Ld|OC|base_size|base_size_descr|
1|1|Trooper|6\"|4|3+|-||2|6+|2|32mm||
";

pub const ALPHA_WARGEAR: &str = "\
datasheet_id|line|line_in_wargear|dice|name|description|range|type|A|BS_WS|S|AP|D|
1|1|1||Rifle||24|Ranged|1|3|4|-1|1|
";

/// The text of the four index tables for one run.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub factions: String,
    pub datasheets: String,
    pub models: String,
    pub wargear: String,
}

impl SourceTables {
    /// One faction, one unit, one weapon.
    pub fn alpha_brigade() -> Self {
        Self {
            factions: ALPHA_FACTIONS.to_string(),
            datasheets: ALPHA_DATASHEETS.to_string(),
            models: ALPHA_MODELS.to_string(),
            wargear: ALPHA_WARGEAR.to_string(),
        }
    }

    /// Alpha Brigade plus a second unit with no base-stats row.
    pub fn with_orphan_unit() -> Self {
        let mut tables = Self::alpha_brigade();
        tables
            .datasheets
            .push_str("2|Ghost|AB|1||Elites|||false|||||x|\n");
        tables
    }

    /// Each table paired with its definition, for writing to a data directory.
    pub fn entries(&self) -> [(&'static TableDef, &str); 4] {
        [
            (&FACTIONS, self.factions.as_str()),
            (&DATASHEETS, self.datasheets.as_str()),
            (&DATASHEETS_MODELS, self.models.as_str()),
            (&DATASHEETS_WARGEAR, self.wargear.as_str()),
        ]
    }
}

// ===========================================================================
// Generated tables
// ===========================================================================

const WARGEAR_HEADER: [&str; 13] = [
    "datasheet_id",
    "line",
    "line_in_wargear",
    "dice",
    "name",
    "description",
    "range",
    "type",
    "A",
    "BS_WS",
    "S",
    "AP",
    "D",
];

/// A wargear table with `units * weapons_per_unit` rows, mixing melee and
/// ranged profiles and dice expressions.
pub fn generated_wargear(units: usize, weapons_per_unit: usize) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(units * weapons_per_unit);
    for unit in 1..=units {
        for weapon in 1..=weapons_per_unit {
            let melee = weapon % 2 == 0;
            rows.push(vec![
                unit.to_string(),
                weapon.to_string(),
                "1".to_string(),
                String::new(),
                format!("Weapon {unit}-{weapon}"),
                String::new(),
                if melee { "Melee".to_string() } else { "24".to_string() },
                if melee { "Melee" } else { "Ranged" }.to_string(),
                if weapon % 3 == 0 { "D6+1".to_string() } else { "2".to_string() },
                "3".to_string(),
                "4".to_string(),
                "-1".to_string(),
                if weapon % 4 == 0 { "D3".to_string() } else { "1".to_string() },
            ]);
        }
    }
    let row_refs: Vec<Vec<&str>> = rows
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect();
    let row_slices: Vec<&[&str]> = row_refs.iter().map(Vec::as_slice).collect();
    table_text(&WARGEAR_HEADER, &row_slices)
}
