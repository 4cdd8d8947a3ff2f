//! Table definitions for the published datasheet export.
//!
//! Every table the publisher serves is listed here so it can be downloaded.
//! Only the four tables that feed the unit index declare their columns; the
//! others have no schema and cannot be parsed.

use std::fmt;

use crate::registry::SchemaError;

/// Base URL the publisher serves its tables from.
pub const DEFAULT_SOURCE_BASE: &str = "http://wahapedia.ru/wh40k10ed/";

/// Column separator used by every source table.
pub const DELIMITER: char = '|';

// ===========================================================================
// Field descriptors
// ===========================================================================

/// The declared type of a column. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Number,
    Boolean,
    /// A flat number or a dice expression such as `D6+2`.
    Die,
    /// An "N or better" threshold written as `4+`.
    MinVal,
    /// A number, except for one reserved literal meaning "not applicable".
    NumOrConstant { constant: &'static str },
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => f.write_str("string"),
            ValueType::Number => f.write_str("number"),
            ValueType::Boolean => f.write_str("boolean"),
            ValueType::Die => f.write_str("Die"),
            ValueType::MinVal => f.write_str("MinVal"),
            ValueType::NumOrConstant { constant } => write!(f, "numOrConstant({constant})"),
        }
    }
}

/// One named, typed column of a table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub value_type: ValueType,
    pub optional: bool,
}

impl Field {
    pub const fn required(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            value_type,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            value_type,
            optional: true,
        }
    }
}

// ===========================================================================
// Table descriptors
// ===========================================================================

/// A source table: its name (which doubles as the file stem) and, when it
/// feeds the index, its ordered column schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub fields: Option<&'static [Field]>,
}

impl TableDef {
    pub const fn unparsed(name: &'static str) -> Self {
        Self { name, fields: None }
    }

    pub const fn with_fields(name: &'static str, fields: &'static [Field]) -> Self {
        Self {
            name,
            fields: Some(fields),
        }
    }

    /// Local file name the table is stored under.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name)
    }

    /// Remote origin of the table under the given base URL.
    pub fn source_url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.file_name())
    }

    pub fn has_schema(&self) -> bool {
        self.fields.is_some()
    }

    /// The declared columns, or [`SchemaError::NoSchema`] for download-only tables.
    pub fn schema(&self) -> Result<&'static [Field], SchemaError> {
        self.fields.ok_or_else(|| SchemaError::NoSchema {
            table: self.name.to_string(),
        })
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields?.iter().find(|f| f.name == name)
    }

    /// Resolve a requested subset of columns, in schema order.
    ///
    /// `None` selects the full schema. Naming a column the schema does not
    /// declare is a configuration error.
    pub fn project(&self, names: Option<&[&str]>) -> Result<Vec<&'static Field>, SchemaError> {
        let schema = self.schema()?;
        let Some(names) = names else {
            return Ok(schema.iter().collect());
        };

        if let Some(unknown) = names.iter().find(|n| self.field(n).is_none()) {
            return Err(SchemaError::UnknownField {
                table: self.name.to_string(),
                field: unknown.to_string(),
            });
        }

        Ok(schema.iter().filter(|f| names.contains(&f.name)).collect())
    }

    /// Check that no column name is declared twice.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let Some(fields) = self.fields else {
            return Ok(());
        };
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    table: self.name.to_string(),
                    field: field.name.to_string(),
                });
            }
        }
        Ok(())
    }
}

// ===========================================================================
// Parsed tables
// ===========================================================================

pub static FACTIONS: TableDef = TableDef::with_fields(
    "Factions",
    &[
        Field::required("id", ValueType::String),
        Field::required("name", ValueType::String),
        Field::required("link", ValueType::String),
    ],
);

pub static DATASHEETS: TableDef = TableDef::with_fields(
    "Datasheets",
    &[
        // Links to every other Datasheets_* table.
        Field::required("id", ValueType::Number),
        Field::required("name", ValueType::String),
        // Links to Factions.
        Field::required("faction_id", ValueType::String),
        // Links to Source.
        Field::optional("source_id", ValueType::Number),
        Field::optional("legend", ValueType::String),
        Field::optional("role", ValueType::String),
        Field::optional("loadout", ValueType::String),
        Field::optional("transport", ValueType::String),
        // Not listed in army lists but summonable.
        Field::required("virtual", ValueType::Boolean),
        Field::optional("leader_head", ValueType::String),
        Field::optional("leader_footer", ValueType::String),
        Field::optional("damaged_w", ValueType::String),
        Field::optional("damaged_description", ValueType::String),
        Field::required("link", ValueType::String),
    ],
);

pub static DATASHEETS_MODELS: TableDef = TableDef::with_fields(
    "Datasheets_models",
    &[
        Field::required("datasheet_id", ValueType::Number),
        Field::required("line", ValueType::Number),
        // Blank for a handful of upstream rows.
        Field::optional("name", ValueType::String),
        Field::optional("M", ValueType::String),
        Field::required("T", ValueType::Number),
        Field::required("Sv", ValueType::String),
        Field::optional("inv_sv", ValueType::Number),
        Field::optional("inv_sv_descr", ValueType::String),
        Field::required("W", ValueType::Number),
        Field::required("Ld", ValueType::String),
        Field::required("OC", ValueType::Number),
        Field::optional("base_size", ValueType::String),
        Field::optional("base_size_descr", ValueType::String),
    ],
);

pub static DATASHEETS_WARGEAR: TableDef = TableDef::with_fields(
    "Datasheets_wargear",
    &[
        Field::required("datasheet_id", ValueType::Number),
        Field::optional("line", ValueType::Number),
        // Sort key together with `line`.
        Field::required("line_in_wargear", ValueType::Number),
        Field::optional("dice", ValueType::String),
        Field::optional("name", ValueType::String),
        Field::optional("description", ValueType::String),
        Field::optional("range", ValueType::NumOrConstant { constant: "Melee" }),
        Field::optional("type", ValueType::String),
        Field::required("A", ValueType::Die),
        Field::optional("BS_WS", ValueType::Number),
        Field::optional("S", ValueType::Die),
        Field::required("AP", ValueType::Number),
        Field::optional("D", ValueType::Die),
    ],
);

// ===========================================================================
// Download-only tables
// ===========================================================================

pub static SOURCE: TableDef = TableDef::unparsed("Source");
pub static DATASHEETS_ABILITIES: TableDef = TableDef::unparsed("Datasheets_abilities");
pub static DATASHEETS_KEYWORDS: TableDef = TableDef::unparsed("Datasheets_keywords");
pub static DATASHEETS_OPTIONS: TableDef = TableDef::unparsed("Datasheets_options");
pub static DATASHEETS_UNIT_COMPOSITION: TableDef =
    TableDef::unparsed("Datasheets_unit_composition");
pub static DATASHEETS_MODELS_COST: TableDef = TableDef::unparsed("Datasheets_models_cost");
pub static DATASHEETS_STRATAGEMS: TableDef = TableDef::unparsed("Datasheets_stratagems");
pub static DATASHEETS_ENHANCEMENTS: TableDef = TableDef::unparsed("Datasheets_enhancements");
pub static DATASHEETS_DETACHMENT_ABILITIES: TableDef =
    TableDef::unparsed("Datasheets_detachment_abilities");
pub static DATASHEETS_LEADER: TableDef = TableDef::unparsed("Datasheets_leader");
pub static STRATAGEMS: TableDef = TableDef::unparsed("Stratagems");
pub static ABILITIES: TableDef = TableDef::unparsed("Abilities");
pub static ENHANCEMENTS: TableDef = TableDef::unparsed("Enhancements");
pub static DETACHMENT_ABILITIES: TableDef = TableDef::unparsed("Detachment_abilities");
pub static DETACHMENTS: TableDef = TableDef::unparsed("Detachments");
pub static LAST_UPDATE: TableDef = TableDef::unparsed("Last_update");

/// Every table the publisher serves, parsed ones first.
pub static ALL_TABLES: [&TableDef; 20] = [
    &FACTIONS,
    &DATASHEETS,
    &DATASHEETS_MODELS,
    &DATASHEETS_WARGEAR,
    &SOURCE,
    &DATASHEETS_ABILITIES,
    &DATASHEETS_KEYWORDS,
    &DATASHEETS_OPTIONS,
    &DATASHEETS_UNIT_COMPOSITION,
    &DATASHEETS_MODELS_COST,
    &DATASHEETS_STRATAGEMS,
    &DATASHEETS_ENHANCEMENTS,
    &DATASHEETS_DETACHMENT_ABILITIES,
    &DATASHEETS_LEADER,
    &STRATAGEMS,
    &ABILITIES,
    &ENHANCEMENTS,
    &DETACHMENT_ABILITIES,
    &DETACHMENTS,
    &LAST_UPDATE,
];
