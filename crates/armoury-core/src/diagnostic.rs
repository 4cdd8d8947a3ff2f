use std::fmt;

/// A non-fatal data-quality finding. The run continues after reporting one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A required column held an empty marker.
    MissingRequiredValue {
        table: String,
        field: String,
        line: usize,
    },
    /// A unit has no base-stats row and was left out of the index.
    MissingBaseStats { datasheet_id: String, unit: String },
    /// A unit's base-stats row has no name and was left out of the index.
    UnnamedBaseStats { datasheet_id: String, unit: String },
    /// Two units resolved to the same (faction, name) key; the later one won.
    UnitOverwritten {
        faction: String,
        unit: String,
        previous: String,
        replacement: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingRequiredValue { table, field, line } => write!(
                f,
                "missing required value for header {field} in {table} line {line}"
            ),
            Diagnostic::MissingBaseStats { datasheet_id, unit } => write!(
                f,
                "could not find base stats for datasheet {datasheet_id} ({unit})"
            ),
            Diagnostic::UnnamedBaseStats { datasheet_id, unit } => write!(
                f,
                "base stats for datasheet {datasheet_id} ({unit}) have no name"
            ),
            Diagnostic::UnitOverwritten {
                faction,
                unit,
                previous,
                replacement,
            } => write!(
                f,
                "{faction}/{unit}: datasheet {replacement} replaced datasheet {previous}"
            ),
        }
    }
}

/// Collected diagnostics for one run. Every report is also logged.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
