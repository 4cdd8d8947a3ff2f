use std::collections::HashMap;

use crate::schema::{ALL_TABLES, DEFAULT_SOURCE_BASE, Field, TableDef};

/// Immutable lookup of table definitions by name. Validated on construction.
#[derive(Debug, Clone)]
pub struct Registry {
    tables: Vec<&'static TableDef>,
    name_to_index: HashMap<&'static str, usize>,
}

impl Registry {
    /// The registry of every table the publisher serves.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_tables(ALL_TABLES)
    }

    /// Build a registry from table definitions, rejecting duplicate table
    /// names and duplicate column names within a schema.
    pub fn from_tables<I>(tables: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = &'static TableDef>,
    {
        let mut registry = Self {
            tables: Vec::new(),
            name_to_index: HashMap::new(),
        };

        for table in tables {
            table.validate()?;
            if registry.name_to_index.contains_key(table.name) {
                return Err(SchemaError::DuplicateTable {
                    table: table.name.to_string(),
                });
            }
            registry
                .name_to_index
                .insert(table.name, registry.tables.len());
            registry.tables.push(table);
        }

        Ok(registry)
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Result<&'static TableDef, SchemaError> {
        self.name_to_index
            .get(name)
            .map(|&i| self.tables[i])
            .ok_or_else(|| SchemaError::UnknownTable {
                table: name.to_string(),
            })
    }

    /// Ordered field list of a parseable table.
    pub fn schema(&self, name: &str) -> Result<&'static [Field], SchemaError> {
        self.table(name)?.schema()
    }

    /// Remote origin of a table under `base`.
    pub fn origin(&self, name: &str, base: &str) -> Result<String, SchemaError> {
        Ok(self.table(name)?.source_url(base))
    }

    /// Remote origin under the publisher's default base URL.
    pub fn default_origin(&self, name: &str) -> Result<String, SchemaError> {
        self.origin(name, DEFAULT_SOURCE_BASE)
    }

    pub fn tables(&self) -> impl Iterator<Item = &'static TableDef> + '_ {
        self.tables.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Configuration errors: the code asked for something the schemas don't declare.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown table: {table}")]
    UnknownTable { table: String },
    #[error("table {table} does not have a schema")]
    NoSchema { table: String },
    #[error("field {field} is not declared in the schema of {table}")]
    UnknownField { table: String, field: String },
    #[error("field {field} is declared twice in the schema of {table}")]
    DuplicateField { table: String, field: String },
    #[error("table {table} is registered twice")]
    DuplicateTable { table: String },
}
