//! Armoury Core -- schema-driven parsing for datasheet exports.
//!
//! The upstream publisher ships its game data as pipe-delimited tables. This
//! crate knows the shape of those tables and turns their raw text into typed
//! records, without touching the filesystem.
//!
//! # Pipeline position
//!
//! 1. **Schema** -- [`schema`] declares every table and the typed columns of
//!    the ones that feed the unit index. [`registry::Registry`] looks them up.
//! 2. **Coercion** -- [`value`] turns one cell into a [`value::Value`]
//!    according to its [`schema::ValueType`].
//! 3. **Rows** -- [`table::parse_table`] applies coercion to every row of a
//!    table and produces [`record::Record`]s.
//!
//! Joining records across tables and writing the result live in
//! `armoury-data`.
//!
//! # Failure model
//!
//! Malformed non-empty cells and missing headers abort the table parse with a
//! [`table::ParseError`]. Empty cells in required columns are tolerated: they
//! are recorded as [`value::Value::Missing`] and reported through
//! [`diagnostic::Diagnostics`].

pub mod diagnostic;
pub mod record;
pub mod registry;
pub mod schema;
pub mod table;
pub mod value;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use diagnostic::{Diagnostic, Diagnostics};
pub use record::Record;
pub use registry::{Registry, SchemaError};
pub use schema::{Field, TableDef, ValueType};
pub use table::{ParseError, parse_table};
pub use value::{CoerceError, Die, NumOrConstant, Value, coerce};
