//! Row parsing: a table's raw text to typed records.

use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::record::Record;
use crate::registry::SchemaError;
use crate::schema::{DELIMITER, Field, TableDef};
use crate::value::{CoerceError, Value, is_empty_cell};

const BOM: char = '\u{feff}';

/// Errors that abort the parse of a whole table.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("table {table} has no header row")]
    EmptyTable { table: String },

    #[error("missing header {field} in {table}")]
    MissingHeader { table: String, field: String },

    #[error("{table} line {line}, field {field}: {source}")]
    Cell {
        table: String,
        line: usize,
        field: String,
        raw: String,
        source: CoerceError,
    },
}

/// Parse the text of `table` into one record per data row.
///
/// `fields` selects a subset of the schema; `None` takes every declared
/// column. Each record holds exactly the selected fields, in header order.
/// Empty cells in required columns become [`Value::Missing`] and are
/// reported to `diag`.
pub fn parse_table(
    table: &TableDef,
    content: &str,
    fields: Option<&[&str]>,
    diag: &mut Diagnostics,
) -> Result<Vec<Record>, ParseError> {
    let projection = table.project(fields)?;
    let content = content.strip_prefix(BOM).unwrap_or(content);

    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Err(ParseError::EmptyTable {
            table: table.name.to_string(),
        });
    };
    let header = split_header(header_line);

    // (column index, field) for every selected field, in header order.
    let mut plan: Vec<(usize, &Field)> = Vec::with_capacity(projection.len());
    for field in projection {
        let column = header
            .iter()
            .position(|h| *h == field.name)
            .ok_or_else(|| ParseError::MissingHeader {
                table: table.name.to_string(),
                field: field.name.to_string(),
            })?;
        plan.push((column, field));
    }
    plan.sort_by_key(|(column, _)| *column);

    let mut records = Vec::new();
    for (line_no, line) in lines {
        let cells: Vec<&str> = line.split(DELIMITER).collect();
        let mut record = Record::new();
        for &(column, field) in &plan {
            let value = coerce_cell(table, field, cells.get(column).copied(), line_no, diag)?;
            record.insert(field.name, value);
        }
        records.push(record);
    }

    tracing::debug!(
        table = table.name,
        rows = records.len(),
        columns = plan.len(),
        "parsed table"
    );
    Ok(records)
}

fn split_header(line: &str) -> Vec<&str> {
    let mut header: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if header.last().is_some_and(|h| h.is_empty()) {
        header.pop();
    }
    header
}

fn coerce_cell(
    table: &TableDef,
    field: &Field,
    raw: Option<&str>,
    line: usize,
    diag: &mut Diagnostics,
) -> Result<Value, ParseError> {
    let raw = match raw {
        Some(raw) if !is_empty_cell(raw) => raw,
        _ => {
            if !field.optional {
                diag.report(Diagnostic::MissingRequiredValue {
                    table: table.name.to_string(),
                    field: field.name.to_string(),
                    line,
                });
            }
            return Ok(Value::Missing);
        }
    };

    field.value_type.parse(raw).map_err(|source| ParseError::Cell {
        table: table.name.to_string(),
        line,
        field: field.name.to_string(),
        raw: raw.to_string(),
        source,
    })
}
