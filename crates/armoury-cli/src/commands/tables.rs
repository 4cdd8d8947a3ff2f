//! `armoury tables`

use anyhow::Result;
use armoury_core::Registry;
use armoury_core::schema::{DEFAULT_SOURCE_BASE, TableDef};

pub fn handle(base_url: Option<&str>) -> Result<()> {
    let registry = Registry::builtin()?;
    let base = base_url.unwrap_or(DEFAULT_SOURCE_BASE);

    for table in registry.tables() {
        println!("{}", table.name);
        println!("  origin:  {}", table.source_url(base));
        println!("  columns: {}", describe_columns(table));
    }
    Ok(())
}

/// `name:type` per column, with `?` marking optional ones.
fn describe_columns(table: &TableDef) -> String {
    match table.schema() {
        Ok(fields) => fields
            .iter()
            .map(|f| {
                let marker = if f.optional { "?" } else { "" };
                format!("{}{marker}:{}", f.name, f.value_type)
            })
            .collect::<Vec<_>>()
            .join(", "),
        Err(_) => "(download only)".to_string(),
    }
}
