//! `armoury show`

use anyhow::{Result, anyhow};
use armoury_core::Diagnostics;
use armoury_data::{Pipeline, UnitIndex};

use super::resolve_config;
use crate::cli::SourceArgs;

/// Build the index in memory and print from it. Nothing is written.
pub fn handle(source: &SourceArgs, faction: &str, unit: Option<&str>) -> Result<()> {
    let pipeline = Pipeline::new(resolve_config(source)?)?;
    let index = pipeline.build_index(&mut Diagnostics::new())?;
    println!("{}", render(&index, faction, unit)?);
    Ok(())
}

fn render(index: &UnitIndex, faction: &str, unit: Option<&str>) -> Result<String> {
    let units = index.units(faction).ok_or_else(|| {
        let known: Vec<_> = index.factions().collect();
        anyhow!("unknown faction {faction:?}; known factions: {}", known.join(", "))
    })?;

    match unit {
        None => Ok(units.collect::<Vec<_>>().join("\n")),
        Some(unit) => {
            let entry = index
                .get(faction, unit)
                .ok_or_else(|| anyhow!("no unit {unit:?} in {faction}"))?;
            Ok(serde_json::to_string_pretty(entry)?)
        }
    }
}
