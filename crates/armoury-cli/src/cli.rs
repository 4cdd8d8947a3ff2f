//! CLI argument definitions for armoury

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "armoury")]
#[command(version, about = "Builds a faction/unit/wargear index from datasheet exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the source tables and settings come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Configuration file (.ron, .toml or .json)
    #[arg(short, long, env = "ARMOURY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the <Table>.csv files
    #[arg(short, long, env = "ARMOURY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse the source tables and write the unit index
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (default: <data-dir>/Parsed_output.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Download every table before parsing
        #[arg(long)]
        redownload: bool,
    },

    /// Download every table into the data directory
    #[command(visible_alias = "f")]
    Fetch {
        #[command(flatten)]
        source: SourceArgs,

        /// Base URL the tables are served from
        #[arg(long)]
        base_url: Option<String>,
    },

    /// List the known tables with their origin and columns
    #[command(visible_alias = "t")]
    Tables {
        /// Base URL used to print origins
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Print a faction's units, or one unit's entry as JSON
    #[command(visible_alias = "s")]
    Show {
        /// Faction name, as it appears in the index
        faction: String,

        /// Unit name within the faction
        unit: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },
}
