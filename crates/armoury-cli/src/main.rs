mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            source,
            output,
            redownload,
        } => commands::build::handle(&source, output, redownload),

        Commands::Fetch { source, base_url } => commands::fetch::handle(&source, base_url),

        Commands::Tables { base_url } => commands::tables::handle(base_url.as_deref()),

        Commands::Show {
            faction,
            unit,
            source,
        } => commands::show::handle(&source, &faction, unit.as_deref()),
    }
}
