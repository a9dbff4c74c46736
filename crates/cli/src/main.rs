mod commands;

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use muster_core::{
    catalog::CatalogLoader,
    config::{self, AppConfig},
    MusterPolicy,
};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::commands::BuildRequest;

#[derive(Parser)]
#[command(name = "muster")]
#[command(about = "Boarding Actions roster builder")]
struct Cli {
    /// Catalog document to use instead of the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a catalog for integrity issues
    Validate,
    /// List factions, or the detachments and units of one faction
    List {
        /// Faction id to inspect
        faction: Option<String>,
        /// Case-insensitive filter on ids, names, and keywords
        #[arg(long)]
        search: Option<String>,
    },
    /// Muster a roster and print its categorized availability
    Build {
        /// Faction id
        #[arg(long)]
        faction: String,
        /// Detachment id within the faction
        #[arg(long)]
        detachment: String,
        /// Unit id to add; repeat to add several, in order
        #[arg(long = "add")]
        adds: Vec<String>,
        /// Reject adds that the mustering rules disallow
        #[arg(long)]
        strict: bool,
        /// Print a JSON snapshot instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config);

    let catalog_path = cli
        .catalog
        .unwrap_or_else(|| config.catalog_path.clone());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Validate => commands::validate(&catalog_path, &mut out),
        Commands::List { faction, search } => {
            let loader = CatalogLoader::new(catalog_path);
            commands::list(
                &loader,
                faction.as_deref(),
                search.as_deref().unwrap_or_default(),
                &mut out,
            )
        }
        Commands::Build {
            faction,
            detachment,
            adds,
            strict,
            json,
        } => {
            let loader = CatalogLoader::new(catalog_path);
            let policy = if strict {
                MusterPolicy::Strict
            } else {
                config.muster_policy()
            };
            let request = BuildRequest {
                faction,
                detachment,
                adds,
                policy,
                json,
            };
            commands::build(loader.catalog()?, &request, &mut out)
        }
    }
}

fn init_logging(config: &AppConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
