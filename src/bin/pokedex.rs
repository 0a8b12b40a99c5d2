//! Pokedex CLI
//!
//! Seeds an in-memory catalog from the remote listing, then prints the
//! requested terms (or the first page) as JSON.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use pokedex::{
    CatalogConfig, HttpPokemonSource, InMemoryPokemonStore, Pagination, PokemonCatalog, Reseeder,
};

#[derive(Debug, Parser)]
#[command(name = "pokedex", version, about = "Seed a Pokemon catalog and look up entries")]
struct Cli {
    /// Terms to resolve: catalog number, storage id or name
    terms: Vec<String>,

    /// Records to pull from the remote catalog (overrides SEED_LIMIT)
    #[arg(short = 'n', long)]
    seed_limit: Option<usize>,

    /// Remote catalog endpoint (overrides SOURCE_URL)
    #[arg(long)]
    source_url: Option<String>,

    /// Page size when no terms are given (overrides DEFAULT_LIMIT)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Records to skip when no terms are given
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CatalogConfig::from_env()?;
    if let Some(seed_limit) = cli.seed_limit {
        config.seed_limit = seed_limit;
    }
    if let Some(url) = cli.source_url {
        config.source_url = url;
    }

    let store = Arc::new(InMemoryPokemonStore::new());
    let source = Arc::new(HttpPokemonSource::from_config(&config)?);
    let report = Reseeder::with_config(store.clone(), source, &config)?.reseed()?;
    log::info!("{report}: {} pokemon from {}", report.inserted, config.source_url);

    let catalog = PokemonCatalog::with_config(store, &config);
    let output = if cli.terms.is_empty() {
        let page = Pagination {
            limit: cli.limit,
            offset: Some(cli.offset),
        };
        serde_json::to_string_pretty(&catalog.find_all(page)?)?
    } else {
        let mut found = Vec::with_capacity(cli.terms.len());
        for term in &cli.terms {
            match catalog.find_one(term) {
                Ok(pokemon) => found.push(pokemon),
                Err(e) if e.is_not_found() => log::warn!("{e}"),
                Err(e) => return Err(e.into()),
            }
        }
        serde_json::to_string_pretty(&found)?
    };
    println!("{output}");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
