//! `tripplan` command-line front end.
//!
//! # Responsibility
//! - Parse commands, load config and open the configured store.
//! - Print results; all rules live in `tripplan_core`.

mod args;
mod commands;

use args::Cli;
use clap::Parser;
use commands::{execute, CliError};
use log::info;
use tripplan_core::{
    init_logging_from_config, CoreConfig, ItineraryService, ItineraryStore, OwnerKey,
};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Err(err) = init_logging_from_config(&config.logging) {
        eprintln!("warning: logging disabled: {err}");
    }

    let store = ItineraryStore::open(&config.storage).map_err(CliError::Store)?;
    info!(
        "event=cli_start module=cli status=ok backend={}",
        store.backend_name()
    );
    let service = ItineraryService::new(store);
    execute(cli.command, &service, &OwnerKey::new(cli.owner))
}
