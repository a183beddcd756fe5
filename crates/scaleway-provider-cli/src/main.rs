#![forbid(unsafe_code)]

mod cli;
mod commands;
mod errors;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use scaleway_provider::config::{ConfigStore, ProviderSettings, SETTINGS};
use scaleway_provider::logging;
use std::borrow::Cow;
use std::process::exit;
use tracing::debug;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => match ProviderSettings::load_from_file(path) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("{}", format!("Failed to load settings: {err}").red());
                exit(exitcode::CONFIG);
            }
        },
        None => SETTINGS.clone(),
    };
    if cli.verbose {
        settings.logging.filter_self_directive = Cow::Borrowed("debug");
    }
    if let Err(err) = logging::init(&settings.logging) {
        eprintln!("{}", format!("Failed to initialize logging: {err}").yellow());
    }

    let store = match ConfigStore::global() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("{}", format!("Failed to load configuration: {err}").red());
            exit(exitcode::CONFIG);
        }
    };
    debug!(path = ?store.path(), profile = ?store.profile(), "configuration store loaded");

    if let Err(err) = commands::run(&cli, store, &settings).await {
        eprintln!("{}", err.to_string().red());
        exit(err.exit_code());
    }
}
