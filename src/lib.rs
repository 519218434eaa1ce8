//! zkexport library root.
//! Device session, reconciliation, export pipeline and audit store, plus the
//! CLI dispatcher used by main.rs.

pub mod cli;
pub mod config;
pub mod db;
pub mod device;
pub mod errors;
pub mod export;
pub mod models;
pub mod reconcile;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::{Config, ConfigProvider, YamlConfigProvider};
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, provider: &YamlConfigProvider) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, provider),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg, provider),
        Commands::Device { action } => cli::commands::device::handle(action, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::History { action } => cli::commands::history::handle(action, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let provider = match &cli.config {
        Some(path) => YamlConfigProvider::new(utils::path::expand_tilde(path)),
        None => YamlConfigProvider::default_location(),
    };

    let mut cfg = provider.load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg, &provider)
}
