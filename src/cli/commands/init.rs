use crate::config::{ConfigProvider, YamlConfigProvider};
use crate::db::AuditStore;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

use crate::cli::parser::Cli;

/// Handle the `init` command
///
/// Creates the configuration file when it is missing (keeping an existing
/// one untouched) and the audit database with all pending migrations.
pub fn handle(cli: &Cli, provider: &YamlConfigProvider) -> AppResult<()> {
    let mut cfg = provider.load()?;
    if let Some(custom) = &cli.db {
        cfg.database = custom.clone();
    }

    info("Initializing zkexport…");

    if provider.path().exists() {
        info(format!("Config file : {} (kept)", provider.path().display()));
    } else {
        provider.save(&cfg)?;
        info(format!("Config file : {} (created)", provider.path().display()));
    }

    let store = AuditStore::open(&cfg.database)?;
    success(format!("Audit database initialized at {}", cfg.database));

    if let Err(e) = ttlog(
        store.conn(),
        "init",
        &cfg.database,
        "Audit database initialized",
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    if cfg.devices.is_empty() {
        warning("No device configured yet: add one under `devices` with `zkexport config --edit`.");
    }

    Ok(())
}
