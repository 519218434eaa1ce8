use crate::cli::parser::Commands;
use crate::config::{Config, ConfigProvider, YamlConfigProvider};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, success, warning};

use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, provider: &YamlConfigProvider) -> AppResult<()> {
    let Commands::Config {
        print_config,
        edit_config,
        editor,
        use_device,
    } = cmd
    else {
        return Ok(());
    };

    if let Some(index) = use_device {
        select_device(provider, *index)?;
    }

    if *print_config {
        let yaml = serde_yaml::to_string(cfg)
            .map_err(|e| AppError::Configuration(format!("cannot serialize config: {e}")))?;
        println!("📄 Current configuration ({}):\n", provider.path().display());
        println!("{yaml}");
    }

    if *edit_config {
        edit(provider, editor.as_deref())?;
    }

    Ok(())
}

/// Persist a new active device index. Reloads from disk so CLI overrides
/// (`--db`) never leak into the saved file.
fn select_device(provider: &YamlConfigProvider, index: usize) -> AppResult<()> {
    let mut stored = provider.load()?;
    if index >= stored.devices.len() {
        return Err(AppError::Configuration(format!(
            "no device at index {index} ({} device(s) configured)",
            stored.devices.len()
        )));
    }

    stored.active_device = index;
    provider.save(&stored)?;
    success(format!(
        "Active device set to #{index} ({})",
        stored.devices[index].name
    ));
    Ok(())
}

fn edit(provider: &YamlConfigProvider, requested: Option<&str>) -> AppResult<()> {
    let path = provider.path();
    if !path.exists() {
        provider.save(&provider.load()?)?;
    }

    let default_editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    let editor = requested.unwrap_or(default_editor.as_str());

    match Command::new(editor).arg(path).status() {
        Ok(s) if s.success() => {
            success(format!("Configuration file edited using '{editor}'"));
        }
        _ if editor != default_editor => {
            warning(format!(
                "Editor '{editor}' not available, falling back to '{default_editor}'"
            ));
            match Command::new(&default_editor).arg(path).status() {
                Ok(s) if s.success() => success(format!(
                    "Configuration file edited using fallback '{default_editor}'"
                )),
                _ => error(format!("Failed to edit configuration with '{default_editor}'")),
            }
        }
        _ => error(format!("Failed to edit configuration with '{editor}'")),
    }

    // reject an edit that no longer parses
    provider.load()?;
    Ok(())
}
