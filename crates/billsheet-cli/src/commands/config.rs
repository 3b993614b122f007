//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use billsheet_core::models::config::BillsheetConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with the defaults
    Init {
        /// Output path for configuration file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Get a configuration value by dotted key (e.g., "extraction.missing_amount")
    Get { key: String },

    /// Set a configuration value by dotted key
    Set { key: String, value: String },

    /// Show configuration file path
    Path,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                println!(
                    "{} No config file found, showing defaults.",
                    style("ℹ").blue()
                );
            }
            let config = load_or_default(&path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { output, force } => {
            let output = output.unwrap_or(path);
            if output.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    output.display()
                );
            }
            save(&BillsheetConfig::default(), &output)?;
            println!(
                "{} Created configuration file at {}",
                style("✓").green(),
                output.display()
            );
        }
        ConfigCommand::Get { key } => {
            let config = load_or_default(&path)?;
            let value = lookup_key(&serde_json::to_value(&config)?, &key)?.clone();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ConfigCommand::Set { key, value } => {
            let config = load_or_default(&path)?;
            let (config, parsed) = assign_key(&config, &key, &value)?;
            save(&config, &path)?;
            println!(
                "{} Set {} = {}",
                style("✓").green(),
                key,
                serde_json::to_string(&parsed)?
            );
        }
        ConfigCommand::Path => {
            println!("Configuration file: {}", path.display());
            if path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!();
                println!("Run 'billsheet config init' to create a configuration file.");
            }
        }
    }

    Ok(())
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("billsheet")
        .join("config.json")
}

fn load_or_default(path: &Path) -> anyhow::Result<BillsheetConfig> {
    if path.exists() {
        Ok(BillsheetConfig::from_file(path)?)
    } else {
        Ok(BillsheetConfig::default())
    }
}

fn save(config: &BillsheetConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    Ok(())
}

fn lookup_key<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |current, part| {
        current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// Set `key` to `raw` and re-validate the whole configuration.
///
/// `raw` is read as JSON when it parses, else as a plain string.
fn assign_key(
    config: &BillsheetConfig,
    key: &str,
    raw: &str,
) -> anyhow::Result<(BillsheetConfig, Value)> {
    let parsed: Value =
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let mut json = serde_json::to_value(config)?;
    let (parent, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };

    let target = match parent {
        Some(parent) => parent.split('.').try_fold(&mut json, |current, part| {
            current
                .get_mut(part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))
        })?,
        None => &mut json,
    };

    let object = target
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path"))?;
    if !object.contains_key(leaf) {
        anyhow::bail!("Configuration key not found: {}", key);
    }
    object.insert(leaf.to_string(), parsed.clone());

    Ok((serde_json::from_value(json)?, parsed))
}
