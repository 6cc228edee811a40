use clap::Subcommand;
use salespage_core::AppConfig;

use super::{print_json, CommandResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "log_level", "locker.persist_progress")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CommandResult {
    match action {
        ConfigAction::Get { key } => {
            let config = AppConfig::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = AppConfig::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            print_json(&AppConfig::load()?)?;
        }
        ConfigAction::Reset => {
            AppConfig::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
