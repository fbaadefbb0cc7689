//! Configuration management for kiln
//!
//! This crate provides functionality for managing the kiln configuration stored at
//! `$HOME/.kiln/config.toml`, including loading, saving, updating, and deleting settings.

/// Error types for the configuration module
pub mod error;

use crate::error::Error;
use clap::Parser;
use kiln_common::utils::io::file::{delete_path, read_file, write_file};
use serde::{Deserialize, Serialize};
#[allow(deprecated)]
use std::env::home_dir;
use std::{path::PathBuf, str::FromStr};
use tracing::{debug, error, info};

/// Command line arguments for the configuration command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display and edit the current configuration",
    override_usage = "kiln config [OPTIONS]"
)]
pub struct ConfigArgs {
    /// The target key to update.
    #[clap(required = false, default_value = "")]
    key: String,

    /// The value to set the key to.
    #[clap(required = false, default_value = "")]
    value: String,
}

/// The [`Configuration`] struct holds the interpreter defaults used by the CLI. Command-line
/// flags take precedence over these values.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// Maximum number of instructions executed across a whole call tree. TOML integers are
    /// signed, so values above `i64::MAX` cannot be stored.
    pub step_limit: u64,

    /// Maximum nesting depth of CALL and CREATE frames
    pub max_call_depth: usize,

    /// Maximum size of a frame's memory, in bytes
    pub memory_limit: usize,

    /// Gas limit reported to executed code when none is given
    pub gas_limit: u64,

    /// Chain id reported by CHAINID when none is given
    pub chain_id: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            step_limit: 100_000_000,
            max_call_depth: 1024,
            memory_limit: 32 * 1024 * 1024,
            gas_limit: 30_000_000,
            chain_id: 1,
        }
    }
}

/// Returns the path of the configuration file.
#[allow(deprecated)]
fn config_path() -> Result<String, Error> {
    let mut home: PathBuf = home_dir().ok_or_else(|| {
        Error::Generic(
            "failed to get home directory. does your os support `std::env::home_dir()`?"
                .to_string(),
        )
    })?;
    home.push(".kiln");
    home.push("config.toml");

    home.to_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))
}

/// Parses `value` as the type of the configuration key it is assigned to.
fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, Error>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| {
        Error::ParseError(format!("invalid value '{value}' for key '{key}': {e}"))
    })
}

impl Configuration {
    /// Returns the current configuration, creating the file with defaults if it is missing.
    pub fn load() -> Result<Self, Error> {
        let path = config_path()?;

        // if the config file doesn't exist, create it
        if !std::path::Path::new(&path).exists() {
            debug!("creating default configuration at {}", path);
            Configuration::default().save()?;
        }

        let contents = read_file(&path)
            .map_err(|e| Error::Generic(format!("failed to read config file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("failed to parse config file: {e}")))
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), Error> {
        write_file(
            &config_path()?,
            &toml::to_string(&self)
                .map_err(|e| Error::ParseError(format!("failed to serialize config: {e}")))?,
        )
        .map_err(|e| Error::Generic(format!("failed to write config file: {e}")))?;

        Ok(())
    }

    /// Deletes the configuration file at `$HOME/.kiln/config.toml`.
    pub fn delete() -> Result<(), Error> {
        delete_path(&config_path()?);
        Ok(())
    }

    /// Update a single key/value pair in the configuration.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        // update the key in the struct and ensure it's the correct type
        match key {
            "step_limit" => self.step_limit = parse_value(key, value)?,
            "max_call_depth" => self.max_call_depth = parse_value(key, value)?,
            "memory_limit" => self.memory_limit = parse_value(key, value)?,
            "gas_limit" => self.gas_limit = parse_value(key, value)?,
            "chain_id" => self.chain_id = parse_value(key, value)?,
            _ => {
                return Err(Error::Generic(format!(
                    "invalid key: \'{key}\' is not a valid configuration key."
                )))
            }
        }

        // write the updated config to disk
        self.save()?;

        Ok(())
    }
}

/// The `config` command is used to display and edit the current configuration.
pub fn config(args: ConfigArgs) -> Result<(), Error> {
    if !args.key.is_empty() {
        if !args.value.is_empty() {
            // read the config file and update the key/value pair
            let mut config = Configuration::load()?;
            config.update(&args.key, &args.value)?;
            info!("updated configuration! Set \'{}\' = \'{}\' .", &args.key, &args.value);
        } else {
            // key is set, but no value is set
            error!("found key but no value to set. Please specify a value to set, use `kiln config --help` for more information.");
        }
    } else {
        // no key is set, print the config file
        println!("{:#?}", Configuration::load()?);
        info!("use `kiln config <KEY> <VALUE>` to set a key/value pair.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.step_limit, 100_000_000);
        assert_eq!(config.max_call_depth, 1024);
        assert_eq!(config.memory_limit, 32 * 1024 * 1024);
        assert_eq!(config.chain_id, 1);
    }

    #[test]
    #[serial]
    fn test_load_configuration() {
        // delete config file if it exists
        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config, Configuration::default());
    }

    #[test]
    #[serial]
    fn test_save_configuration() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::default();

        config.update("step_limit", "100000").expect("failed to update step_limit");
        config.update("chain_id", "10").expect("failed to update chain_id");

        let loaded_config = Configuration::load().expect("failed to load config file");
        assert_eq!(loaded_config.step_limit, 100_000);
        assert_eq!(loaded_config.chain_id, 10);
        assert_eq!(loaded_config.max_call_depth, 1024);

        Configuration::delete().expect("failed to delete config file");
    }

    #[test]
    #[serial]
    fn test_update_rejects_bad_input() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::default();

        assert!(matches!(config.update("rpc_url", "http://localhost:8545"), Err(Error::Generic(_))));
        assert!(matches!(config.update("step_limit", "lots"), Err(Error::ParseError(_))));
        assert_eq!(config, Configuration::default());
    }

    #[test]
    #[serial]
    fn test_delete_configuration() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::load().expect("failed to load config file");
        config.update("max_call_depth", "16").expect("failed to update max_call_depth");

        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config.max_call_depth, 1024);
        Configuration::delete().expect("failed to delete config file");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Configuration =
            toml::from_str("chain_id = 5\n").expect("failed to parse configuration");

        assert_eq!(config.chain_id, 5);
        assert_eq!(config.step_limit, 100_000_000);
    }
}
