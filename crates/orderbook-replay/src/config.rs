//! Configuration for the replay binary.
//!
//! Layers, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config path`)
//! 3. environment variables:
//!    - `ORDERBOOK_INPUT_PATH`        (default: "input_file.csv")
//!    - `ORDERBOOK_TRADING_ENABLED`   (default: "false")
//!    - `ORDERBOOK_CONTINUE_ON_ERROR` (default: "false")
//!    - `ORDERBOOK_BOOK_SEPARATOR`    (default: "true")
//! 4. command-line flags ([`Overrides`])

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use orderbook_core::EngineConfig;
use serde::Deserialize;

/// Replay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// CSV file to replay.
    pub input_path: PathBuf,

    /// Admit and match crossing orders instead of rejecting them.
    pub trading_enabled: bool,

    /// Log a failing book and move on instead of aborting the run.
    pub continue_on_error: bool,

    /// Print a blank line after each book's events.
    pub book_separator: bool,
}

/// Command-line overrides. A `false` flag leaves the lower layer alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub input_path: Option<PathBuf>,
    pub trading: bool,
    pub continue_on_error: bool,
    pub no_separator: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: PathBuf::from("input_file.csv"),
            trading_enabled: false,
            continue_on_error: false,
            book_separator: true,
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("invalid replay config")
    }

    /// Load a TOML config file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in config file {}", path.display()))
    }

    /// Override fields from the process environment.
    pub fn with_env(self) -> anyhow::Result<Self> {
        self.with_vars(|key| env::var(key).ok())
    }

    /// Override fields from any key lookup; unset keys keep the current value.
    pub fn with_vars<F>(self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let input_path = lookup("ORDERBOOK_INPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or(self.input_path);
        let trading_enabled =
            read_var_or_default(&lookup, "ORDERBOOK_TRADING_ENABLED", self.trading_enabled)?;
        let continue_on_error =
            read_var_or_default(&lookup, "ORDERBOOK_CONTINUE_ON_ERROR", self.continue_on_error)?;
        let book_separator =
            read_var_or_default(&lookup, "ORDERBOOK_BOOK_SEPARATOR", self.book_separator)?;

        Ok(Config {
            input_path,
            trading_enabled,
            continue_on_error,
            book_separator,
        })
    }

    /// Apply command-line flags, the highest-precedence layer.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(input) = &overrides.input_path {
            self.input_path = input.clone();
        }
        if overrides.trading {
            self.trading_enabled = true;
        }
        if overrides.continue_on_error {
            self.continue_on_error = true;
        }
        if overrides.no_separator {
            self.book_separator = false;
        }
        self
    }

    /// The part of the configuration the matching engine sees.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            trading_enabled: self.trading_enabled,
        }
    }
}

fn read_var_or_default<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value {val:?} for {key}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.input_path, PathBuf::from("input_file.csv"));
        assert!(!config.trading_enabled);
        assert!(!config.continue_on_error);
        assert!(config.book_separator);
        assert!(!config.engine_config().trading_enabled);
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let config = Config::from_toml_str("trading_enabled = true\n").unwrap();
        assert!(config.trading_enabled);
        assert_eq!(config.input_path, PathBuf::from("input_file.csv"));
        assert!(config.book_separator);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(Config::from_toml_str("trading = true\n").is_err());
    }

    #[test]
    fn env_overrides_file() {
        let base = Config::from_toml_str("trading_enabled = true\ninput_path = \"a.csv\"\n").unwrap();
        let config = base
            .with_vars(vars(&[
                ("ORDERBOOK_TRADING_ENABLED", "false"),
                ("ORDERBOOK_CONTINUE_ON_ERROR", " true "),
            ]))
            .unwrap();

        assert!(!config.trading_enabled);
        assert!(config.continue_on_error);
        assert_eq!(config.input_path, PathBuf::from("a.csv"));
    }

    #[test]
    fn flags_override_env_and_file() {
        let base = Config::from_toml_str(
            "trading_enabled = false\ninput_path = \"file.csv\"\nbook_separator = true\n",
        )
        .unwrap();
        let layered = base
            .with_vars(vars(&[
                ("ORDERBOOK_TRADING_ENABLED", "false"),
                ("ORDERBOOK_INPUT_PATH", "env.csv"),
                ("ORDERBOOK_BOOK_SEPARATOR", "true"),
            ]))
            .unwrap();

        let config = layered.with_overrides(&Overrides {
            input_path: Some(PathBuf::from("cli.csv")),
            trading: true,
            continue_on_error: true,
            no_separator: true,
        });

        assert_eq!(config.input_path, PathBuf::from("cli.csv"));
        assert!(config.trading_enabled);
        assert!(config.continue_on_error);
        assert!(!config.book_separator);
        assert!(config.engine_config().trading_enabled);
    }

    #[test]
    fn absent_flags_keep_lower_layers() {
        let layered = Config::default()
            .with_vars(vars(&[
                ("ORDERBOOK_TRADING_ENABLED", "true"),
                ("ORDERBOOK_INPUT_PATH", "env.csv"),
                ("ORDERBOOK_CONTINUE_ON_ERROR", "true"),
                ("ORDERBOOK_BOOK_SEPARATOR", "false"),
            ]))
            .unwrap();

        let config = layered.clone().with_overrides(&Overrides::default());
        assert_eq!(config, layered);
    }

    #[test]
    fn bad_env_value_is_an_error() {
        let err = Config::default()
            .with_vars(vars(&[("ORDERBOOK_BOOK_SEPARATOR", "yes")]))
            .unwrap_err();
        assert!(err.to_string().contains("ORDERBOOK_BOOK_SEPARATOR"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "input_path = \"books.csv\"").unwrap();
        writeln!(file, "book_separator = false").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.input_path, PathBuf::from("books.csv"));
        assert!(!config.book_separator);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Config::from_file(Path::new("/nonexistent/replay.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/replay.toml"));
    }
}
