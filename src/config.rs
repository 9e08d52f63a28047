//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-advisor.toml` in current directory
//! 4. `~/.config/sql-advisor/config.toml`
//! 5. Default values
//!
//! Files are merged key by key, so a local file only needs the settings it
//! changes.
//!
//! # Configuration File Format
//!
//! ```toml
//! [analysis]
//! dialect = "postgresql"      # generic, mysql, postgresql, sqlite, mssql
//! fail_on = "complex"         # moderate, complex
//!
//! [output]
//! format = "text"             # text, json, yaml
//! colored = true
//! verbose = false
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_ADVISOR_DIALECT` | Lexer dialect |
//! | `SQL_ADVISOR_FORMAT` | Output format |
//! | `SQL_ADVISOR_LOG` | Log level or filter directive |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::{
    analyzer::Complexity,
    error::{AppResult, config_error},
    output::OutputFormat,
    statement::SqlDialect
};

/// Config file looked up in the current directory
pub const LOCAL_CONFIG: &str = ".sql-advisor.toml";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output:   OutputConfig,
    #[serde(default)]
    pub logging:  LoggingConfig
}

/// Analysis settings
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    pub dialect: Option<String>,
    /// Lowest complexity that makes the run fail
    pub fail_on: Option<String>
}

/// Output settings
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub format:  Option<String>,
    pub colored: Option<bool>,
    pub verbose: Option<bool>
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>
}

impl Config {
    /// Load configuration from files and environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a file cannot be read or parsed, or
    /// if a dialect, format or fail-on value is not recognised.
    pub fn load() -> AppResult<Self> {
        let home = env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("sql-advisor")
                .join("config.toml")
        });
        let mut config = Self::from_files(home.as_deref(), Path::new(LOCAL_CONFIG))?;
        config.apply_env(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Merge the home and local config files, local winning. Missing files
    /// are skipped.
    pub fn from_files(home: Option<&Path>, local: &Path) -> AppResult<Self> {
        let mut config = Self::default();
        for path in home.into_iter().chain(std::iter::once(local)) {
            if path.exists() {
                config = config.merge(Self::from_file(path)?);
            }
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            config_error(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Override settings with environment variables
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dialect) = lookup("SQL_ADVISOR_DIALECT") {
            self.analysis.dialect = Some(dialect);
        }
        if let Some(format) = lookup("SQL_ADVISOR_FORMAT") {
            self.output.format = Some(format);
        }
        if let Some(level) = lookup("SQL_ADVISOR_LOG") {
            self.logging.level = Some(level);
        }
    }

    /// Settings of `other` take precedence over those of `self`
    pub fn merge(self, other: Self) -> Self {
        Self {
            analysis: AnalysisConfig {
                dialect: other.analysis.dialect.or(self.analysis.dialect),
                fail_on: other.analysis.fail_on.or(self.analysis.fail_on)
            },
            output:   OutputConfig {
                format:  other.output.format.or(self.output.format),
                colored: other.output.colored.or(self.output.colored),
                verbose: other.output.verbose.or(self.output.verbose)
            },
            logging:  LoggingConfig {
                level: other.logging.level.or(self.logging.level)
            }
        }
    }

    /// Check that every set value is recognised
    pub fn validate(&self) -> AppResult<()> {
        self.dialect()?;
        self.format()?;
        self.fail_on()?;
        Ok(())
    }

    pub fn dialect(&self) -> AppResult<Option<SqlDialect>> {
        self.analysis
            .dialect
            .as_deref()
            .map(|value| value.parse().map_err(config_error))
            .transpose()
    }

    pub fn format(&self) -> AppResult<Option<OutputFormat>> {
        self.output
            .format
            .as_deref()
            .map(|value| value.parse().map_err(config_error))
            .transpose()
    }

    pub fn fail_on(&self) -> AppResult<Option<Complexity>> {
        self.analysis
            .fail_on
            .as_deref()
            .map(parse_fail_on)
            .transpose()
    }
}

fn parse_fail_on(value: &str) -> AppResult<Complexity> {
    match value.trim().to_ascii_lowercase().as_str() {
        "moderate" => Ok(Complexity::Moderate),
        "complex" => Ok(Complexity::Complex),
        other => Err(config_error(format!(
            "unknown fail_on value '{}' (expected moderate or complex)",
            other
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let home = Config::from_toml("[analysis]\ndialect = \"mysql\"\n[output]\nverbose = true")
            .unwrap();
        let local = Config::from_toml("[analysis]\ndialect = \"sqlite\"").unwrap();
        let merged = home.merge(local);
        assert_eq!(merged.analysis.dialect.as_deref(), Some("sqlite"));
        assert_eq!(merged.output.verbose, Some(true));
    }

    #[test]
    fn test_apply_env() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "SQL_ADVISOR_FORMAT" => Some("json".to_string()),
            "SQL_ADVISOR_LOG" => Some("debug".to_string()),
            _ => None
        });
        assert_eq!(config.format().unwrap(), Some(OutputFormat::Json));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.dialect().unwrap(), None);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        let config = Config::from_toml("[analysis]\nfail_on = \"simple\"").unwrap();
        assert!(config.validate().is_err());
        let config = Config::from_toml("[analysis]\ndialect = \"oracle\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_toml("[server]\nport = 8080").is_err());
    }
}
