//! Run configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid precision: {0}. Must be one of: single, double")]
    InvalidPrecision(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidFormat(String),

    #[error("Invalid number for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("Invalid lane count: {0}. Must be at most {max}", max = MAX_LANES)]
    InvalidLanes(usize),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Upper bound on dedicated worker threads.
pub const MAX_LANES: usize = 1024;

/// Log levels supported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Floating-point width used for points and lane outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Single,
    #[default]
    Double,
}

impl FromStr for Precision {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "f32" => Ok(Precision::Single),
            "double" | "f64" => Ok(Precision::Double),
            _ => Err(ConfigError::InvalidPrecision(s.to_string())),
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::Single => write!(f, "single"),
            Precision::Double => write!(f, "double"),
        }
    }
}

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Run configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Precision of points and lane outputs
    #[serde(deserialize_with = "deserialize_precision")]
    pub precision: Precision,
    /// Worker threads for the parallel launcher (0 = rayon default)
    pub lanes: usize,
    /// Seed for random shifts and Monte Carlo streams
    pub seed: u64,
    /// Output format
    #[serde(deserialize_with = "deserialize_format")]
    pub format: OutputFormat,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_precision<'de, D>(deserializer: D) -> Result<Precision, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Precision::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_format<'de, D>(deserializer: D) -> Result<OutputFormat, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OutputFormat::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            precision: Precision::Double,
            lanes: 0,
            seed: 12345,
            format: OutputFormat::Table,
        }
    }
}

const ENV_LOG_LEVEL: &str = "LATQMC_LOG_LEVEL";
const ENV_PRECISION: &str = "LATQMC_PRECISION";
const ENV_LANES: &str = "LATQMC_LANES";
const ENV_SEED: &str = "LATQMC_SEED";
const ENV_FORMAT: &str = "LATQMC_FORMAT";

impl RunConfig {
    /// Overwrite fields whose environment variable is set
    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Ok(precision) = std::env::var(ENV_PRECISION) {
            self.precision = Precision::from_str(&precision)?;
        }
        if let Ok(lanes) = std::env::var(ENV_LANES) {
            self.lanes = lanes.parse().map_err(|_| ConfigError::InvalidNumber {
                name: ENV_LANES,
                value: lanes,
            })?;
        }
        if let Ok(seed) = std::env::var(ENV_SEED) {
            self.seed = seed.parse().map_err(|_| ConfigError::InvalidNumber {
                name: ENV_SEED,
                value: seed,
            })?;
        }
        if let Ok(format) = std::env::var(ENV_FORMAT) {
            self.format = OutputFormat::from_str(&format)?;
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: RunConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes > MAX_LANES {
            return Err(ConfigError::InvalidLanes(self.lanes));
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(precision) = &cli.precision {
            self.precision = Precision::from_str(precision)?;
        }
        if let Some(lanes) = cli.lanes {
            self.lanes = lanes;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(format) = &cli.format {
            self.format = OutputFormat::from_str(format)?;
        }
        Ok(())
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Precision override
    pub precision: Option<String>,
    /// Worker thread override
    pub lanes: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
    /// Output format override
    pub format: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<RunConfig, ConfigError> {
    let mut config = if let Some(config_path) = &cli.config_file {
        RunConfig::from_file(config_path)?
    } else {
        RunConfig::default()
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.precision, Precision::Double);
        assert_eq!(config.lanes, 0);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.format, OutputFormat::Table);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_precision_parsing() {
        assert_eq!(Precision::from_str("single").unwrap(), Precision::Single);
        assert_eq!(Precision::from_str("F32").unwrap(), Precision::Single);
        assert_eq!(Precision::from_str("double").unwrap(), Precision::Double);
        assert!(Precision::from_str("half").is_err());
    }

    #[test]
    fn test_format_parsing_and_display() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(format!("{}", OutputFormat::Table), "table");
        assert!(OutputFormat::from_str("csv").is_err());
    }

    #[test]
    fn test_validate_lanes() {
        let mut config = RunConfig::default();
        config.lanes = MAX_LANES + 1;
        assert!(config.validate().is_err());

        config.lanes = 8;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = RunConfig::default();
        let cli = CliArgs {
            log_level: Some("debug".to_string()),
            precision: Some("single".to_string()),
            lanes: Some(4),
            seed: Some(7),
            format: Some("json".to_string()),
            config_file: None,
        };

        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.precision, Precision::Single);
        assert_eq!(config.lanes, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_args_merge_rejects_bad_value() {
        let mut config = RunConfig::default();
        let cli = CliArgs {
            precision: Some("quad".to_string()),
            ..Default::default()
        };
        assert!(config.merge_with_cli(&cli).is_err());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            log_level = "info"
            precision = "single"
            lanes = 16
            seed = 2024
            format = "json"
        "#;

        let config: RunConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.precision, Precision::Single);
        assert_eq!(config.lanes, 16);
        assert_eq!(config.seed, 2024);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let config: RunConfig = toml::from_str("seed = 1").unwrap();
        assert_eq!(config.seed, 1);
        assert_eq!(config.precision, Precision::Double);
        assert_eq!(config.format, OutputFormat::Table);
    }

    #[test]
    fn test_invalid_toml_value() {
        assert!(toml::from_str::<RunConfig>(r#"precision = "half""#).is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidLogLevel("bad".to_string());
        assert!(err.to_string().contains("Invalid log level"));

        let err = ConfigError::InvalidNumber {
            name: "LATQMC_SEED",
            value: "x".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid number for LATQMC_SEED: x");
    }
}
