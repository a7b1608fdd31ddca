use crate::error::ConfigError;
use core_types::{is_valid_format, DEFAULT_DATE_FORMAT};
use serde::Deserialize;
use std::path::PathBuf;

/// The largest scale a `rust_decimal::Decimal` can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub metrics: MetricsConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Rejects settings the calculators cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.metrics.validate()?;
        if self.export.timestamp_format.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "export.timestamp_format must not be empty".to_string(),
            ));
        }
        check_format("export.timestamp_format", &self.export.timestamp_format)?;
        check_format("export.date_format", &self.export.date_format)
    }
}

/// Rejects chrono patterns with unknown or incomplete specifiers.
fn check_format(key: &str, format: &str) -> Result<(), ConfigError> {
    if is_valid_format(format) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{key} '{format}' is not a valid chrono format"
        )))
    }
}

/// Parameters for the per-record and aggregate metric calculations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// chrono format used to parse dates that arrive as text.
    pub date_format: String,
    /// Decimal places for profit and ROI figures.
    pub money_scale: u32,
    /// Decimal places for efficiency and per-unit figures.
    pub ratio_scale: u32,
    /// Decimal places for the average growth period.
    pub average_scale: u32,
    /// Decimal places for the average quantity per production.
    pub quantity_average_scale: u32,
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.date_format.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "metrics.date_format must not be empty".to_string(),
            ));
        }
        check_format("metrics.date_format", &self.date_format)?;
        let scales = [
            ("money_scale", self.money_scale),
            ("ratio_scale", self.ratio_scale),
            ("average_scale", self.average_scale),
            ("quantity_average_scale", self.quantity_average_scale),
        ];
        for (name, scale) in scales {
            if scale > MAX_DECIMAL_SCALE {
                return Err(ConfigError::ValidationError(format!(
                    "metrics.{name} must be at most {MAX_DECIMAL_SCALE}, got {scale}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            money_scale: 2,
            ratio_scale: 4,
            average_scale: 1,
            quantity_average_scale: 2,
        }
    }
}

/// Where and how CSV exports are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the CSV files land in. Created on demand.
    pub output_dir: PathBuf,
    /// chrono format for the timestamp embedded in default file names.
    pub timestamp_format: String,
    /// chrono format for dates rendered into CSV cells.
    pub date_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            timestamp_format: "%Y%m%d_%H%M%S".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// When set, logs are also written to a daily rolling file here.
    pub directory: Option<PathBuf>,
}
