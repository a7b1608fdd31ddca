use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, ExportConfig, LogLevel, LoggingConfig, MetricsConfig};

/// The file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `AGROTRACK__EXPORT__OUTPUT_DIR`.
pub const ENV_PREFIX: &str = "AGROTRACK";

/// Loads the application configuration.
///
/// Without an explicit `path`, `config.toml` in the working directory is used
/// if it exists and built-in defaults otherwise. An explicit path must exist.
/// Environment variables prefixed with `AGROTRACK__` override file values.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file_source = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file_source)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_export_conventions() {
        let config = Config::default();
        assert_eq!(config.metrics.money_scale, 2);
        assert_eq!(config.metrics.ratio_scale, 4);
        assert_eq!(config.metrics.date_format, "%Y-%m-%d");
        assert_eq!(config.export.output_dir, Path::new("data"));
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[metrics]\nratio_scale = 6\n\n[export]\noutput_dir = \"out\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.metrics.ratio_scale, 6);
        assert_eq!(config.metrics.money_scale, 2);
        assert_eq!(config.export.output_dir, Path::new("out"));
        assert_eq!(config.export.timestamp_format, "%Y%m%d_%H%M%S");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            load_config(Some(&missing)),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn malformed_chrono_formats_are_rejected() {
        let mut config = Config::default();
        config.export.timestamp_format = "%Q".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = Config::default();
        config.export.date_format = "%Y-%m-%".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = Config::default();
        config.metrics.date_format = "%d/%Q".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn malformed_format_in_file_fails_to_load() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[export]\ntimestamp_format = \"%Q\"").unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn oversized_scale_is_rejected() {
        let mut config = Config::default();
        config.metrics.money_scale = 40;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
