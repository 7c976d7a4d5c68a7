//! Settings
//!
//! Model overrides and logging options loaded from `config/` files and
//! `RL_CATALOG_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use crate::models::ModelConfigOverrides;

/// Environment variable selecting the environment-specific config file
pub const ENV_SELECTOR: &str = "RL_CATALOG_ENV";

/// Prefix of environment overrides (`RL_CATALOG_MODEL__USE_LSTM=true`)
pub const ENV_PREFIX: &str = "RL_CATALOG";

/// Top-level settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// Overrides merged over the model defaults
    #[serde(default)]
    pub model: ModelConfigOverrides,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CatalogSettings {
    /// Load settings from `config/` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    /// Load settings from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Environment-specific file, e.g. config/production.toml
            .add_source(
                File::from(config_dir.join(
                    std::env::var(ENV_SELECTOR).unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Ok(builder.build()?.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::Activation;
    use std::fs;

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[model]
fcnet_hiddens = [64, 32]
fcnet_activation = "relu"
_time_major = true
conv_filters = [[16, [4, 4], 2], [32, 3, 1]]

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let settings = CatalogSettings::load_from(dir.path()).unwrap();
        assert_eq!(settings.model.fcnet_hiddens, Some(vec![64, 32]));
        assert_eq!(settings.model.fcnet_activation, Some(Activation::Relu));
        assert_eq!(settings.model.time_major, Some(true));
        assert_eq!(settings.model.conv_filters.map(|f| f.len()), Some(2));
        assert_eq!(settings.logging.level, "debug");
        assert!(!settings.logging.json);
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CatalogSettings::load_from(dir.path().join("absent")).unwrap();
        assert_eq!(settings.model, ModelConfigOverrides::default());
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_unknown_model_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[model]\nfcnet_hidden = [64]\n",
        )
        .unwrap();

        assert!(CatalogSettings::load_from(dir.path()).is_err());
    }
}
