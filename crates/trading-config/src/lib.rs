//! Configuration management.
//!
//! Settings are layered: built-in defaults, an optional TOML file, then
//! `TRADING__*` environment variables. Presets and CLI flags are applied on
//! top by the binary.

mod presets;
mod settings;

pub use presets::{Preset, PresetError, PresetStore};
pub use settings::{AlpacaSettings, AppConfig, AppSettings, LoggingConfig, NewsSettings, TraderSettings};

use config::{Config, Environment, File};
use std::path::Path;
use thiserror::Error;

/// Default configuration file, loaded when present.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Preset(#[from] PresetError),
}

/// Load configuration from file and environment.
///
/// An explicit `path` must exist; without one the default file is optional.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, SettingsError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix("TRADING")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("autotrader-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            r#"
            [trader]
            symbol = "NVDA"
            dollar_amount = 750
            strategy = "rsi"

            [trader.params]
            window = 10
            "#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.trader.symbol, "NVDA");
        assert_eq!(config.trader.dollar_amount, dec!(750));
        assert_eq!(config.trader.params["window"], 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let path = std::env::temp_dir().join("autotrader-does-not-exist.toml");
        assert!(matches!(load_config(Some(&path)), Err(SettingsError::Load(_))));
    }
}
