//! Named run presets stored as JSON files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use trading_core::types::Timeframe;
use tracing::info;

/// Preset storage errors.
#[derive(Error, Debug)]
pub enum PresetError {
    #[error("Preset not found: {0}")]
    NotFound(String),

    #[error("Invalid preset name: {0:?}")]
    InvalidName(String),

    #[error("Preset IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed preset: {0}")]
    Format(#[from] serde_json::Error),
}

/// Saved run parameters.
///
/// Credentials are not part of a preset. Fields such as `api_key` in older
/// files are ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub symbol: String,
    pub dollar_amount: Decimal,
    /// Seconds between cycles
    pub check_interval: u64,
    pub strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<Timeframe>,
    #[serde(default)]
    pub strategy_kwargs: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Directory of `<name>.json` presets.
#[derive(Debug, Clone)]
pub struct PresetStore {
    dir: PathBuf,
}

impl PresetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> Result<PathBuf, PresetError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PresetError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }

    /// Names of all saved presets, sorted. A missing directory holds none.
    pub fn list(&self) -> Result<Vec<String>, PresetError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str) -> Result<Preset, PresetError> {
        let path = self.path(name)?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PresetError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write a preset, replacing any existing one with the same name.
    pub fn save(&self, name: &str, preset: &Preset) -> Result<PathBuf, PresetError> {
        let path = self.path(name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, serde_json::to_string_pretty(preset)?)?;
        info!(preset = name, path = %path.display(), "preset saved");
        Ok(path)
    }

    pub fn delete(&self, name: &str) -> Result<(), PresetError> {
        let path = self.path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(PresetError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for PresetStore {
    fn default() -> Self {
        Self::new("presets")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn temp_store() -> PresetStore {
        let dir = std::env::temp_dir().join(format!("autotrader-presets-{}", uuid::Uuid::new_v4()));
        PresetStore::new(dir)
    }

    fn sample() -> Preset {
        Preset {
            symbol: "AAPL".into(),
            dollar_amount: dec!(500),
            check_interval: 30,
            strategy: "bollinger_bands".into(),
            timeframe: Some(Timeframe::Hour1),
            strategy_kwargs: serde_json::json!({"window": 20, "num_std": 2.0}),
            base_url: None,
        }
    }

    #[test]
    fn test_save_load_list_delete() {
        let store = temp_store();
        assert!(store.list().unwrap().is_empty());

        store.save("swing", &sample()).unwrap();
        store.save("day-trade", &sample()).unwrap();
        assert_eq!(store.list().unwrap(), vec!["day-trade", "swing"]);
        assert_eq!(store.load("swing").unwrap(), sample());

        store.delete("swing").unwrap();
        assert!(matches!(store.load("swing"), Err(PresetError::NotFound(_))));
        assert!(matches!(store.delete("swing"), Err(PresetError::NotFound(_))));

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_saved_file_has_no_credentials() {
        let store = temp_store();
        let path = store.save("plain", &sample()).unwrap();
        let raw = fs::read_to_string(path).unwrap();

        assert!(!raw.contains("api_key"));
        assert!(!raw.contains("secret"));
        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_rejects_path_like_names() {
        let store = temp_store();
        assert!(matches!(store.load("../etc/passwd"), Err(PresetError::InvalidName(_))));
        assert!(matches!(store.save("", &sample()), Err(PresetError::InvalidName(_))));
    }

    #[test]
    fn test_missing_preset_is_not_found() {
        let store = temp_store();
        assert!(matches!(store.load("nothing"), Err(PresetError::NotFound(_))));
    }
}
