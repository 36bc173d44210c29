use crate::error::{Result, SelectorError};
use pump_selector_common::{MatchOptions, ValueMapping};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "store.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 選定データの保存先（未指定なら設定ディレクトリ内）
    pub store_path: Option<PathBuf>,
    pub max_results: usize,
    pub min_compatibility: u8,
    pub perfect_threshold: u8,
    pub stop_after_perfect: bool,
    /// 水源・吐出階の表記上書き
    pub mapping: ValueMapping,
}

impl Default for Config {
    fn default() -> Self {
        let options = MatchOptions::default();
        Self {
            store_path: None,
            max_results: options.max_results,
            min_compatibility: options.min_compatibility,
            perfect_threshold: options.perfect_threshold,
            stop_after_perfect: options.stop_after_perfect,
            mapping: ValueMapping::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SelectorError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pump-selector"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 保存先ストアのパス
    pub fn resolve_store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(STORE_FILE_NAME)),
        }
    }

    /// 照合エンジン用の設定に変換（範囲外なら設定エラー）
    pub fn match_options(&self) -> Result<MatchOptions> {
        let options = MatchOptions {
            max_results: self.max_results,
            min_compatibility: self.min_compatibility,
            perfect_threshold: self.perfect_threshold,
            stop_after_perfect: self.stop_after_perfect,
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.match_options().unwrap(), MatchOptions::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_results": 3, "mapping": {"source": {"farm": "canal"}}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.max_results, 3);
        assert_eq!(config.min_compatibility, 20);
        assert_eq!(config.mapping.map_source("farm"), "canal");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            store_path: Some(dir.path().join("store.json")),
            stop_after_perfect: true,
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let config = Config {
            min_compatibility: 99,
            ..Default::default()
        };
        assert!(matches!(config.match_options(), Err(SelectorError::Common(_))));
    }
}
