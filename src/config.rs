//! 設定
//!
//! JSON 形式の設定ファイルを読み込む。項目が無い場合は既定値を使う。

use crate::editor::DEFAULT_CAPACITY;
use crate::error::ConfigError;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "altre-killring";
const CONFIG_FILE_NAME: &str = "config.json";

/// ログ出力設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 出力する最小レベル
    pub level: LogLevel,
    /// 追記先ファイル（未指定時は標準エラーのみ）
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warning,
            file: None,
        }
    }
}

/// エンジン設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// キルリングの最大保持数
    pub kill_ring_capacity: usize,
    /// 一時メッセージの既定表示時間（ミリ秒）
    pub default_message_ms: u64,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kill_ring_capacity: DEFAULT_CAPACITY,
            default_message_ms: 1000,
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// 既定の設定ファイルパス（`<config_dir>/altre-killring/config.json`）
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// 既定パスから読み込む。ファイルが無ければ既定値
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// 指定ファイルから読み込む
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_json(&content).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// JSON 文字列から読み込む
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(content).map_err(|err| ConfigError::Parse {
                path: "<inline>".to_string(),
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kill_ring_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "kill_ring_capacity".to_string(),
                value: self.kill_ring_capacity.to_string(),
            });
        }
        Ok(())
    }

    pub fn default_message_duration(&self) -> Duration {
        Duration::from_millis(self.default_message_ms)
    }
}
