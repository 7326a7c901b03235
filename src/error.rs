//! エラーハンドリングシステム
//!
//! キルリング・レジスタ・コード入力エンジン全体で使用するエラー型と、
//! ステータス表示用のメッセージ変換を定義する。
//! 編集系のエラーはすべて回復可能で、呼び出し元へ投げずにステータスへ報告する。

use std::time::Duration;
use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KillringError {
    /// 編集操作エラー
    #[error("Edit operation failed: {0}")]
    Edit(#[from] EditError),

    /// ホストバッファ操作エラー
    #[error("Surface operation failed: {0}")]
    Surface(#[from] SurfaceError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// スクリプト再生エラー
    #[error("Script error at line {line}: {message}")]
    Script { line: usize, message: String },
}

/// ホストのテキストバッファが返すエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Position {line}:{column} is out of bounds")]
    OutOfBounds { line: usize, column: usize },

    #[error("Edit rejected by host: {reason}")]
    Rejected { reason: String },

    #[error("Command not supported by host: {command}")]
    Unsupported { command: String },
}

/// 編集コマンドのエラー分類
///
/// `Display` はそのままステータスラインへ表示する文言になる。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// カット/コピーでリージョンが無い
    #[error("Not in region")]
    EmptyRegion,

    /// 大文字小文字変換でリージョンも単語も無い
    #[error("No region selected. Command aborted.")]
    NoRegionSelected,

    #[error("Kill ring is empty")]
    EmptyKillRing,

    #[error("Previous command was not a yank.")]
    StaleYank,

    #[error("Register does not contain text.")]
    EmptyRegister { name: Option<char> },

    #[error("No rectangle has been saved")]
    NoSavedRectangle,

    #[error("{0}")]
    UnsupportedChordVerb(UnsupportedVerb),

    /// 矩形キルの一部の削除が失敗した（適用済みの削除は戻さない）
    #[error("Error saving rectangle")]
    PartialRectangleFailure { failed: usize, total: usize },

    #[error("{0}")]
    Surface(#[from] SurfaceError),
}

/// 認識はするが未実装の矩形動詞
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedVerb {
    /// `C-x r o`
    OpenRectangle,
    /// `C-x r c`
    ClearRectangle,
    /// `C-x r t`
    StringRectangle,
}

impl std::fmt::Display for UnsupportedVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            UnsupportedVerb::OpenRectangle => "'C-x r o' (Open rectangle) is not supported.",
            UnsupportedVerb::ClearRectangle => "'C-x r c' (Blank out rectangle) is not supported.",
            UnsupportedVerb::StringRectangle => {
                "'C-x r t' (prefix each line with a string) is not supported."
            }
        };
        f.write_str(message)
    }
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cannot read configuration file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid configuration file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

/// 既定のメッセージ表示時間
pub const DEFAULT_MESSAGE_DURATION: Duration = Duration::from_millis(1000);

/// ステータス表示情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDisplay {
    /// 表示メッセージ
    pub message: String,
    /// エラーレベル
    pub level: ErrorLevel,
    /// 表示持続時間
    pub duration: Duration,
}

impl MessageDisplay {
    pub fn new(error: &EditError) -> Self {
        let (level, duration) = Self::classify(error);
        Self {
            message: error.to_string(),
            level,
            duration,
        }
    }

    fn classify(error: &EditError) -> (ErrorLevel, Duration) {
        match error {
            EditError::StaleYank => (ErrorLevel::Warning, Duration::from_millis(3000)),
            EditError::NoSavedRectangle => (ErrorLevel::Warning, Duration::from_millis(4000)),
            EditError::PartialRectangleFailure { .. } => {
                (ErrorLevel::Error, Duration::from_millis(5000))
            }
            EditError::UnsupportedChordVerb(_) => (ErrorLevel::Info, DEFAULT_MESSAGE_DURATION),
            EditError::Surface(_) => (ErrorLevel::Error, DEFAULT_MESSAGE_DURATION),
            EditError::EmptyRegion
            | EditError::NoRegionSelected
            | EditError::EmptyKillRing
            | EditError::EmptyRegister { .. } => (ErrorLevel::Warning, DEFAULT_MESSAGE_DURATION),
        }
    }

    /// 表示時間を上書き
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, KillringError>;

/// 各モジュール固有のResult型
pub mod edit {
    pub type Result<T> = std::result::Result<T, super::EditError>;
}

pub mod surface {
    pub type Result<T> = std::result::Result<T, super::SurfaceError>;
}
