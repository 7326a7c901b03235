//! 入力処理モジュール
//!
//! コマンド名の解決・実行と、セッションスクリプトの再生を提供

pub mod commands;
pub mod script;

// 公開API
pub use commands::{execute, Command};
pub use script::{ReplayReport, SessionScript, Step};
