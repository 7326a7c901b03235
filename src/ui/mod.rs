//! UIモジュール
//!
//! ステータスライン通知

pub mod status;

// 公開API
pub use status::{MessageLog, StatusMessage, StatusSink};
