//! altre-killring - Emacs-style kill ring, registers and chords for a host editor
//!
//! ホストエディタのバッファ上で動くキル／ヤンク・レジスタ・矩形編集エンジン

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod buffer;

// 編集層
pub mod editor;

// ロジック層
pub mod input;

// 表示層
pub mod ui;

// 公開API
pub use buffer::{MemorySurface, Motion, Position, Range, Selection, SurfaceCommand, TextSurface};
pub use config::EngineConfig;
pub use editor::{EditingEngine, KillRing, Mode, RegisterStore};
pub use error::{EditError, KillringError, Result};
pub use input::{Command, SessionScript};
pub use ui::{MessageLog, StatusSink};
