//! エディタモジュール
//!
//! キルリング・レジスタ・モード・チョードと、それらを束ねる編集エンジン

pub mod chord;
pub mod engine;
pub mod kill_ring;
pub mod modes;
pub mod register;

// 公開API
pub use chord::{ChordAction, ChordDispatcher, ChordState, KeyDisposition, RectangleVerb};
pub use engine::{CaseScope, Casing, EditingEngine, KeystrokeOutcome};
pub use kill_ring::{KillEntry, KillRing, DEFAULT_CAPACITY};
pub use modes::{Mode, ModeSet};
pub use register::{RegisterContent, RegisterKind, RegisterStore};

pub use crate::error::{EditError, UnsupportedVerb};
