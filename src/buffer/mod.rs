//! バッファモジュール
//!
//! ホストバッファの抽象化と、テスト・再生用のメモリ実装

pub mod cursor;
pub mod memory;
pub mod surface;

// 公開API
pub use cursor::{CursorMover, Motion, Position, Range, Selection};
pub use memory::MemorySurface;
pub use surface::{SurfaceCommand, TextSurface};
