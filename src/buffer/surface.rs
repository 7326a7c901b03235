//! ホストテキストバッファのインターフェース
//!
//! エンジンはホストエディタのバッファをこのトレイト越しに操作する。
//! 変更系メソッドの `Ok` は「編集が適用済み」であることを表し、
//! エンジンはそれを確認してからキルリングやレジスタへ記録する。

use super::cursor::{Motion, Position, Range, Selection};
use crate::error::surface::Result;

/// ホストの組み込みコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// カーソル移動（`select` で選択を伸ばす）
    Move { motion: Motion, select: bool },
    /// 矩形（列）選択を伸ばす
    ColumnSelect(Motion),
    /// 選択を解除して主カーソルのみ残す
    CancelSelection,
    /// 通常の文字入力（選択範囲は置き換える）
    Type(String),
    /// ホストの取り消し
    Undo,
}

impl SurfaceCommand {
    /// ホスト側のコマンド名
    pub fn name(&self) -> String {
        match self {
            SurfaceCommand::Move { motion, select: false } => motion.name().to_string(),
            SurfaceCommand::Move { motion, select: true } => format!("{}Select", motion.name()),
            SurfaceCommand::ColumnSelect(motion) => {
                format!("cursorColumnSelect{}", motion.name().trim_start_matches("cursor"))
            }
            SurfaceCommand::CancelSelection => "cancelSelection".to_string(),
            SurfaceCommand::Type(_) => "default:type".to_string(),
            SurfaceCommand::Undo => "undo".to_string(),
        }
    }
}

/// 編集対象となるホストバッファ
pub trait TextSurface {
    /// 全選択（先頭が主選択）
    fn selections(&self) -> Vec<Selection>;

    /// 全選択を置き換える
    fn set_selections(&mut self, selections: Vec<Selection>);

    /// 範囲内のテキストを取得
    fn text(&self, range: Range) -> String;

    /// 行数（空バッファでも1）
    fn line_count(&self) -> usize;

    /// 行の文字数
    fn line_len(&self, line: usize) -> usize;

    /// 指定位置に挿入
    fn insert(&mut self, at: Position, text: &str) -> Result<()>;

    /// 範囲を削除
    fn delete(&mut self, range: Range) -> Result<()>;

    /// 範囲を置換
    fn replace(&mut self, range: Range, text: &str) -> Result<()>;

    /// 組み込みコマンドを実行
    fn execute(&mut self, command: SurfaceCommand) -> Result<()>;

    /// 主選択
    fn selection(&self) -> Selection {
        self.selections().first().copied().unwrap_or_default()
    }

    /// 主選択のみにする
    fn set_selection(&mut self, selection: Selection) {
        self.set_selections(vec![selection]);
    }

    /// 1行分のテキスト
    fn line_text(&self, line: usize) -> String {
        self.text(Range::new(
            Position::new(line, 0),
            Position::new(line, self.line_len(line)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_follow_host_conventions() {
        let plain = SurfaceCommand::Move { motion: Motion::LineEnd, select: false };
        assert_eq!(plain.name(), "cursorEnd");

        let select = SurfaceCommand::Move { motion: Motion::LineEnd, select: true };
        assert_eq!(select.name(), "cursorEndSelect");

        assert_eq!(
            SurfaceCommand::ColumnSelect(Motion::Down).name(),
            "cursorColumnSelectDown"
        );
        assert_eq!(SurfaceCommand::Type("x".into()).name(), "default:type");
    }
}
