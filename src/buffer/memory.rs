//! メモリ上のテキストバッファ
//!
//! `TextSurface` の参照実装。行ベースでテキストを保持し、複数選択・取り消し・
//! 削除失敗の注入に対応する。テストとセッション再生で使用する。

use super::cursor::{CursorMover, Motion, Position, Range, Selection};
use super::surface::{SurfaceCommand, TextSurface};
use crate::error::{surface::Result, SurfaceError};
use std::fmt;

const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone)]
struct Snapshot {
    lines: Vec<String>,
    selections: Vec<Selection>,
}

/// 行ベースのメモリバッファ
#[derive(Debug, Clone)]
pub struct MemorySurface {
    /// 行データ（常に1行以上）
    lines: Vec<String>,
    /// 選択一覧（先頭が主選択、常に1つ以上）
    selections: Vec<Selection>,
    /// 取り消し用スナップショット
    undo_stack: Vec<Snapshot>,
    /// 削除を拒否する範囲
    rejected_deletes: Vec<Range>,
    /// ページ移動の行数
    page_size: usize,
}

impl MemorySurface {
    /// 空のバッファを作成
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            selections: vec![Selection::default()],
            undo_stack: Vec::new(),
            rejected_deletes: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// テキストからバッファを作成（カーソルは先頭）
    pub fn from_text(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n");
        Self {
            lines: normalized.split('\n').map(str::to_string).collect(),
            ..Self::new()
        }
    }

    /// カーソル位置を設定
    pub fn with_caret(mut self, at: Position) -> Self {
        self.set_selection(Selection::caret(at));
        self
    }

    /// 選択一覧を設定
    pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
        self.set_selections(selections);
        self
    }

    /// ページ移動の行数を設定
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// 指定範囲の削除を失敗させる
    pub fn fail_deletes_at(&mut self, range: Range) {
        self.rejected_deletes.push(range);
    }

    /// 行データ
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 取り消し可能な編集数
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    fn check(&self, position: Position) -> Result<()> {
        let valid = position.line < self.lines.len()
            && position.column <= self.line_len(position.line);
        if valid {
            Ok(())
        } else {
            Err(SurfaceError::OutOfBounds {
                line: position.line,
                column: position.column,
            })
        }
    }

    fn check_range(&self, range: Range) -> Result<()> {
        self.check(range.start)?;
        self.check(range.end)
    }

    fn snapshot(&mut self) {
        self.undo_stack.push(Snapshot {
            lines: self.lines.clone(),
            selections: self.selections.clone(),
        });
    }

    /// 範囲をテキストで置き換え、挿入末尾位置を返す
    fn splice(&mut self, range: Range, text: &str) -> Position {
        let start_line = &self.lines[range.start.line];
        let prefix = start_line[..byte_index(start_line, range.start.column)].to_string();
        let end_line = &self.lines[range.end.line];
        let suffix = end_line[byte_index(end_line, range.end.column)..].to_string();

        let combined = format!("{}{}{}", prefix, text, suffix);
        let replacement: Vec<String> = combined.split('\n').map(str::to_string).collect();
        self.lines
            .splice(range.start.line..=range.end.line, replacement);

        let new_end = range.start.advanced_by(text);
        for selection in &mut self.selections {
            selection.anchor = shift(selection.anchor, range, new_end);
            selection.active = shift(selection.active, range, new_end);
        }
        new_end
    }

    fn type_text(&mut self, text: &str) {
        self.snapshot();
        let mut order: Vec<usize> = (0..self.selections.len()).collect();
        order.sort_by(|a, b| self.selections[*b].start().cmp(&self.selections[*a].start()));
        for index in order {
            let range = self.selections[index].range();
            let end = self.splice(range, text);
            self.selections[index] = Selection::caret(end);
        }
    }

    fn column_select(&mut self, motion: Motion) {
        let anchor = self.selection().anchor;
        let last_active = self
            .selections
            .last()
            .map(|s| s.active)
            .unwrap_or(anchor);
        let target = CursorMover::apply(&self.lines, last_active, motion, self.page_size);

        let line_numbers: Vec<usize> = if anchor.line <= target.line {
            (anchor.line..=target.line).collect()
        } else {
            (target.line..=anchor.line).rev().collect()
        };

        self.selections = line_numbers
            .into_iter()
            .map(|line| {
                let len = self.line_len(line);
                Selection::new(
                    Position::new(line, anchor.column.min(len)),
                    Position::new(line, target.column.min(len)),
                )
            })
            .collect();
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemorySurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

impl TextSurface for MemorySurface {
    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        let clamped: Vec<Selection> = selections
            .into_iter()
            .map(|s| {
                Selection::new(
                    CursorMover::clamp(&self.lines, s.anchor),
                    CursorMover::clamp(&self.lines, s.active),
                )
            })
            .collect();
        self.selections = if clamped.is_empty() {
            vec![Selection::default()]
        } else {
            clamped
        };
    }

    fn text(&self, range: Range) -> String {
        let start = CursorMover::clamp(&self.lines, range.start);
        let end = CursorMover::clamp(&self.lines, range.end);

        if start.line == end.line {
            let line = &self.lines[start.line];
            return line[byte_index(line, start.column)..byte_index(line, end.column)].to_string();
        }

        let first = &self.lines[start.line];
        let mut out = first[byte_index(first, start.column)..].to_string();
        for line in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        let last = &self.lines[end.line];
        out.push_str(&last[..byte_index(last, end.column)]);
        out
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    fn insert(&mut self, at: Position, text: &str) -> Result<()> {
        self.check(at)?;
        self.snapshot();
        self.splice(Range::empty(at), text);
        Ok(())
    }

    fn delete(&mut self, range: Range) -> Result<()> {
        self.check_range(range)?;
        if self.rejected_deletes.contains(&range) {
            return Err(SurfaceError::Rejected {
                reason: format!(
                    "delete {}:{}-{}:{} refused",
                    range.start.line, range.start.column, range.end.line, range.end.column
                ),
            });
        }
        self.snapshot();
        self.splice(range, "");
        Ok(())
    }

    fn replace(&mut self, range: Range, text: &str) -> Result<()> {
        self.check_range(range)?;
        self.snapshot();
        self.splice(range, text);
        Ok(())
    }

    fn execute(&mut self, command: SurfaceCommand) -> Result<()> {
        match command {
            SurfaceCommand::Move { motion, select } => {
                let lines = &self.lines;
                let page_size = self.page_size;
                for selection in &mut self.selections {
                    let target = CursorMover::apply(lines, selection.active, motion, page_size);
                    *selection = if select {
                        Selection::new(selection.anchor, target)
                    } else {
                        Selection::caret(target)
                    };
                }
            }
            SurfaceCommand::ColumnSelect(motion) => self.column_select(motion),
            SurfaceCommand::CancelSelection => {
                let primary = self.selection();
                self.selections = vec![Selection::caret(primary.active)];
            }
            SurfaceCommand::Type(text) => self.type_text(&text),
            SurfaceCommand::Undo => {
                if let Some(snapshot) = self.undo_stack.pop() {
                    self.lines = snapshot.lines;
                    self.selections = snapshot.selections;
                }
            }
        }
        Ok(())
    }
}

/// 文字単位の列からバイト位置へ変換
fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}

/// 編集後の位置補正
fn shift(position: Position, edited: Range, new_end: Position) -> Position {
    if position < edited.start {
        position
    } else if position < edited.end {
        edited.start
    } else if position.line == edited.end.line {
        Position::new(
            new_end.line,
            new_end.column + (position.column - edited.end.column),
        )
    } else {
        Position::new(position.line - edited.end.line + new_end.line, position.column)
    }
}
