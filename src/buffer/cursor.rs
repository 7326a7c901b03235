//! カーソル位置・範囲・選択の管理
//!
//! ホストバッファ上の位置は行・列（どちらも0ベース、列は文字単位）で表す。

use std::cmp::Ordering;

/// バッファ内の位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// 行番号（0ベース）
    pub line: usize,
    /// 列番号（0ベース、文字単位）
    pub column: usize,
}

impl Position {
    /// 指定位置を作成
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// この位置から `text` を挿入したときの挿入末尾位置
    pub fn advanced_by(&self, text: &str) -> Position {
        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or("");
        let mut end = Position::new(self.line, self.column + first.chars().count());
        for segment in segments {
            end = Position::new(end.line + 1, segment.chars().count());
        }
        end
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

/// 正規化済みの範囲（`start <= end`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// 2点から範囲を作成（順序は自動で揃える）
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// 空範囲を作成
    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 選択範囲（アンカーとアクティブ端）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    /// 選択開始側（マーク）
    pub anchor: Position,
    /// カーソル側
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// 空の選択（キャレット）を作成
    pub fn caret(at: Position) -> Self {
        Self {
            anchor: at,
            active: at,
        }
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.active)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }
}

/// カーソル移動の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Up,
    Down,
    Left,
    Right,
    /// 行内の移動
    LineStart,
    LineEnd,
    /// 単語単位の移動
    WordLeft,
    WordRight,
    /// ページ単位の移動
    PageUp,
    PageDown,
    /// バッファ全体の移動
    BufferStart,
    BufferEnd,
}

impl Motion {
    /// 全移動種別
    pub const ALL: [Motion; 12] = [
        Motion::Up,
        Motion::Down,
        Motion::Left,
        Motion::Right,
        Motion::LineStart,
        Motion::LineEnd,
        Motion::WordLeft,
        Motion::WordRight,
        Motion::PageUp,
        Motion::PageDown,
        Motion::BufferStart,
        Motion::BufferEnd,
    ];

    /// ホスト側の移動コマンド名
    pub fn name(&self) -> &'static str {
        match self {
            Motion::Up => "cursorUp",
            Motion::Down => "cursorDown",
            Motion::Left => "cursorLeft",
            Motion::Right => "cursorRight",
            Motion::LineStart => "cursorHome",
            Motion::LineEnd => "cursorEnd",
            Motion::WordLeft => "cursorWordLeft",
            Motion::WordRight => "cursorWordRight",
            Motion::PageUp => "cursorPageUp",
            Motion::PageDown => "cursorPageDown",
            Motion::BufferStart => "cursorTop",
            Motion::BufferEnd => "cursorBottom",
        }
    }

    /// コマンド名から移動種別を取得（`up` のような短縮名も許可）
    pub fn from_name(name: &str) -> Option<Motion> {
        let lowered = name.trim().to_ascii_lowercase();
        Motion::ALL.into_iter().find(|motion| {
            let full = motion.name().to_ascii_lowercase();
            full == lowered || full.trim_start_matches("cursor") == lowered
        })
    }
}

/// 行データ上でのカーソル移動
pub struct CursorMover;

impl CursorMover {
    /// 移動後の位置を計算（`lines` は1行以上）
    pub fn apply(lines: &[String], from: Position, motion: Motion, page_size: usize) -> Position {
        let from = Self::clamp(lines, from);
        match motion {
            Motion::Up => Self::vertical(lines, from, -1),
            Motion::Down => Self::vertical(lines, from, 1),
            Motion::Left => Self::move_backward(lines, from),
            Motion::Right => Self::move_forward(lines, from),
            Motion::LineStart => Position::new(from.line, 0),
            Motion::LineEnd => Position::new(from.line, line_len(lines, from.line)),
            Motion::WordLeft => Self::word_left(lines, from),
            Motion::WordRight => Self::word_right(lines, from),
            Motion::PageUp => Self::vertical(lines, from, -(page_size.max(1) as isize)),
            Motion::PageDown => Self::vertical(lines, from, page_size.max(1) as isize),
            Motion::BufferStart => Position::new(0, 0),
            Motion::BufferEnd => {
                let last = lines.len().saturating_sub(1);
                Position::new(last, line_len(lines, last))
            }
        }
    }

    /// 位置をバッファ範囲内に収める
    pub fn clamp(lines: &[String], position: Position) -> Position {
        let last = lines.len().saturating_sub(1);
        let line = position.line.min(last);
        Position::new(line, position.column.min(line_len(lines, line)))
    }

    fn vertical(lines: &[String], from: Position, delta: isize) -> Position {
        let last = lines.len().saturating_sub(1) as isize;
        let line = (from.line as isize + delta).clamp(0, last) as usize;
        Position::new(line, from.column.min(line_len(lines, line)))
    }

    fn move_forward(lines: &[String], from: Position) -> Position {
        if from.column < line_len(lines, from.line) {
            Position::new(from.line, from.column + 1)
        } else if from.line + 1 < lines.len() {
            Position::new(from.line + 1, 0)
        } else {
            from
        }
    }

    fn move_backward(lines: &[String], from: Position) -> Position {
        if from.column > 0 {
            Position::new(from.line, from.column - 1)
        } else if from.line > 0 {
            Position::new(from.line - 1, line_len(lines, from.line - 1))
        } else {
            from
        }
    }

    fn word_right(lines: &[String], from: Position) -> Position {
        let mut pos = from;
        // 単語以外を飛ばす（行末を越える）
        loop {
            let chars: Vec<char> = lines[pos.line].chars().collect();
            while pos.column < chars.len() && !is_word_char(chars[pos.column]) {
                pos.column += 1;
            }
            if pos.column < chars.len() || pos.line + 1 >= lines.len() {
                break;
            }
            pos = Position::new(pos.line + 1, 0);
        }
        let chars: Vec<char> = lines[pos.line].chars().collect();
        while pos.column < chars.len() && is_word_char(chars[pos.column]) {
            pos.column += 1;
        }
        pos
    }

    fn word_left(lines: &[String], from: Position) -> Position {
        let mut pos = from;
        loop {
            let chars: Vec<char> = lines[pos.line].chars().collect();
            while pos.column > 0 && !is_word_char(chars[pos.column - 1]) {
                pos.column -= 1;
            }
            if pos.column > 0 || pos.line == 0 {
                break;
            }
            pos = Position::new(pos.line - 1, line_len(lines, pos.line - 1));
        }
        let chars: Vec<char> = lines[pos.line].chars().collect();
        while pos.column > 0 && is_word_char(chars[pos.column - 1]) {
            pos.column -= 1;
        }
        pos
    }
}

fn line_len(lines: &[String], line: usize) -> usize {
    lines.get(line).map(|l| l.chars().count()).unwrap_or(0)
}

pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
