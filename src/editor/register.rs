//! レジスタ
//!
//! 1文字の名前で参照する保存領域。中身はテキスト・位置・矩形のいずれか。

use crate::buffer::Position;
use std::collections::HashMap;

/// レジスタの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    Text,
    Point,
    Rectangle,
}

/// レジスタの中身
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterContent {
    /// リージョンのテキスト
    Text(String),
    /// カーソル位置
    Point(Position),
    /// 矩形（行ごとのテキスト）
    Rectangle(Vec<String>),
}

impl RegisterContent {
    pub fn from_region(text: impl Into<String>) -> Self {
        RegisterContent::Text(text.into())
    }

    /// 位置レジスタ（現状はチョード動詞から生成されない）
    pub fn from_point(position: Position) -> Self {
        RegisterContent::Point(position)
    }

    /// 矩形レジスタ（現状はチョード動詞から生成されない）
    pub fn from_rectangle(lines: Vec<String>) -> Self {
        RegisterContent::Rectangle(lines)
    }

    pub fn kind(&self) -> RegisterKind {
        match self {
            RegisterContent::Text(_) => RegisterKind::Text,
            RegisterContent::Point(_) => RegisterKind::Point,
            RegisterContent::Rectangle(_) => RegisterKind::Rectangle,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RegisterContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// 名前付きレジスタの集合（同名は後勝ち）
#[derive(Debug, Clone, Default)]
pub struct RegisterStore {
    storage: HashMap<char, RegisterContent>,
}

impl RegisterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// テキストを保存（種類に関わらず上書き）
    pub fn save_text(&mut self, name: char, text: impl Into<String>) {
        self.set(name, RegisterContent::from_region(text));
    }

    /// テキストレジスタの中身。未設定・テキスト以外はどちらも `None`
    pub fn get_text(&self, name: char) -> Option<&str> {
        self.storage.get(&name).and_then(RegisterContent::as_text)
    }

    pub fn set(&mut self, name: char, content: RegisterContent) {
        self.storage.insert(name, content);
    }

    pub fn get(&self, name: char) -> Option<&RegisterContent> {
        self.storage.get(&name)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn clear(&mut self) {
        self.storage.clear();
    }
}
