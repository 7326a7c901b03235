//! 編集モード
//!
//! マーク・矩形マーク・CUA の各モードと、複数キー入力の途中状態を保持する。
//! マークと矩形マークの排他はこの型では強制せず、切り替える側で保証する。

use super::chord::ChordState;

/// 独立して切り替わる編集モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Mark,
    RectangleMark,
    Cua,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Mark => "Mark",
            Mode::RectangleMark => "RectangleMark",
            Mode::Cua => "Cua",
        }
    }
}

/// 現在有効なモードの集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSet {
    mark: bool,
    rectangle_mark: bool,
    cua: bool,
    chord: ChordState,
}

impl ModeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, mode: Mode) -> bool {
        *self.flag(mode)
    }

    pub fn activate(&mut self, mode: Mode) {
        *self.flag_mut(mode) = true;
    }

    pub fn deactivate(&mut self, mode: Mode) {
        *self.flag_mut(mode) = false;
    }

    /// 切り替え後の状態を返す
    pub fn toggle(&mut self, mode: Mode) -> bool {
        let flag = self.flag_mut(mode);
        *flag = !*flag;
        *flag
    }

    /// CUA 以外の一時的なモードとチョード状態を解除
    pub fn deactivate_temp_modes(&mut self) {
        self.mark = false;
        self.rectangle_mark = false;
        self.chord = ChordState::Idle;
    }

    /// 有効なモード一覧
    pub fn active_modes(&self) -> Vec<Mode> {
        [Mode::Mark, Mode::RectangleMark, Mode::Cua]
            .into_iter()
            .filter(|mode| self.is_active(*mode))
            .collect()
    }

    /// ツールチップ用の説明
    pub fn describe(&self) -> String {
        self.active_modes()
            .iter()
            .map(|mode| format!("{} mode active", mode.label()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn chord(&self) -> ChordState {
        self.chord
    }

    pub fn set_chord(&mut self, state: ChordState) {
        self.chord = state;
    }

    fn flag(&self, mode: Mode) -> &bool {
        match mode {
            Mode::Mark => &self.mark,
            Mode::RectangleMark => &self.rectangle_mark,
            Mode::Cua => &self.cua,
        }
    }

    fn flag_mut(&mut self, mode: Mode) -> &mut bool {
        match mode {
            Mode::Mark => &mut self.mark,
            Mode::RectangleMark => &mut self.rectangle_mark,
            Mode::Cua => &mut self.cua,
        }
    }
}
