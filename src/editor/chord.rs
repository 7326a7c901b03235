//! 複数キー入力（`C-x r` 系）の状態機械
//!
//! プレフィックス後の入力文字を解釈し、終端アクションへ解決する。
//! 動詞待ちで未知の文字を受け取るとアイドルへ戻り、その文字は通常入力になる。

use super::modes::ModeSet;
use crate::error::UnsupportedVerb;

/// チョード入力の途中状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChordState {
    #[default]
    Idle,
    /// `C-x r` の次の動詞待ち
    AwaitingRegisterVerb,
    /// `C-x r s` の保存先レジスタ名待ち
    AwaitingRegisterSaveName,
    /// `C-x r i` の挿入元レジスタ名待ち
    AwaitingRegisterInsertName,
}

/// 矩形操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectangleVerb {
    Copy,
    Kill,
    Yank,
}

/// チョードが解決したアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordAction {
    Rectangle(RectangleVerb),
    Unsupported(UnsupportedVerb),
    PromptSaveName,
    PromptInsertName,
    /// 名前が取れない入力では `None`
    SaveToRegister(Option<char>),
    InsertFromRegister(Option<char>),
}

/// 入力文字の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// 通常入力としてバッファへ渡す
    PassThrough,
    /// チョードが消費した
    Consumed(ChordAction),
}

impl ChordState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ChordState::Idle)
    }

    /// 入力文字による遷移
    pub fn advance(self, text: &str) -> (ChordState, KeyDisposition) {
        use ChordAction::*;
        use KeyDisposition::Consumed;

        match self {
            ChordState::Idle => (ChordState::Idle, KeyDisposition::PassThrough),
            ChordState::AwaitingRegisterVerb => match single_char(text) {
                Some('r') => (ChordState::Idle, Consumed(Rectangle(RectangleVerb::Copy))),
                Some('k') => (ChordState::Idle, Consumed(Rectangle(RectangleVerb::Kill))),
                Some('y') => (ChordState::Idle, Consumed(Rectangle(RectangleVerb::Yank))),
                Some('o') => (
                    ChordState::Idle,
                    Consumed(Unsupported(UnsupportedVerb::OpenRectangle)),
                ),
                Some('c') => (
                    ChordState::Idle,
                    Consumed(Unsupported(UnsupportedVerb::ClearRectangle)),
                ),
                Some('t') => (
                    ChordState::Idle,
                    Consumed(Unsupported(UnsupportedVerb::StringRectangle)),
                ),
                Some('s') => (ChordState::AwaitingRegisterSaveName, Consumed(PromptSaveName)),
                Some('i') => (
                    ChordState::AwaitingRegisterInsertName,
                    Consumed(PromptInsertName),
                ),
                _ => (ChordState::Idle, KeyDisposition::PassThrough),
            },
            ChordState::AwaitingRegisterSaveName => {
                (ChordState::Idle, Consumed(SaveToRegister(single_char(text))))
            }
            ChordState::AwaitingRegisterInsertName => {
                (ChordState::Idle, Consumed(InsertFromRegister(single_char(text))))
            }
        }
    }
}

/// `ModeSet` のチョード状態を進める
pub struct ChordDispatcher;

impl ChordDispatcher {
    /// プレフィックス（`C-x r`）を受け付ける
    pub fn enter(modes: &mut ModeSet) {
        log::debug!("chord: {:?} -> AwaitingRegisterVerb", modes.chord());
        modes.set_chord(ChordState::AwaitingRegisterVerb);
    }

    /// 入力文字を処理し、その扱いを返す
    pub fn dispatch(modes: &mut ModeSet, text: &str) -> KeyDisposition {
        let current = modes.chord();
        let (next, disposition) = current.advance(text);
        if !current.is_idle() {
            log::debug!("chord: {:?} + {:?} -> {:?} ({:?})", current, text, next, disposition);
        }
        modes.set_chord(next);
        disposition
    }
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_passes_through() {
        let (next, disposition) = ChordState::Idle.advance("a");
        assert_eq!(next, ChordState::Idle);
        assert_eq!(disposition, KeyDisposition::PassThrough);
    }

    #[test]
    fn test_rectangle_verbs_return_to_idle() {
        for (key, verb) in [
            ("r", RectangleVerb::Copy),
            ("k", RectangleVerb::Kill),
            ("y", RectangleVerb::Yank),
        ] {
            let (next, disposition) = ChordState::AwaitingRegisterVerb.advance(key);
            assert_eq!(next, ChordState::Idle);
            assert_eq!(
                disposition,
                KeyDisposition::Consumed(ChordAction::Rectangle(verb))
            );
        }
    }

    #[test]
    fn test_register_save_sequence() {
        let (state, disposition) = ChordState::AwaitingRegisterVerb.advance("s");
        assert_eq!(state, ChordState::AwaitingRegisterSaveName);
        assert_eq!(
            disposition,
            KeyDisposition::Consumed(ChordAction::PromptSaveName)
        );

        let (state, disposition) = state.advance("q");
        assert_eq!(state, ChordState::Idle);
        assert_eq!(
            disposition,
            KeyDisposition::Consumed(ChordAction::SaveToRegister(Some('q')))
        );
    }

    #[test]
    fn test_unknown_verb_resets_and_passes_through() {
        for key in ["z", "", "rk"] {
            let (state, disposition) = ChordState::AwaitingRegisterVerb.advance(key);
            assert_eq!(state, ChordState::Idle);
            assert_eq!(disposition, KeyDisposition::PassThrough);
        }
    }

    #[test]
    fn test_multi_char_input_has_no_register_name() {
        let (_, disposition) = ChordState::AwaitingRegisterInsertName.advance("ab");
        assert_eq!(
            disposition,
            KeyDisposition::Consumed(ChordAction::InsertFromRegister(None))
        );
    }

    #[test]
    fn test_dispatcher_updates_mode_set() {
        let mut modes = ModeSet::new();
        ChordDispatcher::enter(&mut modes);
        assert_eq!(modes.chord(), ChordState::AwaitingRegisterVerb);

        let disposition = ChordDispatcher::dispatch(&mut modes, "o");
        assert_eq!(
            disposition,
            KeyDisposition::Consumed(ChordAction::Unsupported(UnsupportedVerb::OpenRectangle))
        );
        assert!(modes.chord().is_idle());
    }
}
