//! コマンド定義と実行
//!
//! 論理コマンド名・キー名をエンジンのハンドラへ対応付ける。

use crate::buffer::{Motion, TextSurface};
use crate::editor::{CaseScope, Casing, EditingEngine};
use crate::ui::StatusSink;
use std::fmt;

/// エンジンの操作一覧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Kill,
    Copy,
    Cut,
    Yank,
    YankPop,
    ToggleMark,
    EnterMark,
    ExitMark,
    ToggleRectangleMark,
    ToggleCua,
    CuaCut,
    CuaCopy,
    CuaPaste,
    /// `C-x r`
    RegisterPrefix,
    CopyToRegister(char),
    InsertRegister(char),
    CopyRectangle,
    KillRectangle,
    YankRectangle,
    ChangeCase(Casing, CaseScope),
    DeleteBlankLines,
    Undo,
    Abort,
    Move(Motion),
}

impl Command {
    /// コマンド名またはキー名から解析
    ///
    /// レジスタ操作は `copy-to-register:a` のように名前を付ける。
    pub fn parse(name: &str) -> Option<Command> {
        let name = name.trim();
        if let Some((verb, register)) = name.split_once(':') {
            let mut chars = register.chars();
            let register = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => return None,
            };
            return match verb {
                "copy-to-register" => Some(Command::CopyToRegister(register)),
                "insert-register" => Some(Command::InsertRegister(register)),
                _ => None,
            };
        }

        let command = match name {
            "kill" | "kill-line" | "C-k" => Command::Kill,
            "copy" | "kill-ring-save" | "M-w" => Command::Copy,
            "cut" | "kill-region" | "C-w" => Command::Cut,
            "yank" | "C-y" => Command::Yank,
            "yank-pop" | "M-y" => Command::YankPop,
            "toggle-mark" | "set-mark" | "C-SPC" | "C-@" => Command::ToggleMark,
            "enter-mark" | "enterMarkMode" => Command::EnterMark,
            "exit-mark" | "exitMarkMode" => Command::ExitMark,
            "toggle-rectangle-mark" | "rectangle-mark-mode" | "C-x_SPC" => {
                Command::ToggleRectangleMark
            }
            "toggle-cua" | "toggleCuaMode" => Command::ToggleCua,
            "cua-cut" | "cuaCut" => Command::CuaCut,
            "cua-copy" | "cuaCopy" => Command::CuaCopy,
            "cua-paste" | "cuaPaste" => Command::CuaPaste,
            "register-prefix" | "C-x_r" => Command::RegisterPrefix,
            "copy-rectangle" => Command::CopyRectangle,
            "kill-rectangle" => Command::KillRectangle,
            "yank-rectangle" => Command::YankRectangle,
            "upcase-region" | "uppercaseRegion" => {
                Command::ChangeCase(Casing::Upper, CaseScope::Region)
            }
            "downcase-region" | "lowercaseRegion" => {
                Command::ChangeCase(Casing::Lower, CaseScope::Region)
            }
            "upcase-word" | "uppercaseWord" => Command::ChangeCase(Casing::Upper, CaseScope::Word),
            "downcase-word" | "lowercaseWord" => {
                Command::ChangeCase(Casing::Lower, CaseScope::Word)
            }
            "capitalize-word" | "capitaliseWord" => {
                Command::ChangeCase(Casing::Capitalize, CaseScope::Word)
            }
            "capitalize-region" => Command::ChangeCase(Casing::Capitalize, CaseScope::Region),
            "delete-blank-lines" | "C-x_C-o" => Command::DeleteBlankLines,
            "undo" | "C-x_u" | "C-/" => Command::Undo,
            "abort" | "keyboard-quit" | "abortCommand" | "C-g" => Command::Abort,
            other => return Motion::from_name(other).map(Command::Move),
        };
        Some(command)
    }

    /// 論理コマンド名
    pub fn name(&self) -> String {
        let name = match self {
            Command::Kill => "kill",
            Command::Copy => "copy",
            Command::Cut => "cut",
            Command::Yank => "yank",
            Command::YankPop => "yank-pop",
            Command::ToggleMark => "toggle-mark",
            Command::EnterMark => "enter-mark",
            Command::ExitMark => "exit-mark",
            Command::ToggleRectangleMark => "toggle-rectangle-mark",
            Command::ToggleCua => "toggle-cua",
            Command::CuaCut => "cua-cut",
            Command::CuaCopy => "cua-copy",
            Command::CuaPaste => "cua-paste",
            Command::RegisterPrefix => "register-prefix",
            Command::CopyToRegister(register) => return format!("copy-to-register:{}", register),
            Command::InsertRegister(register) => return format!("insert-register:{}", register),
            Command::CopyRectangle => "copy-rectangle",
            Command::KillRectangle => "kill-rectangle",
            Command::YankRectangle => "yank-rectangle",
            Command::ChangeCase(Casing::Upper, CaseScope::Region) => "upcase-region",
            Command::ChangeCase(Casing::Lower, CaseScope::Region) => "downcase-region",
            Command::ChangeCase(Casing::Capitalize, CaseScope::Region) => "capitalize-region",
            Command::ChangeCase(Casing::Upper, CaseScope::Word) => "upcase-word",
            Command::ChangeCase(Casing::Lower, CaseScope::Word) => "downcase-word",
            Command::ChangeCase(Casing::Capitalize, CaseScope::Word) => "capitalize-word",
            Command::DeleteBlankLines => "delete-blank-lines",
            Command::Undo => "undo",
            Command::Abort => "abort",
            Command::Move(motion) => motion.name(),
        };
        name.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// コマンドを実行し、成否を返す
///
/// カット・コピー・ヤンクは成功時にステータスへ通知する。失敗はハンドラ側で報告済み。
pub fn execute<N, S>(engine: &mut EditingEngine<N>, surface: &mut S, command: Command) -> bool
where
    N: StatusSink,
    S: TextSurface + ?Sized,
{
    log::debug!("execute {}", command);
    match command {
        Command::Kill => engine.kill(surface),
        Command::Copy => announce(engine, "Copy", |engine| engine.copy(surface)),
        Command::Cut => announce(engine, "Cut", |engine| engine.cut(surface)),
        Command::Yank => announce(engine, "Yank", |engine| engine.yank(surface)),
        Command::YankPop => engine.yank_pop(surface),
        Command::ToggleMark => {
            engine.toggle_mark_mode(surface);
            true
        }
        Command::EnterMark => {
            engine.enter_mark_mode(surface);
            true
        }
        Command::ExitMark => engine.exit_mark_mode(surface).is_ok(),
        Command::ToggleRectangleMark => {
            engine.toggle_rectangle_mark_mode(surface);
            true
        }
        Command::ToggleCua => {
            engine.toggle_cua_mode();
            true
        }
        Command::CuaCut => engine.cua_cut(surface),
        Command::CuaCopy => engine.cua_copy(surface),
        Command::CuaPaste => engine.cua_paste(surface),
        Command::RegisterPrefix => {
            engine.enter_register_chord();
            true
        }
        Command::CopyToRegister(register) => engine.save_to_register(surface, Some(register)),
        Command::InsertRegister(register) => engine.insert_from_register(surface, Some(register)),
        Command::CopyRectangle => engine.copy_rectangle(surface),
        Command::KillRectangle => engine.kill_rectangle(surface),
        Command::YankRectangle => engine.yank_rectangle(surface),
        Command::ChangeCase(casing, scope) => engine.change_case(surface, casing, scope),
        Command::DeleteBlankLines => engine.delete_blank_lines(surface),
        Command::Undo => engine.undo(surface),
        Command::Abort => {
            engine.abort();
            true
        }
        Command::Move(motion) => engine.move_cursor(surface, motion),
    }
}

fn announce<N: StatusSink>(
    engine: &mut EditingEngine<N>,
    message: &str,
    handler: impl FnOnce(&mut EditingEngine<N>) -> bool,
) -> bool {
    let done = handler(engine);
    if done {
        engine.show_message(message);
    }
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{MemorySurface, Position, Selection};
    use crate::ui::MessageLog;

    #[test]
    fn test_parse_key_names_and_logical_names() {
        assert_eq!(Command::parse("C-k"), Some(Command::Kill));
        assert_eq!(Command::parse("yank-pop"), Some(Command::YankPop));
        assert_eq!(Command::parse("C-x_C-o"), Some(Command::DeleteBlankLines));
        assert_eq!(
            Command::parse("capitaliseWord"),
            Some(Command::ChangeCase(Casing::Capitalize, CaseScope::Word))
        );
        assert_eq!(Command::parse("cursorWordLeft"), Some(Command::Move(Motion::WordLeft)));
        assert_eq!(Command::parse("copy-to-register:q"), Some(Command::CopyToRegister('q')));
        assert_eq!(Command::parse("copy-to-register:qq"), None);
        assert_eq!(Command::parse("no-such-command"), None);
    }

    #[test]
    fn test_names_parse_back() {
        let commands = [
            Command::Kill,
            Command::YankRectangle,
            Command::InsertRegister('a'),
            Command::ChangeCase(Casing::Lower, CaseScope::Region),
            Command::Move(Motion::PageDown),
        ];
        for command in commands {
            assert_eq!(Command::parse(&command.name()), Some(command));
        }
    }

    #[test]
    fn test_execute_reports_success_only_once() {
        let mut engine = EditingEngine::new(MessageLog::new());
        let mut surface = MemorySurface::from_text("hello").with_selections(vec![Selection::new(
            Position::new(0, 0),
            Position::new(0, 5),
        )]);

        assert!(execute(&mut engine, &mut surface, Command::Cut));
        assert_eq!(engine.status().last_transient(), Some("Cut"));

        assert!(!execute(&mut engine, &mut surface, Command::Copy));
        assert_eq!(engine.status().last_transient(), Some("Not in region"));

        assert!(execute(&mut engine, &mut surface, Command::Yank));
        assert_eq!(surface.to_string(), "hello");
        assert_eq!(engine.status().last_transient(), Some("Yank"));
    }
}
