//! セッションスクリプトの再生
//!
//! 1行1操作のテキスト形式でキー操作を記述し、エンジンとバッファに適用する。
//!
//! ```text
//! # コメント
//! caret 0:5
//! select 0:0 0:3;1:0 1:3
//! key C-x_r
//! type s
//! type q
//! move end 2
//! cmd yank-pop
//! ```

use super::commands::{execute, Command};
use crate::buffer::{Motion, Position, Selection, TextSurface};
use crate::editor::EditingEngine;
use crate::error::{KillringError, Result};
use crate::ui::StatusSink;
use std::path::Path;

/// 1行分の操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// 1文字ずつ入力
    Type(String),
    /// コマンド実行
    Command(Command),
    /// 移動を指定回数
    Move(Motion, usize),
    /// カーソルを置く
    Caret(Position),
    /// 選択を置き換える
    Select(Vec<Selection>),
}

/// 再生結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// 実行した操作数
    pub executed: usize,
    /// 失敗を報告したコマンド数
    pub failed: usize,
}

/// 解析済みスクリプト
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionScript {
    steps: Vec<(usize, Step)>,
}

impl SessionScript {
    /// ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| KillringError::Script {
            line: 0,
            message: format!("cannot read {}: {}", path.display(), err),
        })?;
        Self::parse(&content)
    }

    /// テキストを解析（行番号は1始まり）
    pub fn parse(content: &str) -> Result<Self> {
        let mut steps = Vec::new();
        for (index, raw) in content.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (keyword, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
            let error = |message: String| KillringError::Script { line, message };

            match keyword {
                "type" => steps.push((line, Step::Type(unescape(rest)))),
                "key" | "cmd" => {
                    for name in rest.split_whitespace() {
                        let command = Command::parse(name)
                            .ok_or_else(|| error(format!("unknown command '{}'", name)))?;
                        steps.push((line, Step::Command(command)));
                    }
                }
                "move" => {
                    let mut parts = rest.split_whitespace();
                    let name = parts
                        .next()
                        .ok_or_else(|| error("move needs a motion".to_string()))?;
                    let motion = Motion::from_name(name)
                        .ok_or_else(|| error(format!("unknown motion '{}'", name)))?;
                    let count = match parts.next() {
                        Some(count) => count
                            .parse::<usize>()
                            .map_err(|_| error(format!("invalid count '{}'", count)))?,
                        None => 1,
                    };
                    steps.push((line, Step::Move(motion, count)));
                }
                "caret" => {
                    let position = parse_position(rest.trim()).map_err(error)?;
                    steps.push((line, Step::Caret(position)));
                }
                "select" => {
                    let selections = rest
                        .split(';')
                        .map(parse_selection)
                        .collect::<std::result::Result<Vec<_>, _>>()
                        .map_err(error)?;
                    steps.push((line, Step::Select(selections)));
                }
                other => return Err(error(format!("unknown keyword '{}'", other))),
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().map(|(_, step)| step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// エンジンとバッファへ適用する
    pub fn replay<N, S>(&self, engine: &mut EditingEngine<N>, surface: &mut S) -> ReplayReport
    where
        N: StatusSink,
        S: TextSurface + ?Sized,
    {
        let mut report = ReplayReport::default();
        for (line, step) in &self.steps {
            log::debug!("script line {}: {:?}", line, step);
            match step {
                Step::Type(text) => {
                    for ch in text.chars() {
                        engine.on_typed_character(surface, ch.encode_utf8(&mut [0; 4]));
                    }
                }
                Step::Command(command) => {
                    if !execute(engine, surface, *command) {
                        report.failed += 1;
                    }
                }
                Step::Move(motion, count) => {
                    for _ in 0..*count {
                        engine.move_cursor(surface, *motion);
                    }
                }
                Step::Caret(position) => {
                    engine.focus_changed();
                    surface.set_selection(Selection::caret(*position));
                }
                Step::Select(selections) => {
                    engine.focus_changed();
                    surface.set_selections(selections.clone());
                }
            }
            report.executed += 1;
        }
        report
    }
}

/// `\n` `\t` `\\` を展開
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn parse_position(text: &str) -> std::result::Result<Position, String> {
    let (line, column) = text
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COLUMN, got '{}'", text))?;
    let line = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line '{}'", line))?;
    let column = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{}'", column))?;
    Ok(Position::new(line, column))
}

fn parse_selection(text: &str) -> std::result::Result<Selection, String> {
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(anchor), Some(active), None) => {
            Ok(Selection::new(parse_position(anchor)?, parse_position(active)?))
        }
        (Some(at), None, None) => Ok(Selection::caret(parse_position(at)?)),
        _ => Err(format!("expected ANCHOR ACTIVE, got '{}'", text.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MemorySurface;
    use crate::ui::MessageLog;

    #[test]
    fn test_parse_all_keywords() {
        let script = SessionScript::parse(
            "# header\n\ncaret 1:2\nselect 0:0 0:3;1:0\nkey C-k M-w\nmove down 3\ntype a\\nb\n",
        )
        .unwrap();

        let steps: Vec<&Step> = script.steps().collect();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0], &Step::Caret(Position::new(1, 2)));
        assert_eq!(
            steps[1],
            &Step::Select(vec![
                Selection::new(Position::new(0, 0), Position::new(0, 3)),
                Selection::caret(Position::new(1, 0)),
            ])
        );
        assert_eq!(steps[2], &Step::Command(Command::Kill));
        assert_eq!(steps[3], &Step::Command(Command::Copy));
        assert_eq!(steps[4], &Step::Move(Motion::Down, 3));
        assert_eq!(steps[5], &Step::Type("a\nb".to_string()));
    }

    #[test]
    fn test_parse_error_carries_line_number() {
        let err = SessionScript::parse("caret 0:0\nkey C-k bogus\n").unwrap_err();
        assert_eq!(
            err,
            KillringError::Script {
                line: 2,
                message: "unknown command 'bogus'".to_string()
            }
        );

        let err = SessionScript::parse("caret zero").unwrap_err();
        assert!(matches!(err, KillringError::Script { line: 1, .. }));
    }

    #[test]
    fn test_replay_register_chord() {
        let script = SessionScript::parse(
            "select 0:0 0:5\nkey C-x_r\ntype sq\ncaret 0:11\nkey C-x_r\ntype iq\n",
        )
        .unwrap();
        let mut engine = EditingEngine::new(MessageLog::new());
        let mut surface = MemorySurface::from_text("hello world");

        let report = script.replay(&mut engine, &mut surface);
        assert_eq!(report.failed, 0);
        assert_eq!(report.executed, 6);
        assert_eq!(surface.to_string(), "hello worldhello");
        assert_eq!(engine.registers().get_text('q'), Some("hello"));
    }
}
