//! ステータス通知
//!
//! エンジンからの一時メッセージと常駐プロンプトを受け取る出力先。

use std::time::Duration;

const STATUS_PREFIX: &str = "EMACS";

/// ステータス表示の出力先
pub trait StatusSink {
    /// 一定時間だけ表示するメッセージ
    fn show_transient(&mut self, text: &str, duration: Duration);

    /// 消去されるまで表示し続けるメッセージ（空文字で消去）
    fn show_persistent(&mut self, text: &str);
}

/// 記録されたメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Transient { text: String, duration: Duration },
    Persistent(String),
}

/// 受け取ったメッセージを順に記録するシンク
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<StatusMessage>,
    prompt: String,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 受信順の全メッセージ
    pub fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }

    /// 直近の一時メッセージ
    pub fn last_transient(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|message| match message {
            StatusMessage::Transient { text, .. } => Some(text.as_str()),
            StatusMessage::Persistent(_) => None,
        })
    }

    /// 現在の常駐プロンプト
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// ステータスライン表示（プロンプト優先）
    pub fn status_line(&self) -> String {
        if !self.prompt.is_empty() {
            return format!("{}: {}", STATUS_PREFIX, self.prompt);
        }
        match self.last_transient() {
            Some(text) => format!("{}: {}", STATUS_PREFIX, text),
            None => format!("{}:", STATUS_PREFIX),
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.prompt.clear();
    }
}

impl StatusSink for MessageLog {
    fn show_transient(&mut self, text: &str, duration: Duration) {
        self.messages.push(StatusMessage::Transient {
            text: text.to_string(),
            duration,
        });
    }

    fn show_persistent(&mut self, text: &str) {
        self.prompt = text.to_string();
        self.messages.push(StatusMessage::Persistent(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_takes_precedence_in_status_line() {
        let mut log = MessageLog::new();
        log.show_transient("Yank", Duration::from_millis(1000));
        assert_eq!(log.status_line(), "EMACS: Yank");

        log.show_persistent("Copy to register:");
        assert_eq!(log.status_line(), "EMACS: Copy to register:");

        log.show_persistent("");
        assert_eq!(log.status_line(), "EMACS: Yank");
    }

    #[test]
    fn test_last_transient_skips_prompts() {
        let mut log = MessageLog::new();
        log.show_transient("Quit", Duration::from_millis(1000));
        log.show_persistent("Insert register:");
        assert_eq!(log.last_transient(), Some("Quit"));
        assert_eq!(log.messages().len(), 2);
    }
}
