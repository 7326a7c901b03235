//! キルリング実装
//!
//! 固定長の循環バッファ。書き込み位置とは別に、ヤンクポップ用の読み出し位置を持つ。
//! スロットは `Option` で保持し、「未書き込み」と「空文字を書き込み済み」を区別する。

/// 既定の最大保持数
pub const DEFAULT_CAPACITY: usize = 60;

/// 1回の論理的なキルで集めたテキスト断片
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KillEntry {
    spans: Vec<String>,
}

impl KillEntry {
    fn new(text: String) -> Self {
        Self { spans: vec![text] }
    }

    fn push(&mut self, text: &str) {
        self.spans.push(text.to_string());
    }

    /// 断片を連結したテキスト
    pub fn text(&self) -> String {
        self.spans.concat()
    }

    /// 収集順の断片
    pub fn spans(&self) -> &[String] {
        &self.spans
    }
}

/// Emacs風キルリング。
#[derive(Debug, Clone)]
pub struct KillRing {
    slots: Vec<Option<KillEntry>>,
    /// 次に書き込むスロット
    write: usize,
    /// `top()` が返すスロット
    read: usize,
}

impl KillRing {
    /// 新しいキルリングを作成
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 最大保持数を指定して作成（0は1として扱う）
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            write: 0,
            read: 0,
        }
    }

    /// 新しいエントリとして保存し、書き込み位置を進める
    pub fn save(&mut self, text: impl Into<String>) {
        self.slots[self.write] = Some(KillEntry::new(text.into()));
        self.read = self.write;
        self.write = (self.write + 1) % self.capacity();
    }

    /// 最新エントリの末尾に追記（書き込み位置は進めない）
    ///
    /// 一度も保存していない場合は何もしない。
    pub fn append(&mut self, text: &str) {
        let newest = self.newest_index();
        if let Some(entry) = self.slots[newest].as_mut() {
            entry.push(text);
            self.read = newest;
        }
    }

    /// 読み出し位置のエントリ
    pub fn top(&self) -> Option<String> {
        self.top_entry().map(KillEntry::text)
    }

    /// 読み出し位置のエントリ（断片付き）
    pub fn top_entry(&self) -> Option<&KillEntry> {
        self.slots[self.read].as_ref()
    }

    /// 読み出し位置を一つ新しいエントリへ
    ///
    /// 次のスロットが未使用なら先頭スロットへ戻る。
    pub fn forward(&mut self) {
        if self.is_empty() {
            return;
        }
        let next = (self.read + 1) % self.capacity();
        self.read = if self.slots[next].is_some() { next } else { 0 };
    }

    /// 読み出し位置を一つ古いエントリへ
    ///
    /// 先頭スロットを越えると使用中の最大スロットへ戻る。
    pub fn backward(&mut self) {
        if self.is_empty() {
            return;
        }
        self.read = if self.is_full() {
            (self.read + self.capacity() - 1) % self.capacity()
        } else if self.read == 0 {
            self.write - 1
        } else {
            self.read - 1
        };
    }

    /// 読み出し位置を最新エントリへ戻す
    pub fn reset_traversal(&mut self) {
        self.read = self.newest_index();
    }

    /// 一度も書き込まれていないか
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// 使用中のスロット数
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// 最大保持数
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// エントリをクリア
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.write = 0;
        self.read = 0;
    }

    fn newest_index(&self) -> usize {
        (self.write + self.capacity() - 1) % self.capacity()
    }

    // 書き込み前のスロットが埋まっていれば一周済み
    fn is_full(&self) -> bool {
        self.slots[self.write].is_some()
    }
}

impl Default for KillRing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_top() {
        let mut ring = KillRing::new();
        assert!(ring.is_empty());
        assert_eq!(ring.top(), None);

        ring.save("foo");
        assert_eq!(ring.top().as_deref(), Some("foo"));
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_append_before_save_is_noop() {
        let mut ring = KillRing::new();
        ring.append("bar");
        assert!(ring.is_empty());
    }

    #[test]
    fn test_append_extends_newest_entry() {
        let mut ring = KillRing::new();
        ring.save("abc");
        ring.append("def");
        assert_eq!(ring.top().as_deref(), Some("abcdef"));
        assert_eq!(ring.top_entry().unwrap().spans(), ["abc", "def"]);
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_empty_string_is_a_written_slot() {
        let mut ring = KillRing::new();
        ring.save("");
        assert!(!ring.is_empty());
        assert_eq!(ring.top().as_deref(), Some(""));
    }

    #[test]
    fn test_backward_walks_older_and_wraps_to_newest() {
        let mut ring = KillRing::new();
        ring.save("first");
        ring.save("second");
        ring.save("third");

        assert_eq!(ring.top().unwrap(), "third");
        ring.backward();
        assert_eq!(ring.top().unwrap(), "second");
        ring.backward();
        assert_eq!(ring.top().unwrap(), "first");
        ring.backward();
        assert_eq!(ring.top().unwrap(), "third");
    }

    #[test]
    fn test_forward_wraps_to_first_slot() {
        let mut ring = KillRing::new();
        ring.save("first");
        ring.save("second");

        ring.forward();
        assert_eq!(ring.top().unwrap(), "first");
        ring.forward();
        assert_eq!(ring.top().unwrap(), "second");
    }

    #[test]
    fn test_wrap_overwrites_oldest() {
        let mut ring = KillRing::with_capacity(3);
        for text in ["a", "b", "c", "d"] {
            ring.save(text);
        }

        assert_eq!(ring.top().unwrap(), "d");
        let mut seen = Vec::new();
        for _ in 0..3 {
            ring.backward();
            seen.push(ring.top().unwrap());
        }
        assert_eq!(seen, vec!["c", "b", "d"]);
        assert!(!seen.contains(&"a".to_string()));
    }

    #[test]
    fn test_reset_traversal_returns_to_newest() {
        let mut ring = KillRing::new();
        ring.save("old");
        ring.save("new");
        ring.backward();
        assert_eq!(ring.top().unwrap(), "old");

        ring.reset_traversal();
        assert_eq!(ring.top().unwrap(), "new");
    }

    #[test]
    fn test_clear_resets_entries() {
        let mut ring = KillRing::new();
        ring.save("data");
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.top(), None);
    }
}
