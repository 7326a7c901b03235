//! KillRing public API property tests
//!
//! 保存・追記・巡回の組み合わせで、容量と読み出し位置の不変条件を確認する。

use altre_killring::editor::KillRing;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn entry_text() -> impl Strategy<Value = String> {
    "[a-z\n]{0,8}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_prop_top_is_last_saved(capacity in 1usize..16, texts in prop::collection::vec(entry_text(), 1..40)) {
        let mut ring = KillRing::with_capacity(capacity);
        for text in &texts {
            ring.save(text.clone());
        }
        prop_assert_eq!(ring.top(), texts.last().cloned());
        prop_assert_eq!(ring.len(), texts.len().min(capacity));
        prop_assert_eq!(ring.capacity(), capacity);
    }

    #[test]
    fn test_prop_backward_visits_newest_first_then_wraps(capacity in 1usize..12, count in 1usize..30) {
        let mut ring = KillRing::with_capacity(capacity);
        for i in 0..count {
            ring.save(format!("entry-{}", i));
        }

        let kept = count.min(capacity);
        let mut seen = Vec::new();
        for _ in 0..kept {
            seen.push(ring.top().unwrap());
            ring.backward();
        }
        let expected: Vec<String> = (count - kept..count).rev().map(|i| format!("entry-{}", i)).collect();
        prop_assert_eq!(seen, expected);
        // 一周すると最新へ戻る
        prop_assert_eq!(ring.top(), Some(format!("entry-{}", count - 1)));
    }

    #[test]
    fn test_prop_forward_undoes_backward(capacity in 1usize..12, count in 1usize..30, steps in 0usize..20) {
        let mut ring = KillRing::with_capacity(capacity);
        for i in 0..count {
            ring.save(format!("entry-{}", i));
        }
        let start = ring.top();
        for _ in 0..steps {
            ring.backward();
        }
        for _ in 0..steps {
            ring.forward();
        }
        prop_assert_eq!(ring.top(), start);
    }

    #[test]
    fn test_prop_append_extends_newest_entry(first in entry_text(), rest in prop::collection::vec(entry_text(), 0..6)) {
        let mut ring = KillRing::new();
        ring.save(first.clone());
        let mut expected = first;
        for text in &rest {
            ring.append(text);
            expected.push_str(text);
        }
        prop_assert_eq!(ring.len(), 1);
        prop_assert_eq!(ring.top(), Some(expected));
    }
}

#[test]
fn test_ring_wrap_drops_oldest_entry() {
    let capacity = 60;
    let mut ring = KillRing::with_capacity(capacity);
    for i in 0..=capacity {
        ring.save(format!("kill {}", i));
    }

    assert_eq!(ring.top().as_deref(), Some("kill 60"));
    for _ in 0..capacity * 2 {
        ring.backward();
        assert_ne!(ring.top().as_deref(), Some("kill 0"));
    }
}

#[test]
fn test_append_before_save_is_noop() {
    let mut ring = KillRing::new();
    ring.append("orphan");
    assert!(ring.is_empty());
    assert_eq!(ring.top(), None);
}

#[test]
fn test_empty_string_entry_is_not_unset() {
    let mut ring = KillRing::new();
    ring.save("");
    assert!(!ring.is_empty());
    assert_eq!(ring.top().as_deref(), Some(""));
}

#[test]
fn test_separate_saves_recoverable_with_backward() {
    let mut ring = KillRing::new();
    ring.save("abc");
    ring.save("def");
    ring.backward();
    assert_eq!(ring.top().as_deref(), Some("abc"));
}
