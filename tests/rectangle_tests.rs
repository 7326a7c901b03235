use altre_killring::buffer::{Motion, Position, Range, Selection, TextSurface};
use altre_killring::ui::StatusMessage;
use altre_killring::{EditingEngine, MemorySurface, MessageLog, Mode};
use std::time::Duration;

fn engine() -> EditingEngine<MessageLog> {
    EditingEngine::new(MessageLog::new())
}

/// 各行の先頭1文字を選択
fn first_column_selections(lines: usize) -> Vec<Selection> {
    (0..lines)
        .map(|line| Selection::new(Position::new(line, 0), Position::new(line, 1)))
        .collect()
}

#[test]
fn test_rectangle_kill_then_yank_across_selections() {
    let mut engine = engine();
    let mut source = MemorySurface::from_text("a\nb\nc").with_selections(first_column_selections(3));

    assert!(engine.kill_rectangle(&mut source));
    assert_eq!(source.to_string(), "\n\n");
    assert_eq!(engine.last_rectangle(), Some(&["a".to_string(), "b".to_string(), "c".to_string()][..]));
    assert_eq!(
        engine.status().messages().last(),
        Some(&StatusMessage::Transient {
            text: "Rectangle Saved!".to_string(),
            duration: Duration::from_millis(5000),
        })
    );

    let mut target = MemorySurface::from_text("x\ny\nz").with_selections(first_column_selections(3));
    assert!(engine.yank_rectangle(&mut target));
    assert_eq!(target.to_string(), "a\nb\nc");
}

#[test]
fn test_rectangle_yank_into_single_selection_inserts_block() {
    let mut engine = engine();
    let mut source = MemorySurface::from_text("a\nb\nc").with_selections(first_column_selections(3));
    engine.kill_rectangle(&mut source);

    let mut target = MemorySurface::new();
    assert!(engine.yank_rectangle(&mut target));
    assert_eq!(target.to_string(), "a\nb\nc\n");
}

#[test]
fn test_rectangle_yank_pads_missing_lines() {
    let mut engine = engine();
    let mut source = MemorySurface::from_text("a\nb").with_selections(first_column_selections(2));
    assert!(engine.copy_rectangle(&mut source));
    assert_eq!(source.to_string(), "a\nb");

    let mut target = MemorySurface::from_text("x\ny\nz").with_selections(first_column_selections(3));
    assert!(engine.yank_rectangle(&mut target));
    assert_eq!(target.to_string(), "a\nb\n");
}

#[test]
fn test_rectangle_yank_without_saved_rectangle() {
    let mut engine = engine();
    let mut surface = MemorySurface::from_text("abc");

    assert!(!engine.yank_rectangle(&mut surface));
    assert_eq!(surface.to_string(), "abc");
    assert_eq!(
        engine.status().messages().last(),
        Some(&StatusMessage::Transient {
            text: "No rectangle has been saved".to_string(),
            duration: Duration::from_millis(4000),
        })
    );
}

#[test]
fn test_partial_rectangle_failure_keeps_applied_deletes() {
    let mut engine = engine();
    let mut surface = MemorySurface::from_text("a\nb\nc").with_selections(first_column_selections(3));
    surface.fail_deletes_at(Range::new(Position::new(1, 0), Position::new(1, 1)));

    assert!(!engine.kill_rectangle(&mut surface));
    assert_eq!(surface.to_string(), "\nb\n");
    assert_eq!(engine.status().last_transient(), Some("Error saving rectangle"));
    assert_eq!(engine.last_rectangle().map(|lines| lines.len()), Some(3));
}

#[test]
fn test_rectangle_mark_chord_kills_column() {
    let mut engine = engine();
    let mut surface = MemorySurface::from_text("abc\ndef\nghi").with_caret(Position::new(0, 1));

    assert!(engine.toggle_rectangle_mark_mode(&mut surface));
    engine.move_cursor(&mut surface, Motion::Right);
    engine.move_cursor(&mut surface, Motion::Down);
    engine.move_cursor(&mut surface, Motion::Down);
    assert_eq!(surface.selections().len(), 3);

    engine.enter_register_chord();
    engine.on_typed_character(&mut surface, "k");

    assert_eq!(surface.to_string(), "ac\ndf\ngi");
    assert!(!engine.modes().is_active(Mode::RectangleMark));
    assert!(engine.modes().chord().is_idle());

    // 同じ列へ貼り戻す
    surface.set_selections(
        (0..3)
            .map(|line| Selection::caret(Position::new(line, 1)))
            .collect(),
    );
    engine.enter_register_chord();
    engine.on_typed_character(&mut surface, "y");
    assert_eq!(surface.to_string(), "abc\ndef\nghi");
}
