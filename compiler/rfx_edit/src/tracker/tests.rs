use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_text_edit_kinds() {
    let insert = TextEdit::insert(10, "hello");
    assert_eq!(insert.span, Span::new(10, 10));
    assert!(insert.is_insert());
    assert!(!insert.is_delete());
    assert_eq!(insert.length_delta(), 5);

    let delete = TextEdit::delete(Span::new(10, 20));
    assert!(delete.is_delete());
    assert_eq!(delete.length_delta(), -10);

    let replace = TextEdit::replace(Span::new(10, 15), "longer text");
    assert!(!replace.is_insert());
    assert!(!replace.is_delete());
    assert_eq!(replace.length_delta(), 6);
}

#[test]
fn test_tracker_simple_replace() {
    let mut tracker = ChangeTracker::new();
    tracker.replace(Span::new(6, 11), "rfx");
    assert_eq!(tracker.apply("Hello World!"), "Hello rfx!");
}

#[test]
fn test_tracker_delete() {
    let mut tracker = ChangeTracker::new();
    tracker.delete(Span::new(5, 11));
    assert_eq!(tracker.apply("Hello World!"), "Hello!");
}

#[test]
fn test_tracker_non_overlapping() {
    let mut tracker = ChangeTracker::new();
    tracker.replace(Span::new(0, 5), "const");
    tracker.replace(Span::new(8, 10), "100");
    assert_eq!(tracker.apply("let x = 42;"), "const = 100;");
}

#[test]
fn test_tracker_inserts_at_same_offset_keep_push_order() {
    let mut tracker = ChangeTracker::new();
    tracker.insert(0, "// first\n");
    tracker.insert(0, "// second\n");
    tracker.insert(0, "// third\n");
    assert_eq!(
        tracker.apply("code"),
        "// first\n// second\n// third\ncode"
    );
}

#[test]
fn test_tracker_insert_touching_delete() {
    let mut tracker = ChangeTracker::new();
    tracker.delete(Span::new(0, 4));
    tracker.insert(0, "new");
    tracker.insert(4, "!");
    assert!(tracker.check_conflicts().is_none());
    assert_eq!(tracker.apply("old text"), "new!text");
}

#[test]
fn test_tracker_conflict_detection() {
    let mut tracker = ChangeTracker::new();
    tracker.replace(Span::new(5, 15), "aaa");
    tracker.replace(Span::new(10, 20), "bbb");
    assert!(tracker.check_conflicts().is_some());
}

#[test]
fn test_tracker_insert_inside_replacement_conflicts() {
    let mut tracker = ChangeTracker::new();
    tracker.replace(Span::new(0, 10), "aaa");
    tracker.insert(5, "x");
    assert!(tracker.check_conflicts().is_some());
}

#[test]
fn test_tracker_conflict_behind_short_edit() {
    let mut tracker = ChangeTracker::new();
    tracker.replace(Span::new(0, 20), "wide");
    tracker.replace(Span::new(2, 3), "a");
    tracker.replace(Span::new(12, 13), "b");
    let conflict = tracker.check_conflicts();
    assert!(conflict.is_some());
}

#[test]
fn test_tracker_no_conflict_adjacent() {
    let mut tracker = ChangeTracker::new();
    tracker.replace(Span::new(0, 5), "aaa");
    tracker.replace(Span::new(5, 10), "bbb");
    assert!(tracker.check_conflicts().is_none());
}

#[test]
fn test_tracker_apply_checked() {
    let mut tracker = ChangeTracker::new();
    tracker.replace(Span::new(0, 5), "const");
    assert_eq!(tracker.apply_checked("let x = 42;"), Ok("const = 42;".to_owned()));

    tracker.replace(Span::new(2, 7), "bbb");
    assert!(tracker.apply_checked("let x = 42;").is_err());
}

#[test]
fn test_tracker_empty() {
    let tracker = ChangeTracker::new();
    assert!(tracker.is_empty());
    assert_eq!(tracker.len(), 0);
    assert_eq!(tracker.apply("unchanged"), "unchanged");
}

#[test]
fn test_tracker_total_delta() {
    let mut tracker = ChangeTracker::new();
    tracker.insert(0, "abc");
    tracker.delete(Span::new(10, 20));
    tracker.replace(Span::new(5, 7), "hello");
    assert_eq!(tracker.total_delta(), -4);
}

#[test]
fn test_tracker_out_of_bounds_clamps() {
    let mut tracker = ChangeTracker::new();
    tracker.replace(Span::new(100, 200), "test");
    assert_eq!(tracker.apply("short"), "shorttest");
}
