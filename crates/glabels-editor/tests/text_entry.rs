//! Text entry tests

use glabels_core::label::text::lines_from_text;
use glabels_core::TextNode;
use glabels_editor::{EditorError, TextEntry};
use std::cell::Cell;
use std::rc::Rc;

fn keys() -> Vec<String> {
    vec!["FIRST".into(), "LAST".into()]
}

fn count_changes(entry: &TextEntry) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    entry.changed().connect(move |_| seen.set(seen.get() + 1));
    count
}

#[test]
fn test_set_text_is_silent_and_round_trips() {
    let mut entry = TextEntry::new("Text", keys());
    let changes = count_changes(&entry);
    let lines = lines_from_text("Dear ${FIRST} ${LAST},\nwelcome");

    entry.set_text(true, &lines);

    assert_eq!(changes.get(), 0);
    assert_eq!(entry.text(), lines);
    assert_eq!(entry.text_string(), "Dear ${FIRST} ${LAST},\nwelcome");
    assert_eq!(entry.text()[0][1], TextNode::field("FIRST"));
}

#[test]
fn test_merge_controls_follow_merge_flag() {
    let mut entry = TextEntry::new("Text", keys());

    entry.set_text(false, &[]);
    assert!(!entry.is_key_combo_sensitive());
    assert!(!entry.is_insert_button_sensitive());
    assert!(matches!(
        entry.insert_field(),
        Err(EditorError::Insensitive { .. })
    ));
    assert!(entry.choose_key("LAST").is_err());

    entry.set_text(true, &[]);
    assert!(entry.is_key_combo_sensitive());
    assert!(entry.is_insert_button_sensitive());
}

#[test]
fn test_insert_field_at_cursor() {
    let mut entry = TextEntry::new("Text", keys());
    entry.set_text(true, &lines_from_text("Hello !"));
    let changes = count_changes(&entry);

    entry.set_cursor(6);
    entry.choose_key("LAST").unwrap();
    entry.insert_field().unwrap();

    assert_eq!(entry.text_string(), "Hello ${LAST}!");
    assert_eq!(entry.cursor(), 13);
    assert_eq!(
        entry.text(),
        vec![vec![
            TextNode::literal("Hello "),
            TextNode::field("LAST"),
            TextNode::literal("!"),
        ]]
    );
    assert_eq!(changes.get(), 1);
}

#[test]
fn test_first_key_is_preselected() {
    let mut entry = TextEntry::new("Text", keys());
    entry.set_text(true, &[]);
    entry.insert_field().unwrap();
    assert_eq!(entry.text_string(), "${FIRST}");

    let mut empty = TextEntry::new("Text", Vec::new());
    empty.set_text(true, &[]);
    assert_eq!(empty.insert_field(), Err(EditorError::NoKey));
}

#[test]
fn test_typing_notifies() {
    let mut entry = TextEntry::new("Text", keys());
    let changes = count_changes(&entry);

    entry.type_text("ab");
    entry.type_text("");
    entry.backspace();

    assert_eq!(entry.text_string(), "a");
    assert_eq!(changes.get(), 2);
    assert_eq!(entry.label(), "Text");
}
