//! Object editor tests
//! The editor as the property dialog of a bound object: loading through the
//! view, writing user edits back, and following domain changes.

use glabels_core::label::text::lines_from_text;
use glabels_core::{ColorNode, Label, LabelObject, ObjectKind, Rgba};
use glabels_editor::{EditorError, FillMode, ObjectEditor};
use glabels_settings::Preferences;
use glabels_view::{BindingKey, MenuAction, PropertyDialog, View};
use std::cell::Cell;
use std::rc::Rc;

struct Fixture {
    label: Rc<Label>,
    view: View,
    object: Rc<LabelObject>,
    key: BindingKey,
    editor: ObjectEditor,
}

fn fixture(kind: ObjectKind, merge_fields: &[&str]) -> Fixture {
    let label = Label::new(200.0, 100.0);
    label.set_merge_fields(merge_fields.iter().map(|k| k.to_string()).collect());
    let object = label.add_object(kind, 10.0, 10.0, 50.0, 20.0);
    let view = View::with_memory_scene(&label);
    let key = view.bind_default(&object).unwrap();
    let editor = ObjectEditor::new(&Preferences::default());
    view.attach_dialog(key, Box::new(editor.clone())).unwrap();
    Fixture {
        label,
        view,
        object,
        key,
        editor,
    }
}

#[test]
fn test_edit_properties_loads_and_shows() {
    let f = fixture(ObjectKind::Box, &["NAME"]);
    f.object.set_fill(ColorNode::from_field("NAME"));

    f.view.activate(f.key, MenuAction::EditProperties).unwrap();

    assert!(f.view.dialog_visible(f.key));
    assert!(f.editor.is_visible());
    assert_eq!(f.editor.object_id(), Some(f.object.id()));
    assert_eq!(f.editor.with_fill_page(|p| p.fill_color()), Some(f.object.fill()));
    assert_eq!(f.editor.with_fill_page(|p| p.is_key_radio_sensitive()), Some(true));
    assert_eq!(f.editor.line_width(), Some(f.object.line_width()));
    assert!(f.editor.with_text_entry(|_| ()).is_none());
}

#[test]
fn test_user_color_choice_updates_object() {
    let f = fixture(ObjectKind::Ellipse, &[]);
    f.view.show_dialog(f.key).unwrap();
    let changes = Rc::new(Cell::new(0));
    let seen = Rc::clone(&changes);
    f.editor.changed().connect(move |_| seen.set(seen.get() + 1));

    let red = Rgba::new(255, 0, 0, 255);
    f.editor.choose_fill_color(red).unwrap();

    assert_eq!(f.object.fill(), ColorNode::from_color(red));
    assert_eq!(changes.get(), 1);

    f.editor.choose_default_fill_color().unwrap();
    assert_eq!(f.object.fill(), ColorNode::default());
    assert_eq!(changes.get(), 2);
}

#[test]
fn test_domain_change_reloads_editor() {
    let f = fixture(ObjectKind::Box, &["NAME"]);
    f.view.show_dialog(f.key).unwrap();

    f.object.set_fill(ColorNode::from_field("NAME"));

    assert_eq!(
        f.editor.with_fill_page(|p| p.mode()),
        Some(FillMode::Key)
    );
    assert_eq!(
        f.editor.with_fill_page(|p| p.fill_color()),
        Some(ColorNode::from_field("NAME"))
    );
}

#[test]
fn test_merge_disabled_locks_key_mode() {
    let f = fixture(ObjectKind::Box, &[]);
    f.object.set_fill(ColorNode::from_field("NAME"));
    f.view.show_dialog(f.key).unwrap();

    assert_eq!(
        f.editor.with_fill_page(|p| p.fill_color()),
        Some(ColorNode::from_field("NAME"))
    );

    f.editor.choose_fill_color_mode().unwrap();
    assert!(!f.object.fill().field_flag);
    assert!(matches!(
        f.editor.choose_fill_key_mode(),
        Err(EditorError::Insensitive { .. })
    ));
    assert!(!f.object.fill().field_flag);
}

#[test]
fn test_merge_enabled_later_unlocks_key_mode() {
    let f = fixture(ObjectKind::Box, &[]);
    f.view.show_dialog(f.key).unwrap();
    assert!(f.editor.choose_fill_key_mode().is_err());

    f.label.set_merge_fields(vec!["SKU".into()]);
    f.view.show_dialog(f.key).unwrap();

    f.editor.choose_fill_key_mode().unwrap();
    f.editor.choose_fill_key("SKU").unwrap();
    assert_eq!(f.object.fill(), ColorNode::from_field("SKU"));
}

#[test]
fn test_merge_change_refreshes_open_editor() {
    let f = fixture(ObjectKind::Box, &[]);
    f.view.show_dialog(f.key).unwrap();
    assert_eq!(f.editor.with_fill_page(|p| p.is_key_radio_sensitive()), Some(false));
    assert_eq!(f.label.merge_changed().handler_count(), 1);

    f.label.set_merge_fields(vec!["SKU".into(), "PRICE".into()]);

    assert_eq!(f.editor.with_fill_page(|p| p.is_key_radio_sensitive()), Some(true));
    assert_eq!(
        f.editor.with_fill_page(|p| p.key_combo().keys().to_vec()),
        Some(vec!["SKU".to_string(), "PRICE".to_string()])
    );
    f.editor.choose_fill_key_mode().unwrap();
    f.editor.choose_fill_key("PRICE").unwrap();
    assert_eq!(f.object.fill(), ColorNode::from_field("PRICE"));

    let Fixture {
        label,
        view,
        key,
        editor,
        ..
    } = f;
    view.teardown(key).unwrap();
    assert_eq!(label.merge_changed().handler_count(), 1);
    drop(editor);
    assert_eq!(label.merge_changed().handler_count(), 0);
}

#[test]
fn test_merge_change_refreshes_text_keys() {
    let f = fixture(ObjectKind::Text, &["FIRST"]);
    f.view.show_dialog(f.key).unwrap();

    f.label.set_merge_fields(vec!["FIRST".into(), "LAST".into()]);
    assert_eq!(
        f.editor.with_text_entry(|e| e.key_combo().keys().to_vec()),
        Some(vec!["FIRST".to_string(), "LAST".to_string()])
    );
    f.editor.choose_text_key("LAST").unwrap();
    f.editor.insert_text_field().unwrap();
    assert_eq!(f.object.text(), lines_from_text("${LAST}"));

    f.label.set_merge_fields(Vec::new());
    assert_eq!(f.editor.with_text_entry(|e| e.is_key_combo_sensitive()), Some(false));
    assert_eq!(f.editor.with_text_entry(|e| e.text_string()), Some("${LAST}".to_string()));
}

#[test]
fn test_text_edit_keeps_cursor() {
    let f = fixture(ObjectKind::Text, &["FIRST"]);
    f.object.set_text(lines_from_text("Hi !"));
    f.view.show_dialog(f.key).unwrap();

    f.editor.set_text_cursor(3).unwrap();
    f.editor.insert_text_field().unwrap();
    f.editor.type_text(" and").unwrap();

    assert_eq!(f.object.text(), lines_from_text("Hi ${FIRST} and!"));
    assert_eq!(f.editor.with_text_entry(|e| e.cursor()), Some(15));
    assert!(f.editor.with_fill_page(|_| ()).is_none());
    assert_eq!(f.editor.line_width(), None);
}

#[test]
fn test_line_width_edit() {
    let f = fixture(ObjectKind::Line, &[]);
    f.view.show_dialog(f.key).unwrap();

    f.editor.set_line_width(2.5).unwrap();
    assert_eq!(f.object.line_width(), 2.5);
    assert_eq!(f.editor.line_width(), Some(2.5));

    assert!(matches!(
        f.editor.set_line_width(-1.0),
        Err(EditorError::Label(_))
    ));
    assert_eq!(f.object.line_width(), 2.5);
    assert!(matches!(
        f.editor.choose_fill_color(Rgba::BLACK),
        Err(EditorError::NoPage { page: "fill" })
    ));
}

#[test]
fn test_edits_before_load_and_after_removal() {
    let editor = ObjectEditor::new(&Preferences::default());
    assert!(matches!(
        editor.choose_fill_color(Rgba::BLACK),
        Err(EditorError::NoPage { .. })
    ));

    let f = fixture(ObjectKind::Box, &[]);
    f.view.show_dialog(f.key).unwrap();
    let id = f.object.id();
    let Fixture {
        label,
        object,
        editor,
        ..
    } = f;
    label.remove_object(id).unwrap();
    drop(object);

    assert_eq!(
        editor.choose_fill_color(Rgba::new(1, 2, 3, 255)),
        Err(EditorError::ObjectGone { id })
    );
}

#[test]
fn test_hide_dialog() {
    let f = fixture(ObjectKind::Box, &[]);
    f.view.show_dialog(f.key).unwrap();

    f.view.with_dialog(f.key, |dialog| dialog.hide()).unwrap();

    assert!(!f.view.dialog_visible(f.key));
    assert_eq!(f.editor.with_fill_page(|p| p.is_visible()), Some(false));
}
