//! Drag-to-create tool tests

use glabels_core::{Label, ObjectKind, Point, Size};
use glabels_view::{CreateTool, View};

#[test]
fn test_drag_creates_box_spanning_pointer() {
    let label = Label::new(200.0, 100.0);
    let view = View::with_memory_scene(&label);
    let mut tool = CreateTool::new(ObjectKind::Box, Size::new(72.0, 72.0));

    let key = tool.press(&view, Point::new(50.0, 40.0)).unwrap();
    assert!(tool.is_active());
    tool.motion(Point::new(30.0, 60.0)).unwrap();
    let released = tool.release(&view, Point::new(20.0, 70.0)).unwrap();

    assert_eq!(released, key);
    assert!(!tool.is_active());
    let obj = view.object(key).unwrap();
    assert_eq!(obj.position(), Point::new(20.0, 40.0));
    assert_eq!(obj.size(), Size::new(30.0, 30.0));
    assert_eq!(view.selected(), vec![key]);

    let group = view.group_item(key).unwrap();
    assert_eq!(view.with_scene(|s| s.origin(group)).unwrap(), Some(Point::new(20.0, 40.0)));
    assert_eq!(view.query(Point::new(45.0, 65.0)), Some(key));
}

#[test]
fn test_click_without_drag_uses_default_size() {
    let label = Label::new(200.0, 100.0);
    let view = View::with_memory_scene(&label);
    let mut tool = CreateTool::new(ObjectKind::Ellipse, Size::new(36.0, 18.0));

    let key = tool.press(&view, Point::new(10.0, 10.0)).unwrap();
    tool.release(&view, Point::new(10.0, 10.0)).unwrap();

    let obj = view.object(key).unwrap();
    assert_eq!(obj.size(), Size::new(36.0, 18.0));
    assert_eq!(obj.position(), Point::new(10.0, 10.0));
    assert_eq!(label.object_count(), 1);
}

#[test]
fn test_line_keeps_signed_extent() {
    let label = Label::new(200.0, 100.0);
    let view = View::with_memory_scene(&label);
    let mut tool = CreateTool::new(ObjectKind::Line, Size::new(72.0, 0.0));

    let key = tool.press(&view, Point::new(100.0, 50.0)).unwrap();
    tool.release(&view, Point::new(60.0, 80.0)).unwrap();

    let obj = view.object(key).unwrap();
    assert_eq!(obj.position(), Point::new(100.0, 50.0));
    assert_eq!(obj.size(), Size::new(-40.0, 30.0));
}

#[test]
fn test_new_object_replaces_selection() {
    let label = Label::new(200.0, 100.0);
    let view = View::with_memory_scene(&label);
    let existing = label.add_object(ObjectKind::Box, 0.0, 0.0, 10.0, 10.0);
    let old = view.bind_default(&existing).unwrap();
    view.select(old).unwrap();

    let mut tool = CreateTool::new(ObjectKind::Text, Size::new(72.0, 14.0));
    tool.press(&view, Point::new(100.0, 50.0)).unwrap();
    let key = tool.release(&view, Point::new(100.0, 50.0)).unwrap();

    assert_eq!(view.selected(), vec![key]);
    assert_eq!(view.stacking_order()[0], key);
}

#[test]
fn test_release_without_press_fails() {
    let label = Label::new(200.0, 100.0);
    let view = View::with_memory_scene(&label);
    let mut tool = CreateTool::new(ObjectKind::Box, Size::new(72.0, 72.0));

    tool.motion(Point::new(5.0, 5.0)).unwrap();
    assert!(tool.release(&view, Point::new(5.0, 5.0)).is_err());
    assert_eq!(label.object_count(), 0);
}
