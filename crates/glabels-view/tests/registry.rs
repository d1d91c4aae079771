//! View registry tests: listing, selection, stacking and hit testing

use glabels_core::{Label, LabelObject, ObjectKind, Point};
use glabels_view::{BindingKey, ItemId, View};
use std::cell::Cell;
use std::rc::Rc;

fn root_position(view: &View, item: ItemId) -> Option<usize> {
    view.with_scene(|s| s.stacking(None).iter().position(|i| *i == item))
        .unwrap()
}

fn topmost(view: &View) -> Option<ItemId> {
    view.with_scene(|s| s.stacking(None).last().copied()).unwrap()
}

fn is_visible(view: &View, item: ItemId) -> bool {
    view.with_scene(|s| s.is_visible(item)).unwrap()
}

fn boxes(label: &Rc<Label>, view: &View, n: usize) -> Vec<(Rc<LabelObject>, BindingKey)> {
    (0..n)
        .map(|i| {
            let obj = label.add_object(ObjectKind::Box, i as f64 * 20.0, 0.0, 10.0, 10.0);
            let key = view.bind_default(&obj).unwrap();
            (obj, key)
        })
        .collect()
}

#[test]
fn test_bindings_are_prepended() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let keys: Vec<BindingKey> = boxes(&label, &view, 3).into_iter().map(|(_, k)| k).collect();

    assert_eq!(view.bindings(), vec![keys[2], keys[1], keys[0]]);
    assert_eq!(view.stacking_order(), vec![keys[2], keys[1], keys[0]]);
}

#[test]
fn test_lower_to_bottom_stays_above_background() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    view.add_background_layer().unwrap();
    view.add_background_layer().unwrap();
    assert_eq!(view.background_item_count(), 2);

    let bound = boxes(&label, &view, 3);
    let (a, b, c) = (bound[0].1, bound[1].1, bound[2].1);
    assert_eq!(view.stacking_order(), vec![c, b, a]);

    view.lower_to_bottom(c).unwrap();

    assert_eq!(view.stacking_order(), vec![b, a, c]);
    assert_eq!(root_position(&view, view.group_item(c).unwrap()), Some(2));
}

#[test]
fn test_domain_lower_is_followed() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    view.add_background_layer().unwrap();
    let bound = boxes(&label, &view, 2);

    bound[1].0.lower_to_bottom();

    assert_eq!(label.stacking_order(), vec![bound[1].0.id(), bound[0].0.id()]);
    assert_eq!(view.stacking_order(), vec![bound[0].1, bound[1].1]);
    assert_eq!(root_position(&view, view.group_item(bound[1].1).unwrap()), Some(1));
}

#[test]
fn test_background_added_later_is_respected() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let bound = boxes(&label, &view, 2);

    let layers: Vec<ItemId> = (0..3).map(|_| view.add_background_layer().unwrap()).collect();
    for (i, layer) in layers.iter().enumerate() {
        assert_eq!(root_position(&view, *layer), Some(i));
    }

    view.lower_to_bottom(bound[1].1).unwrap();
    assert_eq!(root_position(&view, view.group_item(bound[1].1).unwrap()), Some(3));
}

#[test]
fn test_select_shows_highlight_on_top() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let bound = boxes(&label, &view, 2);
    let (a, b) = (bound[0].1, bound[1].1);
    let hl_a = view.highlight_item(a).unwrap();
    let hl_b = view.highlight_item(b).unwrap();

    view.select(a).unwrap();
    assert!(is_visible(&view, hl_a));
    assert_eq!(topmost(&view), Some(hl_a));

    view.select(b).unwrap();
    assert_eq!(topmost(&view), Some(hl_b));
    assert!(is_visible(&view, hl_a));

    view.select(a).unwrap();
    assert_eq!(topmost(&view), Some(hl_a));
    assert_eq!(view.selected(), vec![a, b]);

    view.deselect(a).unwrap();
    assert!(!is_visible(&view, hl_a));
    assert!(!view.is_selected(a));
    assert!(view.is_selected(b));
}

#[test]
fn test_remove_is_idempotent() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let bound = boxes(&label, &view, 3);
    let b = bound[1].1;
    view.select(b).unwrap();

    assert!(view.remove(b));
    let once = (view.bindings(), view.selected());
    assert!(!view.remove(b));
    assert_eq!((view.bindings(), view.selected()), once);

    assert!(!once.0.contains(&b));
    assert!(once.1.is_empty());
    assert!(!is_visible(&view, view.highlight_item(b).unwrap()));
    // Still alive, just unlisted.
    assert!(view.group_item(b).is_some());
    assert!(view.select(b).is_err());

    view.add(b).unwrap();
    view.add(b).unwrap();
    assert_eq!(view.bindings()[0], b);
    assert_eq!(view.len(), 3);
}

#[test]
fn test_add_unknown_binding_fails() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let (_, key) = boxes(&label, &view, 1).remove(0);
    view.teardown(key).unwrap();

    assert!(view.add(key).is_err());
    assert!(!view.remove(key));
}

#[test]
fn test_query_hits_topmost() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let a_obj = label.add_object(ObjectKind::Box, 0.0, 0.0, 50.0, 50.0);
    let b_obj = label.add_object(ObjectKind::Ellipse, 25.0, 25.0, 50.0, 50.0);
    let a = view.bind_default(&a_obj).unwrap();
    let b = view.bind_default(&b_obj).unwrap();

    assert_eq!(view.query(Point::new(30.0, 30.0)), Some(b));
    assert_eq!(view.query(Point::new(10.0, 10.0)), Some(a));
    assert_eq!(view.query(Point::new(90.0, 90.0)), None);

    view.lower_to_bottom(b).unwrap();
    assert_eq!(view.query(Point::new(30.0, 30.0)), Some(a));

    view.remove(a);
    assert_eq!(view.query(Point::new(10.0, 10.0)), None);
    assert_eq!(view.query(Point::new(30.0, 30.0)), Some(b));
}

#[test]
fn test_selection_changed_fires_on_change_only() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let bound = boxes(&label, &view, 2);
    let (a, b) = (bound[0].1, bound[1].1);
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    view.selection_changed().connect(move |_| counter.set(counter.get() + 1));

    view.select(a).unwrap();
    view.select(a).unwrap();
    assert_eq!(count.get(), 1);
    view.select(b).unwrap();
    assert_eq!(count.get(), 2);
    view.clear_selection().unwrap();
    view.clear_selection().unwrap();
    assert_eq!(count.get(), 3);
    view.deselect(a).unwrap();
    assert_eq!(count.get(), 3);
}

#[test]
fn test_select_all_and_select_only() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let keys: Vec<BindingKey> = boxes(&label, &view, 3).into_iter().map(|(_, k)| k).collect();

    view.select_all().unwrap();
    assert_eq!(view.selected().len(), 3);
    assert_eq!(topmost(&view), view.highlight_item(keys[2]));

    view.select_only(keys[1]).unwrap();
    assert_eq!(view.selected(), vec![keys[1]]);
    assert!(!is_visible(&view, view.highlight_item(keys[0]).unwrap()));
    assert!(!is_visible(&view, view.highlight_item(keys[2]).unwrap()));
    assert!(is_visible(&view, view.highlight_item(keys[1]).unwrap()));
}

#[test]
fn test_move_selection_moves_objects() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let bound = boxes(&label, &view, 3);
    view.select(bound[0].1).unwrap();
    view.select(bound[1].1).unwrap();

    view.move_selection(5.0, 5.0).unwrap();

    assert_eq!(bound[0].0.position(), Point::new(5.0, 5.0));
    assert_eq!(bound[1].0.position(), Point::new(25.0, 5.0));
    assert_eq!(bound[2].0.position(), Point::new(40.0, 0.0));
    let group = view.group_item(bound[1].1).unwrap();
    assert_eq!(view.with_scene(|s| s.origin(group)).unwrap(), Some(Point::new(25.0, 5.0)));
}

#[test]
fn test_delete_selection_removes_objects() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let bound = boxes(&label, &view, 3);
    view.select(bound[0].1).unwrap();
    view.select(bound[2].1).unwrap();

    view.delete_selection().unwrap();

    assert_eq!(label.stacking_order(), vec![bound[1].0.id()]);
    assert_eq!(view.bindings(), vec![bound[1].1]);
    assert!(view.selected().is_empty());
}

#[test]
fn test_selection_restacking_keeps_relative_order() {
    let label = Label::new(300.0, 100.0);
    let view = View::with_memory_scene(&label);
    let bound = boxes(&label, &view, 4);
    let ids: Vec<u64> = bound.iter().map(|(o, _)| o.id()).collect();
    let keys: Vec<BindingKey> = bound.iter().map(|(_, k)| *k).collect();

    view.select(keys[0]).unwrap();
    view.select(keys[2]).unwrap();
    view.raise_selection_to_top().unwrap();
    assert_eq!(label.stacking_order(), vec![ids[1], ids[3], ids[0], ids[2]]);
    assert_eq!(view.stacking_order(), vec![keys[2], keys[0], keys[3], keys[1]]);

    view.lower_selection_to_bottom().unwrap();
    assert_eq!(label.stacking_order(), vec![ids[0], ids[2], ids[1], ids[3]]);
    assert_eq!(view.stacking_order(), vec![keys[3], keys[1], keys[2], keys[0]]);
}
