//! Partial scene failures: one item refusing an operation must not stop
//! the binding's other items.

use glabels_core::{Label, ObjectKind, Point, Size};
use glabels_view::{
    HighlightGeometry, HighlightStyle, ItemId, ItemRole, MemoryScene, Scene, SceneError, View,
};
use std::cell::Cell;
use std::rc::Rc;

/// Delegates to a [`MemoryScene`] but rejects moves and destruction of one
/// chosen item.
struct FlakyScene {
    inner: MemoryScene,
    rejected: Rc<Cell<Option<ItemId>>>,
}

impl FlakyScene {
    fn check(&self, item: ItemId) -> Result<(), SceneError> {
        match self.rejected.get() {
            Some(rejected) if rejected == item => Err(SceneError::UnknownItem(item)),
            _ => Ok(()),
        }
    }
}

impl Scene for FlakyScene {
    fn create(
        &mut self,
        parent: Option<ItemId>,
        role: ItemRole,
        x: f64,
        y: f64,
    ) -> Result<ItemId, SceneError> {
        self.inner.create(parent, role, x, y)
    }

    fn move_by(&mut self, item: ItemId, dx: f64, dy: f64) -> Result<(), SceneError> {
        self.check(item)?;
        self.inner.move_by(item, dx, dy)
    }

    fn raise_to_top(&mut self, item: ItemId) -> Result<(), SceneError> {
        self.inner.raise_to_top(item)
    }

    fn lower_to_bottom(&mut self, item: ItemId) -> Result<(), SceneError> {
        self.inner.lower_to_bottom(item)
    }

    fn raise(&mut self, item: ItemId, steps: usize) -> Result<(), SceneError> {
        self.inner.raise(item, steps)
    }

    fn show(&mut self, item: ItemId) -> Result<(), SceneError> {
        self.inner.show(item)
    }

    fn hide(&mut self, item: ItemId) -> Result<(), SceneError> {
        self.inner.hide(item)
    }

    fn destroy(&mut self, item: ItemId) -> Result<(), SceneError> {
        self.check(item)?;
        self.inner.destroy(item)
    }

    fn set_extent(&mut self, item: ItemId, extent: Size) -> Result<(), SceneError> {
        self.inner.set_extent(item, extent)
    }

    fn set_outline(
        &mut self,
        item: ItemId,
        geometry: HighlightGeometry,
    ) -> Result<(), SceneError> {
        self.inner.set_outline(item, geometry)
    }

    fn contains_point(&self, item: ItemId, point: Point) -> bool {
        self.inner.contains_point(item, point)
    }

    fn stacking(&self, parent: Option<ItemId>) -> Vec<ItemId> {
        self.inner.stacking(parent)
    }

    fn origin(&self, item: ItemId) -> Option<Point> {
        self.inner.origin(item)
    }

    fn is_visible(&self, item: ItemId) -> bool {
        self.inner.is_visible(item)
    }

    fn exists(&self, item: ItemId) -> bool {
        self.inner.exists(item)
    }
}

fn flaky_view(label: &Rc<Label>) -> (View, Rc<Cell<Option<ItemId>>>) {
    let rejected = Rc::new(Cell::new(None));
    let scene = FlakyScene {
        inner: MemoryScene::new(),
        rejected: Rc::clone(&rejected),
    };
    (View::new(label, Box::new(scene)), rejected)
}

fn origin(view: &View, item: ItemId) -> Option<Point> {
    view.with_scene(|s| s.origin(item)).unwrap()
}

#[test]
fn test_group_follows_move_when_highlight_refuses() {
    let label = Label::new(200.0, 100.0);
    let obj = label.add_object(ObjectKind::Box, 10.0, 10.0, 20.0, 20.0);
    let (view, rejected) = flaky_view(&label);
    let key = view.bind(&obj, HighlightStyle::ResizeHandles).unwrap();
    let group = view.group_item(key).unwrap();
    let highlight = view.highlight_item(key).unwrap();

    rejected.set(Some(highlight));
    obj.move_by(5.0, 5.0);
    assert_eq!(origin(&view, group), Some(Point::new(15.0, 15.0)));
    assert_eq!(origin(&view, highlight), Some(Point::new(10.0, 10.0)));

    rejected.set(Some(group));
    obj.move_by(1.0, 2.0);
    assert_eq!(origin(&view, group), Some(Point::new(15.0, 15.0)));
    assert_eq!(origin(&view, highlight), Some(Point::new(11.0, 12.0)));
}

#[test]
fn test_teardown_completes_when_group_refuses_destroy() {
    let label = Label::new(200.0, 100.0);
    let obj = label.add_object(ObjectKind::Box, 10.0, 10.0, 20.0, 20.0);
    let (view, rejected) = flaky_view(&label);
    let key = view.bind_default(&obj).unwrap();
    view.select(key).unwrap();
    let group = view.group_item(key).unwrap();
    let highlight = view.highlight_item(key).unwrap();

    rejected.set(Some(group));
    view.teardown(key).unwrap();

    assert!(!view.contains(key));
    assert!(view.is_empty());
    assert!(view.selected().is_empty());
    assert_eq!(view.binding_for(obj.id()), None);
    assert_eq!(obj.moved().handler_count(), 0);
    assert_eq!(obj.changed().handler_count(), 0);
    view.with_scene(|s| {
        assert!(!s.exists(highlight));
        // The refused group is left behind in the scene.
        assert!(s.exists(group));
    })
    .unwrap();
}

#[test]
fn test_teardown_completes_when_highlight_refuses_destroy() {
    let label = Label::new(200.0, 100.0);
    let obj = label.add_object(ObjectKind::Ellipse, 0.0, 0.0, 20.0, 20.0);
    let (view, rejected) = flaky_view(&label);
    let key = view.bind_default(&obj).unwrap();
    let group = view.group_item(key).unwrap();
    let highlight = view.highlight_item(key).unwrap();

    rejected.set(Some(highlight));
    label.remove_object(obj.id()).unwrap();

    assert!(!view.contains(key));
    view.with_scene(|s| {
        assert!(!s.exists(group));
        assert!(s.exists(highlight));
    })
    .unwrap();
}
