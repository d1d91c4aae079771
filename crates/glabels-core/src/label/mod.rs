//! The label document.
//!
//! A [`Label`] owns its objects in stacking order, bottom first, and knows
//! which merge fields are available to its objects. Views observe the
//! objects; they never own them.

pub mod object;
pub mod text;

pub use object::{LabelObject, ObjectId, ObjectKind};

use crate::error::LabelError;
use crate::geometry::{Point, Size};
use crate::signal::Signal;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug)]
pub struct Label {
    width: f64,
    height: f64,
    objects: RefCell<Vec<Rc<LabelObject>>>,
    next_id: Cell<ObjectId>,
    merge_fields: RefCell<Vec<String>>,

    object_removed: Signal<ObjectId>,
    merge_changed: Signal<()>,
}

impl Label {
    /// Create an empty label of the given size in points.
    pub fn new(width: f64, height: f64) -> Rc<Self> {
        Rc::new(Self {
            width,
            height,
            objects: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            merge_fields: RefCell::new(Vec::new()),
            object_removed: Signal::new("object-removed"),
            merge_changed: Signal::new("merge-changed"),
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Create an object on top of the stacking order.
    pub fn add_object(
        self: &Rc<Self>,
        kind: ObjectKind,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> Rc<LabelObject> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let object = Rc::new(LabelObject::new(
            id,
            kind,
            Rc::downgrade(self),
            Point::new(x, y),
            Size::new(w, h),
        ));
        self.objects.borrow_mut().push(Rc::clone(&object));
        tracing::debug!("label: added {} object {}", kind, id);
        object
    }

    /// Remove an object from the label. The object stays alive for as long
    /// as someone else holds it, but no longer takes part in stacking.
    pub fn remove_object(&self, id: ObjectId) -> Result<Rc<LabelObject>, LabelError> {
        let object = {
            let mut objects = self.objects.borrow_mut();
            let index = objects
                .iter()
                .position(|o| o.id() == id)
                .ok_or(LabelError::ObjectNotFound { id })?;
            objects.remove(index)
        };
        object.detach();
        tracing::debug!("label: removed object {}", id);
        self.object_removed.emit(&id);
        Ok(object)
    }

    pub fn object(&self, id: ObjectId) -> Option<Rc<LabelObject>> {
        self.objects.borrow().iter().find(|o| o.id() == id).cloned()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.borrow().iter().any(|o| o.id() == id)
    }

    /// All objects, bottom first.
    pub fn objects(&self) -> Vec<Rc<LabelObject>> {
        self.objects.borrow().clone()
    }

    /// Object ids, bottom first.
    pub fn stacking_order(&self) -> Vec<ObjectId> {
        self.objects.borrow().iter().map(|o| o.id()).collect()
    }

    pub fn object_count(&self) -> usize {
        self.objects.borrow().len()
    }

    /// Merge is enabled when a data source supplies at least one field.
    pub fn is_merge_enabled(&self) -> bool {
        !self.merge_fields.borrow().is_empty()
    }

    pub fn merge_fields(&self) -> Vec<String> {
        self.merge_fields.borrow().clone()
    }

    pub fn set_merge_fields(&self, keys: Vec<String>) {
        *self.merge_fields.borrow_mut() = keys;
        self.merge_changed.emit(&());
    }

    pub(crate) fn restack(&self, id: ObjectId, to_top: bool) {
        let mut objects = self.objects.borrow_mut();
        if let Some(index) = objects.iter().position(|o| o.id() == id) {
            let object = objects.remove(index);
            if to_top {
                objects.push(object);
            } else {
                objects.insert(0, object);
            }
        }
    }

    pub fn object_removed(&self) -> &Signal<ObjectId> {
        &self.object_removed
    }

    pub fn merge_changed(&self) -> &Signal<()> {
        &self.merge_changed
    }
}
