//! Drag-to-create tool.
//!
//! Press adds an empty object to the label at the pointer and binds it;
//! motion stretches it between the press point and the pointer; release
//! gives it a default size if the pointer never moved and selects it.

use crate::binding::BindingKey;
use crate::view::View;
use glabels_core::{Error, LabelObject, ObjectKind, Point, Result, Size};
use std::rc::Rc;

struct Creation {
    object: Rc<LabelObject>,
    key: BindingKey,
    anchor: Point,
}

pub struct CreateTool {
    kind: ObjectKind,
    default_size: Size,
    active: Option<Creation>,
}

impl CreateTool {
    pub fn new(kind: ObjectKind, default_size: Size) -> Self {
        Self {
            kind,
            default_size,
            active: None,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start creating an object at `point`.
    pub fn press(&mut self, view: &View, point: Point) -> Result<BindingKey> {
        if self.active.is_some() {
            tracing::warn!("{} creation restarted before release", self.kind);
        }
        let label = view
            .label()
            .ok_or_else(|| Error::tool("cannot create an object: label is gone"))?;

        let object = label.add_object(self.kind, point.x, point.y, 0.0, 0.0);
        let key = match view.bind_default(&object) {
            Ok(key) => key,
            Err(e) => {
                label.remove_object(object.id())?;
                return Err(e.into());
            }
        };
        tracing::debug!("Creating {} object {} at ({}, {})", self.kind, object.id(), point.x, point.y);

        self.active = Some(Creation {
            object,
            key,
            anchor: point,
        });
        Ok(key)
    }

    /// Stretch the object being created to `point`. Does nothing when no
    /// creation is in progress.
    pub fn motion(&mut self, point: Point) -> Result<()> {
        match &self.active {
            Some(creation) => stretch(self.kind, creation, point),
            None => Ok(()),
        }
    }

    /// Finish the creation at `point` and select the new object alone.
    pub fn release(&mut self, view: &View, point: Point) -> Result<BindingKey> {
        let creation = self
            .active
            .take()
            .ok_or_else(|| Error::tool("release without a creation in progress"))?;

        stretch(self.kind, &creation, point)?;
        if creation.object.size().is_empty() {
            creation
                .object
                .set_size(self.default_size.w, self.default_size.h)?;
        }
        view.select_only(creation.key)?;
        Ok(creation.key)
    }
}

fn stretch(kind: ObjectKind, creation: &Creation, point: Point) -> Result<()> {
    let Creation { object, anchor, .. } = creation;
    let dx = point.x - anchor.x;
    let dy = point.y - anchor.y;
    if kind.allows_negative_size() {
        object.set_size(dx, dy)?;
    } else {
        object.set_position(anchor.x.min(point.x), anchor.y.min(point.y));
        object.set_size(dx.abs(), dy.abs())?;
    }
    Ok(())
}
