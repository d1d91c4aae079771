//! Label objects.
//!
//! A [`LabelObject`] is shared (`Rc`) between its [`Label`] and whatever
//! presents or edits it. All state uses interior mutability so that views
//! holding only a `Weak` reference can observe it, and every mutation is
//! announced through the object's signals before the mutator returns.

use super::Label;
use crate::color::ColorNode;
use crate::error::LabelError;
use crate::geometry::{Point, Size};
use crate::label::text::TextLine;
use crate::signal::Signal;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

pub type ObjectId = u64;

/// The kinds of object a label can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Box,
    Ellipse,
    Line,
    Image,
    Text,
    Barcode,
}

impl ObjectKind {
    pub fn has_fill(self) -> bool {
        matches!(self, Self::Box | Self::Ellipse)
    }

    pub fn has_line(self) -> bool {
        matches!(self, Self::Box | Self::Ellipse | Self::Line)
    }

    pub fn has_text(self) -> bool {
        matches!(self, Self::Text)
    }

    /// Lines store their end point as a signed offset in `size`.
    pub fn allows_negative_size(self) -> bool {
        matches!(self, Self::Line)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box => write!(f, "Box"),
            Self::Ellipse => write!(f, "Ellipse"),
            Self::Line => write!(f, "Line"),
            Self::Image => write!(f, "Image"),
            Self::Text => write!(f, "Text"),
            Self::Barcode => write!(f, "Barcode"),
        }
    }
}

/// One object placed on a label.
#[derive(Debug)]
pub struct LabelObject {
    id: ObjectId,
    kind: ObjectKind,
    parent: RefCell<Weak<Label>>,
    position: Cell<Point>,
    size: Cell<Size>,
    rotation: Cell<f64>,
    fill: RefCell<ColorNode>,
    line: RefCell<ColorNode>,
    line_width: Cell<f64>,
    text: RefCell<Vec<TextLine>>,

    moved: Signal<(f64, f64)>,
    top: Signal<()>,
    bottom: Signal<()>,
    changed: Signal<()>,
}

impl LabelObject {
    pub(crate) fn new(
        id: ObjectId,
        kind: ObjectKind,
        parent: Weak<Label>,
        position: Point,
        size: Size,
    ) -> Self {
        Self {
            id,
            kind,
            parent: RefCell::new(parent),
            position: Cell::new(position),
            size: Cell::new(size),
            rotation: Cell::new(0.0),
            fill: RefCell::new(ColorNode::default()),
            line: RefCell::new(ColorNode::default()),
            line_width: Cell::new(1.0),
            text: RefCell::new(Vec::new()),
            moved: Signal::new("moved"),
            top: Signal::new("top"),
            bottom: Signal::new("bottom"),
            changed: Signal::new("changed"),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The label this object belongs to, if it is still attached.
    pub fn parent(&self) -> Option<Rc<Label>> {
        self.parent.borrow().upgrade()
    }

    pub(crate) fn detach(&self) {
        *self.parent.borrow_mut() = Weak::new();
    }

    pub fn position(&self) -> Point {
        self.position.get()
    }

    /// Move to an absolute position. Emits `moved` with the delta.
    pub fn set_position(&self, x: f64, y: f64) {
        let old = self.position.get();
        self.move_by(x - old.x, y - old.y);
    }

    /// Translate by `(dx, dy)`. A zero delta changes nothing and emits
    /// nothing.
    pub fn move_by(&self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.position.set(self.position.get().offset(dx, dy));
        tracing::debug!("object {} moved by ({}, {})", self.id, dx, dy);
        self.moved.emit(&(dx, dy));
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    pub fn set_size(&self, w: f64, h: f64) -> Result<(), LabelError> {
        if !w.is_finite() || !h.is_finite() {
            return Err(LabelError::InvalidGeometry {
                reason: format!("size ({}, {}) is not finite", w, h),
            });
        }
        if !self.kind.allows_negative_size() && (w < 0.0 || h < 0.0) {
            return Err(LabelError::InvalidGeometry {
                reason: format!("{} size ({}, {}) is negative", self.kind, w, h),
            });
        }
        let size = Size::new(w, h);
        if size != self.size.get() {
            self.size.set(size);
            self.changed.emit(&());
        }
        Ok(())
    }

    /// Rotation in degrees, normalised to `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation.get()
    }

    pub fn set_rotation(&self, degrees: f64) -> Result<(), LabelError> {
        if !degrees.is_finite() {
            return Err(LabelError::InvalidGeometry {
                reason: format!("rotation {} is not finite", degrees),
            });
        }
        let degrees = degrees.rem_euclid(360.0);
        if degrees != self.rotation.get() {
            self.rotation.set(degrees);
            self.changed.emit(&());
        }
        Ok(())
    }

    pub fn fill(&self) -> ColorNode {
        self.fill.borrow().clone()
    }

    pub fn set_fill(&self, fill: ColorNode) {
        if *self.fill.borrow() == fill {
            return;
        }
        *self.fill.borrow_mut() = fill;
        self.changed.emit(&());
    }

    pub fn line(&self) -> ColorNode {
        self.line.borrow().clone()
    }

    pub fn set_line(&self, line: ColorNode) {
        if *self.line.borrow() == line {
            return;
        }
        *self.line.borrow_mut() = line;
        self.changed.emit(&());
    }

    pub fn line_width(&self) -> f64 {
        self.line_width.get()
    }

    pub fn set_line_width(&self, width: f64) -> Result<(), LabelError> {
        if !width.is_finite() || width < 0.0 {
            return Err(LabelError::InvalidGeometry {
                reason: format!("line width {} must be a non-negative number", width),
            });
        }
        if width != self.line_width.get() {
            self.line_width.set(width);
            self.changed.emit(&());
        }
        Ok(())
    }

    pub fn text(&self) -> Vec<TextLine> {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, lines: Vec<TextLine>) {
        if *self.text.borrow() == lines {
            return;
        }
        *self.text.borrow_mut() = lines;
        self.changed.emit(&());
    }

    /// Move this object to the top of its label's stacking order and emit
    /// `top`.
    pub fn raise_to_top(&self) {
        if let Some(label) = self.parent() {
            label.restack(self.id, true);
        }
        tracing::debug!("object {} raised to top", self.id);
        self.top.emit(&());
    }

    /// Move this object to the bottom of its label's stacking order and
    /// emit `bottom`.
    pub fn lower_to_bottom(&self) {
        if let Some(label) = self.parent() {
            label.restack(self.id, false);
        }
        tracing::debug!("object {} lowered to bottom", self.id);
        self.bottom.emit(&());
    }

    /// Emitted with `(dx, dy)` after every non-zero move.
    pub fn moved(&self) -> &Signal<(f64, f64)> {
        &self.moved
    }

    /// Emitted after the object was raised to the top.
    pub fn top(&self) -> &Signal<()> {
        &self.top
    }

    /// Emitted after the object was lowered to the bottom.
    pub fn bottom(&self) -> &Signal<()> {
        &self.bottom
    }

    /// Emitted after any property other than position changed.
    pub fn changed(&self) -> &Signal<()> {
        &self.changed
    }
}
