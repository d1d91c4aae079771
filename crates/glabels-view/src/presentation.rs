//! Per-kind presentation.
//!
//! Every object kind is presented the same way (a group at the object's
//! origin holding the rendered content, plus a highlight overlay); what
//! varies per kind is which content items go into the group, how big the
//! hit area is, and which highlight the kind gets by default.

use crate::highlight::{HighlightGeometry, HighlightStyle};
use crate::scene::{ItemId, ItemRole, Scene, SceneError};
use glabels_core::{LabelObject, ObjectKind, Size};

pub trait Presentation {
    /// Highlight used when a binding is created without an explicit style.
    fn default_highlight_style(&self) -> HighlightStyle;

    /// Create the content items for `object` inside `group`.
    fn build_content(
        &self,
        scene: &mut dyn Scene,
        group: ItemId,
        object: &LabelObject,
    ) -> Result<Vec<ItemId>, SceneError>;

    /// Hit-test extent of the group, relative to the object origin.
    fn extent(&self, object: &LabelObject) -> Size;

    fn highlight_geometry(&self, style: HighlightStyle, object: &LabelObject) -> HighlightGeometry {
        HighlightGeometry::compute(style, object.size(), object.rotation())
    }
}

impl Presentation for ObjectKind {
    fn default_highlight_style(&self) -> HighlightStyle {
        match self {
            ObjectKind::Box | ObjectKind::Ellipse | ObjectKind::Image => {
                HighlightStyle::ResizeHandles
            }
            ObjectKind::Line => HighlightStyle::LineOnly,
            ObjectKind::Text | ObjectKind::Barcode => HighlightStyle::Outline,
        }
    }

    fn build_content(
        &self,
        scene: &mut dyn Scene,
        group: ItemId,
        object: &LabelObject,
    ) -> Result<Vec<ItemId>, SceneError> {
        let extent = self.extent(object);
        let mut items = Vec::new();
        match self {
            ObjectKind::Text => {
                // One item per line so renderers can lay lines out independently.
                let lines = object.text().len().max(1);
                let line_height = extent.h / lines as f64;
                for i in 0..lines {
                    let item = scene.create(
                        Some(group),
                        ItemRole::Content(*self),
                        0.0,
                        line_height * i as f64,
                    )?;
                    scene.set_extent(item, Size::new(extent.w, line_height))?;
                    items.push(item);
                }
            }
            _ => {
                let item = scene.create(Some(group), ItemRole::Content(*self), 0.0, 0.0)?;
                scene.set_extent(item, extent)?;
                items.push(item);
            }
        }
        Ok(items)
    }

    fn extent(&self, object: &LabelObject) -> Size {
        let size = object.size();
        match self {
            // Widen thin lines so they can still be clicked.
            ObjectKind::Line => {
                let pad = object.line_width().max(1.0);
                Size::new(
                    if size.w == 0.0 { pad } else { size.w },
                    if size.h == 0.0 { pad } else { size.h },
                )
            }
            _ => size,
        }
    }
}
