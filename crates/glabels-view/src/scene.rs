//! Scene collaborator.
//!
//! The view never draws. It creates, moves, restacks and shows/hides opaque
//! items through the [`Scene`] trait; whatever renders the label implements
//! it. [`MemoryScene`] is the in-process implementation used by tests and
//! by the headless binary: an arena of nodes with per-parent child lists in
//! stacking order, bottom first.

use crate::highlight::HighlightGeometry;
use generational_arena::{Arena, Index};
use glabels_core::{ObjectKind, Point, Size};
use std::fmt;
use thiserror::Error;

/// Identifies an item in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Index);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index, generation) = self.0.into_raw_parts();
        write!(f, "Item({}v{})", index, generation)
    }
}

/// What an item is for. Renderers use it to pick a drawing routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRole {
    /// Container positioned at an object's origin.
    Group,
    /// Rendered form of an object, inside its group.
    Content(ObjectKind),
    /// Selection overlay.
    Highlight,
    /// Reserved layer beneath every object (label outline, markup).
    Background,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Unknown scene item {0}")]
    UnknownItem(ItemId),

    #[error("Scene item {item} cannot be a parent: {reason}")]
    InvalidParent { item: ItemId, reason: String },
}

/// Capabilities the view needs from a scene graph.
///
/// Stacking is per parent: `raise`, `raise_to_top` and `lower_to_bottom`
/// reorder an item among its siblings only.
pub trait Scene {
    /// Create an item at `(x, y)` relative to `parent` (the root when
    /// `None`), on top of its siblings and visible.
    fn create(
        &mut self,
        parent: Option<ItemId>,
        role: ItemRole,
        x: f64,
        y: f64,
    ) -> Result<ItemId, SceneError>;

    fn move_by(&mut self, item: ItemId, dx: f64, dy: f64) -> Result<(), SceneError>;

    fn raise_to_top(&mut self, item: ItemId) -> Result<(), SceneError>;

    fn lower_to_bottom(&mut self, item: ItemId) -> Result<(), SceneError>;

    /// Raise by `steps` positions, stopping at the top.
    fn raise(&mut self, item: ItemId, steps: usize) -> Result<(), SceneError>;

    fn show(&mut self, item: ItemId) -> Result<(), SceneError>;

    fn hide(&mut self, item: ItemId) -> Result<(), SceneError>;

    /// Destroy an item and all its descendants.
    fn destroy(&mut self, item: ItemId) -> Result<(), SceneError>;

    /// Set the item's local bounding box, measured from its origin.
    /// Negative components extend up/left of the origin.
    fn set_extent(&mut self, item: ItemId, extent: Size) -> Result<(), SceneError>;

    /// Set the outline and handles a highlight item draws.
    fn set_outline(
        &mut self,
        item: ItemId,
        geometry: HighlightGeometry,
    ) -> Result<(), SceneError>;

    /// True if the visible item's extent contains `point` (root coordinates).
    fn contains_point(&self, item: ItemId, point: Point) -> bool;

    /// Children of `parent` (the root when `None`), bottom first.
    fn stacking(&self, parent: Option<ItemId>) -> Vec<ItemId>;

    /// Item origin in root coordinates.
    fn origin(&self, item: ItemId) -> Option<Point>;

    fn is_visible(&self, item: ItemId) -> bool;

    fn exists(&self, item: ItemId) -> bool;
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<ItemId>,
    role: ItemRole,
    x: f64,
    y: f64,
    extent: Size,
    visible: bool,
    outline: Option<HighlightGeometry>,
    children: Vec<ItemId>,
}

/// Scene graph kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: Arena<Node>,
    root: Vec<ItemId>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn role(&self, item: ItemId) -> Option<ItemRole> {
        self.nodes.get(item.0).map(|n| n.role)
    }

    pub fn extent(&self, item: ItemId) -> Option<Size> {
        self.nodes.get(item.0).map(|n| n.extent)
    }

    pub fn outline(&self, item: ItemId) -> Option<&HighlightGeometry> {
        self.nodes.get(item.0).and_then(|n| n.outline.as_ref())
    }

    /// Position of `item` among its siblings, 0 being the bottom.
    pub fn depth(&self, item: ItemId) -> Option<usize> {
        let node = self.nodes.get(item.0)?;
        self.siblings(node.parent)?.iter().position(|i| *i == item)
    }

    fn node_mut(&mut self, item: ItemId) -> Result<&mut Node, SceneError> {
        self.nodes
            .get_mut(item.0)
            .ok_or(SceneError::UnknownItem(item))
    }

    fn siblings(&self, parent: Option<ItemId>) -> Option<&Vec<ItemId>> {
        match parent {
            None => Some(&self.root),
            Some(p) => self.nodes.get(p.0).map(|n| &n.children),
        }
    }

    fn siblings_of_mut(&mut self, item: ItemId) -> Result<&mut Vec<ItemId>, SceneError> {
        let parent = self
            .nodes
            .get(item.0)
            .ok_or(SceneError::UnknownItem(item))?
            .parent;
        match parent {
            None => Ok(&mut self.root),
            Some(p) => Ok(&mut self.node_mut(p)?.children),
        }
    }

    /// Move `item` to `target(current_index, sibling_count)` among its siblings.
    fn restack<F>(&mut self, item: ItemId, target: F) -> Result<(), SceneError>
    where
        F: FnOnce(usize, usize) -> usize,
    {
        let siblings = self.siblings_of_mut(item)?;
        let index = siblings
            .iter()
            .position(|i| *i == item)
            .ok_or(SceneError::UnknownItem(item))?;
        let len = siblings.len();
        let new_index = target(index, len).min(len - 1);
        if new_index != index {
            let id = siblings.remove(index);
            siblings.insert(new_index, id);
        }
        Ok(())
    }
}

impl Scene for MemoryScene {
    fn create(
        &mut self,
        parent: Option<ItemId>,
        role: ItemRole,
        x: f64,
        y: f64,
    ) -> Result<ItemId, SceneError> {
        if let Some(p) = parent {
            let parent_role = self
                .nodes
                .get(p.0)
                .ok_or(SceneError::UnknownItem(p))?
                .role;
            if parent_role != ItemRole::Group {
                return Err(SceneError::InvalidParent {
                    item: p,
                    reason: format!("{:?} items cannot hold children", parent_role),
                });
            }
        }

        let id = ItemId(self.nodes.insert(Node {
            parent,
            role,
            x,
            y,
            extent: Size::default(),
            visible: true,
            outline: None,
            children: Vec::new(),
        }));
        match parent {
            None => self.root.push(id),
            Some(p) => self.node_mut(p)?.children.push(id),
        }
        Ok(id)
    }

    fn move_by(&mut self, item: ItemId, dx: f64, dy: f64) -> Result<(), SceneError> {
        let node = self.node_mut(item)?;
        node.x += dx;
        node.y += dy;
        Ok(())
    }

    fn raise_to_top(&mut self, item: ItemId) -> Result<(), SceneError> {
        self.restack(item, |_, len| len - 1)
    }

    fn lower_to_bottom(&mut self, item: ItemId) -> Result<(), SceneError> {
        self.restack(item, |_, _| 0)
    }

    fn raise(&mut self, item: ItemId, steps: usize) -> Result<(), SceneError> {
        self.restack(item, |index, _| index.saturating_add(steps))
    }

    fn show(&mut self, item: ItemId) -> Result<(), SceneError> {
        self.node_mut(item)?.visible = true;
        Ok(())
    }

    fn hide(&mut self, item: ItemId) -> Result<(), SceneError> {
        self.node_mut(item)?.visible = false;
        Ok(())
    }

    fn destroy(&mut self, item: ItemId) -> Result<(), SceneError> {
        self.siblings_of_mut(item)?.retain(|i| *i != item);

        let mut pending = vec![item];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(id.0) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    fn set_extent(&mut self, item: ItemId, extent: Size) -> Result<(), SceneError> {
        self.node_mut(item)?.extent = extent;
        Ok(())
    }

    fn set_outline(
        &mut self,
        item: ItemId,
        geometry: HighlightGeometry,
    ) -> Result<(), SceneError> {
        self.node_mut(item)?.outline = Some(geometry);
        Ok(())
    }

    fn contains_point(&self, item: ItemId, point: Point) -> bool {
        let (Some(node), Some(origin)) = (self.nodes.get(item.0), self.origin(item)) else {
            return false;
        };
        if !node.visible {
            return false;
        }
        let (x0, x1) = ordered(origin.x, origin.x + node.extent.w);
        let (y0, y1) = ordered(origin.y, origin.y + node.extent.h);
        point.x >= x0 && point.x <= x1 && point.y >= y0 && point.y <= y1
    }

    fn stacking(&self, parent: Option<ItemId>) -> Vec<ItemId> {
        self.siblings(parent).cloned().unwrap_or_default()
    }

    fn origin(&self, item: ItemId) -> Option<Point> {
        let mut node = self.nodes.get(item.0)?;
        let mut origin = Point::new(node.x, node.y);
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent.0)?;
            origin = origin.offset(node.x, node.y);
        }
        Some(origin)
    }

    fn is_visible(&self, item: ItemId) -> bool {
        self.nodes.get(item.0).is_some_and(|n| n.visible)
    }

    fn exists(&self, item: ItemId) -> bool {
        self.nodes.contains(item.0)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
