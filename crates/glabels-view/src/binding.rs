//! Object bindings.
//!
//! A [`Binding`] pairs one label object with its presentation in a scene:
//! a group item at the object's origin holding the rendered content, a
//! highlight overlay (hidden until selected), a lazily built context menu
//! and an optional property dialog. The binding owns all of those outright
//! and releases them together; it only observes the object, through a weak
//! reference and signal handlers it disconnects on release.
//!
//! Bindings live in the [`View`](crate::View) arena and are addressed by
//! [`BindingKey`]. Every scene operation takes the scene explicitly, so a
//! binding never holds a reference back into the view.

use crate::dialog::PropertyDialog;
use crate::highlight::HighlightStyle;
use crate::menu::ContextMenu;
use crate::presentation::Presentation;
use crate::scene::{ItemId, ItemRole, Scene, SceneError};
use generational_arena::Index;
use glabels_core::{Guard, HandlerId, LabelObject, ObjectId, ObjectKind, ViewError};
use std::cell::OnceCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifies a binding within its view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingKey(pub(crate) Index);

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index, generation) = self.0.into_raw_parts();
        write!(f, "Binding({}v{})", index, generation)
    }
}

/// The object signals a binding listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectSignal {
    Moved,
    Top,
    Bottom,
    Changed,
}

pub struct Binding {
    object: Weak<LabelObject>,
    object_id: ObjectId,
    kind: ObjectKind,
    style: HighlightStyle,
    group: ItemId,
    highlight: ItemId,
    content: Vec<ItemId>,
    menu: OnceCell<ContextMenu>,
    dialog: Option<Box<dyn PropertyDialog>>,
    listeners: Vec<(ObjectSignal, HandlerId)>,
    sync_guard: Rc<Guard>,
}

impl Binding {
    /// Create the scene items for `object`. On failure nothing is left
    /// behind in the scene.
    pub(crate) fn establish(
        object: &Rc<LabelObject>,
        style: HighlightStyle,
        scene: &mut dyn Scene,
    ) -> Result<Self, SceneError> {
        let origin = object.position();
        let kind = object.kind();

        let group = scene.create(None, ItemRole::Group, origin.x, origin.y)?;
        let (content, highlight) = match Self::build_parts(scene, group, style, object) {
            Ok(parts) => parts,
            Err(e) => {
                if let Err(cleanup) = scene.destroy(group) {
                    tracing::warn!("Failed to discard group {}: {}", group, cleanup);
                }
                return Err(e);
            }
        };

        tracing::debug!(
            "Bound {} object {} to group {} with {:?} highlight {}",
            kind,
            object.id(),
            group,
            style,
            highlight
        );

        Ok(Self {
            object: Rc::downgrade(object),
            object_id: object.id(),
            kind,
            style,
            group,
            highlight,
            content,
            menu: OnceCell::new(),
            dialog: None,
            listeners: Vec::new(),
            sync_guard: Rc::new(Guard::new()),
        })
    }

    fn build_parts(
        scene: &mut dyn Scene,
        group: ItemId,
        style: HighlightStyle,
        object: &LabelObject,
    ) -> Result<(Vec<ItemId>, ItemId), SceneError> {
        let kind = object.kind();
        scene.set_extent(group, kind.extent(object))?;
        let content = kind.build_content(scene, group, object)?;

        let origin = object.position();
        let highlight = scene.create(None, ItemRole::Highlight, origin.x, origin.y)?;
        let prepared = scene
            .hide(highlight)
            .and_then(|_| scene.set_outline(highlight, kind.highlight_geometry(style, object)));
        if let Err(e) = prepared {
            if let Err(cleanup) = scene.destroy(highlight) {
                tracing::warn!("Failed to discard highlight {}: {}", highlight, cleanup);
            }
            return Err(e);
        }
        Ok((content, highlight))
    }

    /// The bound object, unless it has been dropped.
    pub fn object(&self) -> Option<Rc<LabelObject>> {
        self.object.upgrade()
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn highlight_style(&self) -> HighlightStyle {
        self.style
    }

    pub fn group(&self) -> ItemId {
        self.group
    }

    pub fn highlight(&self) -> ItemId {
        self.highlight
    }

    pub fn content(&self) -> &[ItemId] {
        &self.content
    }

    pub fn has_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    pub(crate) fn sync_guard(&self) -> Rc<Guard> {
        Rc::clone(&self.sync_guard)
    }

    pub(crate) fn set_listeners(&mut self, listeners: Vec<(ObjectSignal, HandlerId)>) {
        self.listeners = listeners;
    }

    /// Follow a move of the object: group and highlight shift together.
    /// Each item is moved independently; a failure on one is logged and
    /// does not stop the other.
    pub(crate) fn on_domain_moved(&self, scene: &mut dyn Scene, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        if let Err(e) = scene.move_by(self.group, dx, dy) {
            tracing::warn!("Object {}: group did not follow move: {}", self.object_id, e);
        }
        if let Err(e) = scene.move_by(self.highlight, dx, dy) {
            tracing::warn!("Object {}: highlight did not follow move: {}", self.object_id, e);
        }
    }

    /// Put group and highlight back at the object's position after move
    /// notifications were missed. Does nothing once the object is gone.
    pub(crate) fn resync_position(&self, scene: &mut dyn Scene) {
        let Some(object) = self.object.upgrade() else {
            return;
        };
        let target = object.position();
        for (item, what) in [(self.group, "group"), (self.highlight, "highlight")] {
            let Some(at) = scene.origin(item) else {
                continue;
            };
            let (dx, dy) = (target.x - at.x, target.y - at.y);
            if dx == 0.0 && dy == 0.0 {
                continue;
            }
            if let Err(e) = scene.move_by(item, dx, dy) {
                tracing::warn!("Object {}: {} not resynced: {}", self.object_id, what, e);
            }
        }
    }

    /// Show the highlight above everything else in the scene.
    pub(crate) fn show_highlight(&self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        scene.show(self.highlight)?;
        scene.raise_to_top(self.highlight)
    }

    pub(crate) fn hide_highlight(&self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        scene.hide(self.highlight)
    }

    /// Recompute the highlight outline and handles from the object's size
    /// and rotation. Visibility is left alone.
    pub(crate) fn update_highlight(&self, scene: &mut dyn Scene) -> Result<(), ViewError> {
        let object = self.object.upgrade().ok_or(ViewError::ObjectGone {
            id: self.object_id,
        })?;
        let geometry = self.kind.highlight_geometry(self.style, &object);
        scene.set_outline(self.highlight, geometry).map_err(ViewError::from)
    }

    /// Rebuild the group's content and hit area after the object changed.
    pub(crate) fn refresh_content(&mut self, scene: &mut dyn Scene) -> Result<(), ViewError> {
        let object = self.object.upgrade().ok_or(ViewError::ObjectGone {
            id: self.object_id,
        })?;
        for item in self.content.drain(..) {
            if let Err(e) = scene.destroy(item) {
                tracing::warn!("Object {}: stale content item: {}", self.object_id, e);
            }
        }
        scene.set_extent(self.group, self.kind.extent(&object))?;
        self.content = self.kind.build_content(scene, self.group, &object)?;
        Ok(())
    }

    /// Raise group and highlight above every sibling.
    pub(crate) fn raise_to_top(&self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        let group = scene.raise_to_top(self.group);
        let highlight = scene.raise_to_top(self.highlight);
        group.and(highlight)
    }

    /// Lower the group beneath every other object but keep it above the
    /// `background` reserved layers at the bottom of the scene.
    pub(crate) fn lower_to_bottom(
        &self,
        scene: &mut dyn Scene,
        background: usize,
    ) -> Result<(), SceneError> {
        scene.lower_to_bottom(self.group)?;
        scene.raise(self.group, background)
    }

    /// Attach a property dialog. A previously attached dialog is handed
    /// back to the caller rather than destroyed.
    pub(crate) fn attach_dialog(
        &mut self,
        dialog: Box<dyn PropertyDialog>,
    ) -> Option<Box<dyn PropertyDialog>> {
        self.dialog.replace(dialog)
    }

    pub(crate) fn take_dialog(&mut self) -> Option<Box<dyn PropertyDialog>> {
        self.dialog.take()
    }

    /// Put back a dialog taken with [`take_dialog`](Self::take_dialog).
    /// If another dialog was attached in the meantime, `dialog` is dropped.
    pub(crate) fn restore_dialog(&mut self, dialog: Box<dyn PropertyDialog>) {
        if self.dialog.is_none() {
            self.dialog = Some(dialog);
        } else {
            tracing::debug!(
                "Object {}: dialog replaced while in use, dropping the old one",
                self.object_id
            );
        }
    }

    pub(crate) fn dialog_visible(&self) -> bool {
        self.dialog.as_ref().is_some_and(|d| d.is_visible())
    }

    pub(crate) fn menu(&self, key: BindingKey) -> &ContextMenu {
        self.menu.get_or_init(|| ContextMenu::new(key))
    }

    pub(crate) fn disconnect_listeners(&mut self) {
        let listeners = std::mem::take(&mut self.listeners);
        let Some(object) = self.object.upgrade() else {
            return;
        };
        for (signal, id) in listeners {
            let removed = match signal {
                ObjectSignal::Moved => object.moved().disconnect(id),
                ObjectSignal::Top => object.top().disconnect(id),
                ObjectSignal::Bottom => object.bottom().disconnect(id),
                ObjectSignal::Changed => object.changed().disconnect(id),
            };
            if !removed {
                tracing::debug!("Object {}: {:?} handler already gone", self.object_id, signal);
            }
        }
    }

    /// Release everything the binding owns: listeners, group (with its
    /// content), highlight, menu, dialog. Each release is independent.
    pub(crate) fn release(mut self, scene: &mut dyn Scene) {
        self.disconnect_listeners();

        if let Err(e) = scene.destroy(self.group) {
            tracing::warn!("Object {}: failed to destroy group: {}", self.object_id, e);
        }
        if let Err(e) = scene.destroy(self.highlight) {
            tracing::warn!("Object {}: failed to destroy highlight: {}", self.object_id, e);
        }
        drop(self.menu.take());
        drop(self.dialog.take());

        tracing::debug!("Released binding for object {}", self.object_id);
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("object_id", &self.object_id)
            .field("kind", &self.kind)
            .field("style", &self.style)
            .field("group", &self.group)
            .field("highlight", &self.highlight)
            .field("content", &self.content)
            .field("has_dialog", &self.dialog.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl From<SceneError> for ViewError {
    fn from(e: SceneError) -> Self {
        ViewError::Scene {
            reason: e.to_string(),
        }
    }
}
