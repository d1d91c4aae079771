//! The view: registry of bindings for one label shown in one scene.
//!
//! A [`View`] owns the scene, every [`Binding`] (in a generational arena,
//! addressed by [`BindingKey`]), the ordered binding list, the selection
//! and the reserved background layers. It is a cheap clonable handle;
//! clones share one registry.
//!
//! Domain objects notify the view through handlers that capture a weak
//! handle, so neither side keeps the other alive. Domain mutators are only
//! ever called while the registry is not borrowed, which lets their
//! notifications come straight back into the view within the same call
//! stack. A notification that arrives while the registry is borrowed is
//! refused with [`ViewError::Busy`] and logged.

use crate::binding::{Binding, BindingKey, ObjectSignal};
use crate::dialog::PropertyDialog;
use crate::event::{Button, EventResponse, ItemEvent};
use crate::highlight::HighlightStyle;
use crate::menu::{ContextMenu, MenuAction};
use crate::presentation::Presentation;
use crate::scene::{ItemId, ItemRole, MemoryScene, Scene};
use generational_arena::Arena;
use glabels_core::{Guard, HandlerId, Label, LabelObject, ObjectId, Point, Signal, Size, ViewError};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

struct ViewState {
    label: Weak<Label>,
    label_handler: Option<HandlerId>,
    scene: Box<dyn Scene>,
    bindings: Arena<Binding>,
    /// Listed bindings, most recently added first.
    order: VecDeque<BindingKey>,
    selected: Vec<BindingKey>,
    /// Reserved layers, bottom first.
    background: Vec<ItemId>,
    by_object: HashMap<ObjectId, BindingKey>,
    /// Scene items that route input to a binding.
    routes: HashMap<ItemId, BindingKey>,
    drag: Option<Point>,
}

impl ViewState {
    fn is_listed(&self, key: BindingKey) -> bool {
        self.order.contains(&key)
    }

    fn belongs(&self, object: &LabelObject) -> bool {
        object
            .parent()
            .is_some_and(|parent| std::ptr::eq(Rc::as_ptr(&parent), self.label.as_ptr()))
    }

    /// Create a binding. Returns the key and whether it is new.
    fn bind(
        &mut self,
        object: &Rc<LabelObject>,
        style: HighlightStyle,
    ) -> Result<(BindingKey, bool), ViewError> {
        if !self.belongs(object) {
            tracing::warn!("Refusing to bind object {}: not part of this label", object.id());
            return Err(ViewError::ForeignObject { id: object.id() });
        }
        if let Some(key) = self.by_object.get(&object.id()).copied() {
            if !self.is_listed(key) {
                tracing::debug!("Listing {} again for object {}", key, object.id());
                self.order.push_front(key);
            } else {
                tracing::debug!("Object {} is already bound as {}", object.id(), key);
            }
            return Ok((key, false));
        }

        let binding = Binding::establish(object, style, self.scene.as_mut())?;
        let key = BindingKey(self.bindings.insert(binding));
        self.order.push_front(key);
        self.by_object.insert(object.id(), key);
        self.reroute(key);
        Ok((key, true))
    }

    fn reroute(&mut self, key: BindingKey) {
        self.routes.retain(|_, k| *k != key);
        let Some(binding) = self.bindings.get(key.0) else {
            return;
        };
        let items: Vec<ItemId> = [binding.group(), binding.highlight()]
            .into_iter()
            .chain(binding.content().iter().copied())
            .collect();
        for item in items {
            self.routes.insert(item, key);
        }
    }

    /// Drop `key` from the binding list and the selection. Returns whether
    /// it was selected.
    fn unlist(&mut self, key: BindingKey) -> bool {
        self.order.retain(|k| *k != key);
        let before = self.selected.len();
        self.selected.retain(|k| *k != key);
        before != self.selected.len()
    }

    /// Returns `None` when the binding was already gone, otherwise whether
    /// it was selected.
    fn teardown(&mut self, key: BindingKey) -> Option<bool> {
        let mut binding = self.bindings.remove(key.0)?;
        binding.disconnect_listeners();
        let was_selected = self.unlist(key);
        self.by_object.remove(&binding.object_id());
        self.routes.retain(|_, k| *k != key);
        if self.drag.is_some() && self.selected.is_empty() {
            self.drag = None;
        }
        binding.release(self.scene.as_mut());
        tracing::debug!("Tore down {}", key);
        Some(was_selected)
    }

    /// Listed bindings, topmost group first.
    fn stacking_order(&self) -> Vec<BindingKey> {
        self.scene
            .stacking(None)
            .into_iter()
            .rev()
            .filter_map(|item| {
                let key = *self.routes.get(&item)?;
                let binding = self.bindings.get(key.0)?;
                (binding.group() == item && self.is_listed(key)).then_some(key)
            })
            .collect()
    }

    fn selected_objects(&self, top_first: bool) -> Vec<Rc<LabelObject>> {
        let mut order = self.stacking_order();
        if !top_first {
            order.reverse();
        }
        order
            .into_iter()
            .filter(|k| self.selected.contains(k))
            .filter_map(|k| self.bindings.get(k.0)?.object())
            .collect()
    }
}

impl Drop for ViewState {
    fn drop(&mut self) {
        if let (Some(label), Some(id)) = (self.label.upgrade(), self.label_handler.take()) {
            label.object_removed().disconnect(id);
        }
        for (_, binding) in self.bindings.iter_mut() {
            binding.disconnect_listeners();
        }
    }
}

fn get(bindings: &Arena<Binding>, key: BindingKey) -> Result<&Binding, ViewError> {
    bindings.get(key.0).ok_or_else(|| unknown(key))
}

fn get_mut(bindings: &mut Arena<Binding>, key: BindingKey) -> Result<&mut Binding, ViewError> {
    bindings.get_mut(key.0).ok_or_else(|| unknown(key))
}

fn unknown(key: BindingKey) -> ViewError {
    ViewError::UnknownBinding {
        key: key.to_string(),
    }
}

/// Registry of bindings between a label's objects and a scene.
#[derive(Clone)]
pub struct View {
    state: Rc<RefCell<ViewState>>,
    selection_changed: Rc<Signal<()>>,
    /// Bindings whose move notification arrived while the view was busy.
    missed_moves: Rc<RefCell<Vec<BindingKey>>>,
}

#[derive(Clone)]
struct WeakView {
    state: Weak<RefCell<ViewState>>,
    selection_changed: Weak<Signal<()>>,
    missed_moves: Weak<RefCell<Vec<BindingKey>>>,
}

impl WeakView {
    fn upgrade(&self) -> Option<View> {
        Some(View {
            state: self.state.upgrade()?,
            selection_changed: self.selection_changed.upgrade()?,
            missed_moves: self.missed_moves.upgrade()?,
        })
    }
}

impl View {
    /// Create a view presenting `label` in `scene`. Bindings of objects the
    /// label removes are torn down automatically.
    pub fn new(label: &Rc<Label>, scene: Box<dyn Scene>) -> Self {
        let view = Self {
            state: Rc::new(RefCell::new(ViewState {
                label: Rc::downgrade(label),
                label_handler: None,
                scene,
                bindings: Arena::new(),
                order: VecDeque::new(),
                selected: Vec::new(),
                background: Vec::new(),
                by_object: HashMap::new(),
                routes: HashMap::new(),
                drag: None,
            })),
            selection_changed: Rc::new(Signal::new("selection-changed")),
            missed_moves: Rc::new(RefCell::new(Vec::new())),
        };

        let weak = view.downgrade();
        let handler = label.object_removed().connect(move |id: &ObjectId| {
            let Some(view) = weak.upgrade() else {
                return;
            };
            if let Some(key) = view.binding_for(*id) {
                if let Err(e) = view.teardown(key) {
                    tracing::warn!("Object {} removed but {} stayed: {}", id, key, e);
                }
            }
        });
        view.state.borrow_mut().label_handler = Some(handler);

        tracing::debug!("Created view for {}x{} label", label.width(), label.height());
        view
    }

    pub fn with_memory_scene(label: &Rc<Label>) -> Self {
        Self::new(label, Box::new(MemoryScene::new()))
    }

    fn downgrade(&self) -> WeakView {
        WeakView {
            state: Rc::downgrade(&self.state),
            selection_changed: Rc::downgrade(&self.selection_changed),
            missed_moves: Rc::downgrade(&self.missed_moves),
        }
    }

    fn with_state<R>(
        &self,
        operation: &str,
        f: impl FnOnce(&mut ViewState) -> R,
    ) -> Result<R, ViewError> {
        let result = match self.state.try_borrow_mut() {
            Ok(mut state) => Ok(f(&mut state)),
            Err(_) => {
                tracing::warn!("View busy, refusing {}", operation);
                return Err(ViewError::Busy {
                    operation: operation.to_string(),
                });
            }
        };
        self.catch_up_moves();
        result
    }

    /// Resync bindings that missed a move while the view was borrowed.
    fn catch_up_moves(&self) {
        if self.missed_moves.borrow().is_empty() {
            return;
        }
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        let keys = std::mem::take(&mut *self.missed_moves.borrow_mut());
        let s = &mut *state;
        for key in keys {
            if let Some(binding) = s.bindings.get(key.0) {
                tracing::debug!("{}: catching up with missed move", key);
                binding.resync_position(s.scene.as_mut());
            }
        }
    }

    fn read<R: Default>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        match self.state.try_borrow() {
            Ok(state) => f(&state),
            Err(_) => {
                tracing::warn!("View busy, query answered with default");
                R::default()
            }
        }
    }

    /// The label this view presents, while it is alive.
    pub fn label(&self) -> Option<Rc<Label>> {
        self.state.try_borrow().ok()?.label.upgrade()
    }

    /// Emitted after the set of selected bindings changed.
    pub fn selection_changed(&self) -> &Signal<()> {
        &self.selection_changed
    }

    /// Run `f` against the scene, read-only. Other view operations are
    /// refused while `f` runs; object moves made from inside `f` are
    /// applied to the scene once it returns.
    pub fn with_scene<R>(&self, f: impl FnOnce(&dyn Scene) -> R) -> Result<R, ViewError> {
        self.with_state("with_scene", |s| f(s.scene.as_ref()))
    }

    // ---- background layers ----

    /// Add a reserved layer above the existing ones and beneath every
    /// object. Bindings lowered afterwards stay above it.
    pub fn add_background_layer(&self) -> Result<ItemId, ViewError> {
        self.with_state("add_background_layer", |s| -> Result<ItemId, ViewError> {
            let (w, h) = s
                .label
                .upgrade()
                .map(|l| (l.width(), l.height()))
                .unwrap_or_default();
            let count = s.background.len();
            let item = s.scene.create(None, ItemRole::Background, 0.0, 0.0)?;
            let placed = s
                .scene
                .set_extent(item, Size::new(w, h))
                .and_then(|_| s.scene.lower_to_bottom(item))
                .and_then(|_| s.scene.raise(item, count));
            if let Err(e) = placed {
                if let Err(cleanup) = s.scene.destroy(item) {
                    tracing::warn!("Failed to discard background item {}: {}", item, cleanup);
                }
                return Err(e.into());
            }
            s.background.push(item);
            tracing::debug!("Background layer {} added as {}", count + 1, item);
            Ok(item)
        })?
    }

    pub fn background_item_count(&self) -> usize {
        self.read(|s| s.background.len())
    }

    // ---- bindings ----

    /// Bind `object` with `style`. Binding an already bound object returns
    /// the existing key, listing it again if it had been removed.
    pub fn bind(
        &self,
        object: &Rc<LabelObject>,
        style: HighlightStyle,
    ) -> Result<BindingKey, ViewError> {
        let (key, created) = self.with_state("bind", |s| s.bind(object, style))??;
        if created {
            self.connect_listeners(key, object);
        }
        Ok(key)
    }

    /// Bind with the kind's default highlight style.
    pub fn bind_default(&self, object: &Rc<LabelObject>) -> Result<BindingKey, ViewError> {
        self.bind(object, object.kind().default_highlight_style())
    }

    /// Bind every object of the label, bottom first, so scene stacking
    /// matches the label's.
    pub fn bind_all(&self) -> Result<Vec<BindingKey>, ViewError> {
        let Some(label) = self.label() else {
            return Ok(Vec::new());
        };
        label.objects().iter().map(|o| self.bind_default(o)).collect()
    }

    fn connect_listeners(&self, key: BindingKey, object: &Rc<LabelObject>) {
        let weak = self.downgrade();

        let moved = {
            let weak = weak.clone();
            object.moved().connect(move |delta: &(f64, f64)| {
                if let Some(view) = weak.upgrade() {
                    view.follow_move(key, delta.0, delta.1);
                }
            })
        };
        let top = {
            let weak = weak.clone();
            object.top().connect(move |_: &()| {
                if let Some(view) = weak.upgrade() {
                    view.follow_raise(key);
                }
            })
        };
        let bottom = {
            let weak = weak.clone();
            object.bottom().connect(move |_: &()| {
                if let Some(view) = weak.upgrade() {
                    view.follow_lower(key);
                }
            })
        };
        let changed = object.changed().connect(move |_: &()| {
            if let Some(view) = weak.upgrade() {
                view.follow_change(key);
            }
        });

        let listeners = vec![
            (ObjectSignal::Moved, moved),
            (ObjectSignal::Top, top),
            (ObjectSignal::Bottom, bottom),
            (ObjectSignal::Changed, changed),
        ];
        let stored = self.with_state("bind", |s| match s.bindings.get_mut(key.0) {
            Some(binding) => {
                binding.set_listeners(listeners);
                None
            }
            None => Some(listeners),
        });
        if !matches!(stored, Ok(None)) {
            tracing::warn!("{} vanished while connecting listeners", key);
            object.moved().disconnect(moved);
            object.top().disconnect(top);
            object.bottom().disconnect(bottom);
            object.changed().disconnect(changed);
        }
    }

    fn follow_move(&self, key: BindingKey, dx: f64, dy: f64) {
        let followed = self.with_state("follow move", |s| {
            if let Some(binding) = s.bindings.get(key.0) {
                binding.on_domain_moved(s.scene.as_mut(), dx, dy);
            }
        });
        if followed.is_err() {
            let mut missed = self.missed_moves.borrow_mut();
            if !missed.contains(&key) {
                missed.push(key);
            }
        }
    }

    fn follow_raise(&self, key: BindingKey) {
        if let Err(e) = self.raise_to_top(key) {
            tracing::warn!("{} did not follow raise: {}", key, e);
        }
    }

    fn follow_lower(&self, key: BindingKey) {
        if let Err(e) = self.lower_to_bottom(key) {
            tracing::warn!("{} did not follow lower: {}", key, e);
        }
    }

    fn follow_change(&self, key: BindingKey) {
        let guard = self.with_state("follow change", |s| -> Option<Rc<Guard>> {
            let binding = s.bindings.get_mut(key.0)?;
            if let Err(e) = binding.refresh_content(s.scene.as_mut()) {
                tracing::warn!("{}: content not refreshed: {}", key, e);
            }
            if let Err(e) = binding.update_highlight(s.scene.as_mut()) {
                tracing::warn!("{}: highlight not updated: {}", key, e);
            }
            let reload = binding.has_dialog().then(|| binding.sync_guard());
            s.reroute(key);
            reload
        });
        let Ok(Some(guard)) = guard else {
            return;
        };
        if guard.is_held() {
            return;
        }
        if let Err(e) = self.sync_dialog(key, false) {
            tracing::debug!("{}: dialog not reloaded: {}", key, e);
        }
    }

    /// Tear a binding down: disconnect its listeners, unlist it, release
    /// its scene items, menu and dialog. Tearing down a binding that is
    /// already gone does nothing.
    pub fn teardown(&self, key: BindingKey) -> Result<(), ViewError> {
        let was_selected = self.with_state("teardown", |s| s.teardown(key))?;
        if was_selected == Some(true) {
            self.selection_changed.emit(&());
        }
        Ok(())
    }

    /// List a binding again after [`remove`](Self::remove). Listing a
    /// listed binding is a no-op.
    pub fn add(&self, key: BindingKey) -> Result<(), ViewError> {
        self.with_state("add", |s| -> Result<(), ViewError> {
            get(&s.bindings, key)?;
            if !s.is_listed(key) {
                s.order.push_front(key);
            }
            Ok(())
        })?
    }

    /// Unlist a binding and drop it from the selection. Returns whether it
    /// was listed. The binding itself stays alive.
    pub fn remove(&self, key: BindingKey) -> bool {
        let result = self.with_state("remove", |s| {
            let listed = s.is_listed(key);
            let was_selected = s.unlist(key);
            if was_selected {
                if let Some(binding) = s.bindings.get(key.0) {
                    if let Err(e) = binding.hide_highlight(s.scene.as_mut()) {
                        tracing::warn!("{}: highlight not hidden: {}", key, e);
                    }
                }
            }
            (listed, was_selected)
        });
        match result {
            Ok((listed, was_selected)) => {
                if was_selected {
                    self.selection_changed.emit(&());
                }
                listed
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, key: BindingKey) -> bool {
        self.read(|s| s.is_listed(key))
    }

    /// Listed bindings, most recently added first.
    pub fn bindings(&self) -> Vec<BindingKey> {
        self.read(|s| s.order.iter().copied().collect())
    }

    pub fn len(&self) -> usize {
        self.read(|s| s.order.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn binding_for(&self, object: ObjectId) -> Option<BindingKey> {
        self.read(|s| s.by_object.get(&object).copied())
    }

    pub fn object(&self, key: BindingKey) -> Result<Rc<LabelObject>, ViewError> {
        self.with_state("object", |s| -> Result<Rc<LabelObject>, ViewError> {
            let binding = get(&s.bindings, key)?;
            binding.object().ok_or(ViewError::ObjectGone {
                id: binding.object_id(),
            })
        })?
    }

    pub fn group_item(&self, key: BindingKey) -> Option<ItemId> {
        self.read(|s| s.bindings.get(key.0).map(Binding::group))
    }

    pub fn highlight_item(&self, key: BindingKey) -> Option<ItemId> {
        self.read(|s| s.bindings.get(key.0).map(Binding::highlight))
    }

    pub fn highlight_style(&self, key: BindingKey) -> Option<HighlightStyle> {
        self.read(|s| s.bindings.get(key.0).map(Binding::highlight_style))
    }

    // ---- selection ----

    /// Select a listed binding and show its highlight on top. Selecting a
    /// selected binding raises its highlight again.
    pub fn select(&self, key: BindingKey) -> Result<(), ViewError> {
        let added = self.with_state("select", |s| -> Result<bool, ViewError> {
            if !s.is_listed(key) {
                return Err(unknown(key));
            }
            let binding = get(&s.bindings, key)?;
            binding.show_highlight(s.scene.as_mut())?;
            if s.selected.contains(&key) {
                Ok(false)
            } else {
                s.selected.push(key);
                Ok(true)
            }
        })??;
        if added {
            self.selection_changed.emit(&());
        }
        Ok(())
    }

    pub fn deselect(&self, key: BindingKey) -> Result<(), ViewError> {
        let removed = self.with_state("deselect", |s| -> Result<bool, ViewError> {
            let binding = get(&s.bindings, key)?;
            binding.hide_highlight(s.scene.as_mut())?;
            let before = s.selected.len();
            s.selected.retain(|k| *k != key);
            Ok(before != s.selected.len())
        })??;
        if removed {
            self.selection_changed.emit(&());
        }
        Ok(())
    }

    pub fn clear_selection(&self) -> Result<(), ViewError> {
        let changed = self.with_state("clear_selection", |s| {
            let keys = std::mem::take(&mut s.selected);
            for key in &keys {
                if let Some(binding) = s.bindings.get(key.0) {
                    if let Err(e) = binding.hide_highlight(s.scene.as_mut()) {
                        tracing::warn!("{}: highlight not hidden: {}", key, e);
                    }
                }
            }
            !keys.is_empty()
        })?;
        if changed {
            self.selection_changed.emit(&());
        }
        Ok(())
    }

    /// Make `key` the only selected binding.
    pub fn select_only(&self, key: BindingKey) -> Result<(), ViewError> {
        if !self.contains(key) {
            return Err(unknown(key));
        }
        let others: Vec<BindingKey> = self.selected().into_iter().filter(|k| *k != key).collect();
        for other in others {
            self.deselect(other)?;
        }
        self.select(key)
    }

    pub fn select_all(&self) -> Result<(), ViewError> {
        // Bottom first so the topmost object's highlight ends up on top.
        let mut keys = self.stacking_order();
        keys.reverse();
        for key in keys {
            self.select(key)?;
        }
        Ok(())
    }

    pub fn is_selected(&self, key: BindingKey) -> bool {
        self.read(|s| s.selected.contains(&key))
    }

    /// Selected bindings in selection order.
    pub fn selected(&self) -> Vec<BindingKey> {
        self.read(|s| s.selected.clone())
    }

    // ---- hit testing and stacking ----

    /// The topmost listed binding whose group contains `point`.
    pub fn query(&self, point: Point) -> Option<BindingKey> {
        self.read(|s| {
            s.stacking_order().into_iter().find(|key| {
                s.bindings
                    .get(key.0)
                    .is_some_and(|b| s.scene.contains_point(b.group(), point))
            })
        })
    }

    /// Listed bindings, topmost first.
    pub fn stacking_order(&self) -> Vec<BindingKey> {
        self.read(|s| s.stacking_order())
    }

    /// Raise the binding's group and highlight above every sibling. This
    /// only restacks the scene; see [`activate`](Self::activate) for the
    /// user action that also restacks the label.
    pub fn raise_to_top(&self, key: BindingKey) -> Result<(), ViewError> {
        self.with_state("raise_to_top", |s| -> Result<(), ViewError> {
            let binding = get(&s.bindings, key)?;
            binding.raise_to_top(s.scene.as_mut())?;
            Ok(())
        })?
    }

    /// Lower the binding's group beneath every other object, just above
    /// the background layers present right now.
    pub fn lower_to_bottom(&self, key: BindingKey) -> Result<(), ViewError> {
        self.with_state("lower_to_bottom", |s| -> Result<(), ViewError> {
            let background = s.background.len();
            let binding = get(&s.bindings, key)?;
            binding.lower_to_bottom(s.scene.as_mut(), background)?;
            Ok(())
        })?
    }

    pub fn show_highlight(&self, key: BindingKey) -> Result<(), ViewError> {
        self.with_state("show_highlight", |s| -> Result<(), ViewError> {
            let binding = get(&s.bindings, key)?;
            binding.show_highlight(s.scene.as_mut())?;
            Ok(())
        })?
    }

    pub fn hide_highlight(&self, key: BindingKey) -> Result<(), ViewError> {
        self.with_state("hide_highlight", |s| -> Result<(), ViewError> {
            let binding = get(&s.bindings, key)?;
            binding.hide_highlight(s.scene.as_mut())?;
            Ok(())
        })?
    }

    pub fn update_highlight(&self, key: BindingKey) -> Result<(), ViewError> {
        self.with_state("update_highlight", |s| -> Result<(), ViewError> {
            let binding = get(&s.bindings, key)?;
            binding.update_highlight(s.scene.as_mut())
        })?
    }

    // ---- dialog ----

    /// Attach a property dialog to a binding, returning the one it
    /// replaces.
    pub fn attach_dialog(
        &self,
        key: BindingKey,
        dialog: Box<dyn PropertyDialog>,
    ) -> Result<Option<Box<dyn PropertyDialog>>, ViewError> {
        self.with_state("attach_dialog", |s| -> Result<_, ViewError> {
            let binding = get_mut(&mut s.bindings, key)?;
            Ok(binding.attach_dialog(dialog))
        })?
    }

    /// Load the object into the dialog and show it.
    pub fn show_dialog(&self, key: BindingKey) -> Result<(), ViewError> {
        self.sync_dialog(key, true)
    }

    pub fn dialog_visible(&self, key: BindingKey) -> bool {
        self.read(|s| s.bindings.get(key.0).is_some_and(Binding::dialog_visible))
    }

    /// Run `f` on the binding's dialog. Object changes `f` causes do not
    /// reload the dialog.
    pub fn with_dialog<R>(
        &self,
        key: BindingKey,
        f: impl FnOnce(&mut dyn PropertyDialog) -> R,
    ) -> Result<R, ViewError> {
        let (mut dialog, guard) = self.with_state("with_dialog", |s| -> Result<_, ViewError> {
            let binding = get_mut(&mut s.bindings, key)?;
            let dialog = binding.take_dialog().ok_or_else(|| ViewError::NoDialog {
                key: key.to_string(),
            })?;
            Ok((dialog, binding.sync_guard()))
        })??;
        let result = {
            let _held = guard.hold();
            f(dialog.as_mut())
        };
        self.restore_dialog(key, dialog);
        Ok(result)
    }

    fn sync_dialog(&self, key: BindingKey, show: bool) -> Result<(), ViewError> {
        let (mut dialog, guard, object) = self.with_state("dialog", |s| -> Result<_, ViewError> {
            let binding = get_mut(&mut s.bindings, key)?;
            let object = binding.object().ok_or(ViewError::ObjectGone {
                id: binding.object_id(),
            })?;
            let dialog = binding.take_dialog().ok_or_else(|| ViewError::NoDialog {
                key: key.to_string(),
            })?;
            Ok((dialog, binding.sync_guard(), object))
        })??;
        {
            let _held = guard.hold();
            dialog.load(&object);
            if show {
                dialog.show_all();
            }
        }
        self.restore_dialog(key, dialog);
        Ok(())
    }

    fn restore_dialog(&self, key: BindingKey, dialog: Box<dyn PropertyDialog>) {
        let _ = self.with_state("restore dialog", |s| match s.bindings.get_mut(key.0) {
            Some(binding) => binding.restore_dialog(dialog),
            None => tracing::debug!("{} torn down while its dialog was in use", key),
        });
    }

    // ---- menu ----

    /// The binding's context menu, built on first request.
    pub fn menu(&self, key: BindingKey) -> Result<ContextMenu, ViewError> {
        self.with_state("menu", |s| -> Result<ContextMenu, ViewError> {
            let binding = get(&s.bindings, key)?;
            Ok(binding.menu(key).clone())
        })?
    }

    /// Run a context menu action on a binding.
    ///
    /// Bring to front and send to back restack the label object itself;
    /// the binding follows through the object's notifications. If the
    /// object is gone only the scene is restacked.
    pub fn activate(&self, key: BindingKey, action: MenuAction) -> Result<(), ViewError> {
        tracing::debug!("{}: {}", key, action);
        match action {
            MenuAction::EditProperties => self.show_dialog(key),
            MenuAction::Delete => self.teardown(key),
            MenuAction::BringToFront => match self.object(key) {
                Ok(object) => {
                    object.raise_to_top();
                    Ok(())
                }
                Err(ViewError::ObjectGone { .. }) => self.raise_to_top(key),
                Err(e) => Err(e),
            },
            MenuAction::SendToBack => match self.object(key) {
                Ok(object) => {
                    object.lower_to_bottom();
                    Ok(())
                }
                Err(ViewError::ObjectGone { .. }) => self.lower_to_bottom(key),
                Err(e) => Err(e),
            },
        }
    }

    // ---- input ----

    /// Handle an input event delivered to a scene item.
    pub fn handle_event(&self, item: ItemId, event: ItemEvent) -> Result<EventResponse, ViewError> {
        let Some(key) = self.read(|s| s.routes.get(&item).copied().filter(|k| s.is_listed(*k)))
        else {
            return Ok(EventResponse::Ignored);
        };

        match event {
            ItemEvent::ButtonPress {
                button: Button::Primary,
                point,
                add_modifier,
            } => {
                if add_modifier {
                    if self.is_selected(key) {
                        self.deselect(key)?;
                    } else {
                        self.select(key)?;
                    }
                } else if !self.is_selected(key) {
                    self.select_only(key)?;
                }
                self.with_state("drag", |s| s.drag = Some(point))?;
                Ok(EventResponse::Handled)
            }
            ItemEvent::ButtonPress {
                button: Button::Secondary,
                ..
            } => {
                if !self.is_selected(key) {
                    self.select_only(key)?;
                }
                Ok(EventResponse::PopupMenu(self.menu(key)?))
            }
            ItemEvent::DoubleClick { .. } => match self.show_dialog(key) {
                Ok(()) => Ok(EventResponse::Handled),
                Err(ViewError::NoDialog { .. }) => Ok(EventResponse::Ignored),
                Err(e) => Err(e),
            },
            ItemEvent::Motion { point } => {
                let anchor = self.with_state("drag", |s| -> Option<Point> {
                    let anchor = s.drag?;
                    s.drag = Some(point);
                    Some(anchor)
                })?;
                match anchor {
                    Some(anchor) => {
                        self.move_selection(point.x - anchor.x, point.y - anchor.y)?;
                        Ok(EventResponse::Handled)
                    }
                    None => Ok(EventResponse::Ignored),
                }
            }
            ItemEvent::ButtonRelease { .. } => {
                let dragging = self.with_state("drag", |s| s.drag.take())?;
                Ok(if dragging.is_some() {
                    EventResponse::Handled
                } else {
                    EventResponse::Ignored
                })
            }
        }
    }

    // ---- selection-wide operations ----

    /// Move every selected object. Bindings follow the objects.
    pub fn move_selection(&self, dx: f64, dy: f64) -> Result<(), ViewError> {
        let objects = self.with_state("move_selection", |s| s.selected_objects(true))?;
        for object in objects {
            object.move_by(dx, dy);
        }
        Ok(())
    }

    /// Remove every selected object from the label. Bindings are torn
    /// down as the label reports the removals; bindings whose object is no
    /// longer in the label are torn down directly.
    pub fn delete_selection(&self) -> Result<(), ViewError> {
        let keys = self.selected();
        let label = self.label();
        for key in keys {
            let id = match self.read(|s| s.bindings.get(key.0).map(Binding::object_id)) {
                Some(id) => id,
                None => continue,
            };
            if let Some(label) = label.as_ref().filter(|l| l.contains(id)) {
                if let Err(e) = label.remove_object(id) {
                    tracing::warn!("Object {} not removed: {}", id, e);
                }
            }
            // No-op when the removal above already tore it down.
            self.teardown(key)?;
        }
        Ok(())
    }

    /// Raise every selected object to the top, keeping their relative
    /// order.
    pub fn raise_selection_to_top(&self) -> Result<(), ViewError> {
        let objects = self.with_state("raise_selection_to_top", |s| s.selected_objects(false))?;
        for object in objects {
            object.raise_to_top();
        }
        Ok(())
    }

    /// Lower every selected object to the bottom, keeping their relative
    /// order.
    pub fn lower_selection_to_bottom(&self) -> Result<(), ViewError> {
        let objects = self.with_state("lower_selection_to_bottom", |s| s.selected_objects(true))?;
        for object in objects {
            object.lower_to_bottom();
        }
        Ok(())
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state.try_borrow() {
            Ok(s) => f
                .debug_struct("View")
                .field("bindings", &s.order.len())
                .field("selected", &s.selected.len())
                .field("background", &s.background.len())
                .finish(),
            Err(_) => f.write_str("View { <busy> }"),
        }
    }
}
