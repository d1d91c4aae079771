//! Object property editor
//!
//! [`ObjectEditor`] is the property dialog of one label object. It holds the
//! pages that fit the object's kind (fill page for boxes and ellipses, text
//! entry for text objects, line width for shapes with an outline), loads
//! them from the object and writes user edits back.
//!
//! The editor is a cheap handle: clones share state. One clone is attached
//! to the object's binding as its [`PropertyDialog`], another is kept by
//! whoever drives the user edits.
//!
//! While an object is loaded the editor follows its label's merge fields:
//! when they change, key lists and key controls are refreshed.

use crate::error::{EditorError, EditorResult};
use crate::fill_page::FillPage;
use crate::text_entry::TextEntry;
use glabels_core::{
    ColorNode, Guard, HandlerId, Label, LabelObject, ObjectId, ObjectKind, Rgba, Signal,
    TextLine,
};
use glabels_settings::Preferences;
use glabels_view::PropertyDialog;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct EditorState {
    object: Weak<LabelObject>,
    object_id: Option<ObjectId>,
    kind: Option<ObjectKind>,
    fill: Option<FillPage>,
    text: Option<TextEntry>,
    line_width: Option<f64>,
    visible: bool,
    /// Label whose merge fields the pages follow.
    label: Weak<Label>,
    merge_handler: Option<HandlerId>,
}

impl EditorState {
    fn stop_following_merge(&mut self) {
        let Some(id) = self.merge_handler.take() else {
            return;
        };
        if let Some(label) = self.label.upgrade() {
            label.merge_changed().disconnect(id);
        }
        self.label = Weak::new();
    }
}

impl Drop for EditorState {
    fn drop(&mut self) {
        self.stop_following_merge();
    }
}

#[derive(Clone)]
pub struct ObjectEditor {
    state: Rc<RefCell<EditorState>>,
    default_fill_color: Rgba,
    /// Held while an edit is written to the object, so the reload the
    /// object's change notification triggers is skipped.
    applying: Rc<Guard>,
    changed: Rc<Signal<()>>,
}

impl ObjectEditor {
    pub fn new(prefs: &Preferences) -> Self {
        Self {
            state: Rc::new(RefCell::new(EditorState {
                object: Weak::new(),
                object_id: None,
                kind: None,
                fill: None,
                text: None,
                line_width: None,
                visible: false,
                label: Weak::new(),
                merge_handler: None,
            })),
            default_fill_color: prefs.default_fill_color,
            applying: Rc::new(Guard::new()),
            changed: Rc::new(Signal::new("object-editor-changed")),
        }
    }

    /// Id of the loaded object.
    pub fn object_id(&self) -> Option<ObjectId> {
        self.state.borrow().object_id
    }

    pub fn kind(&self) -> Option<ObjectKind> {
        self.state.borrow().kind
    }

    /// Emitted after a user edit was written to the object.
    pub fn changed(&self) -> &Signal<()> {
        &self.changed
    }

    pub fn with_fill_page<R>(&self, f: impl FnOnce(&FillPage) -> R) -> Option<R> {
        self.state.borrow().fill.as_ref().map(f)
    }

    pub fn with_text_entry<R>(&self, f: impl FnOnce(&TextEntry) -> R) -> Option<R> {
        self.state.borrow().text.as_ref().map(f)
    }

    pub fn line_width(&self) -> Option<f64> {
        self.state.borrow().line_width
    }

    // ---- fill page ----

    pub fn choose_fill_color_mode(&self) -> EditorResult<()> {
        self.edit_fill(FillPage::choose_color_mode)
    }

    pub fn choose_fill_key_mode(&self) -> EditorResult<()> {
        self.edit_fill(FillPage::choose_key_mode)
    }

    pub fn choose_fill_color(&self, color: Rgba) -> EditorResult<()> {
        self.edit_fill(|page| page.choose_color(color))
    }

    pub fn choose_default_fill_color(&self) -> EditorResult<()> {
        self.edit_fill(FillPage::choose_default_color)
    }

    pub fn choose_fill_key(&self, key: &str) -> EditorResult<()> {
        self.edit_fill(|page| page.choose_key(key))
    }

    // ---- text entry ----

    pub fn type_text(&self, text: &str) -> EditorResult<()> {
        self.edit_text(|entry| {
            entry.type_text(text);
            Ok(())
        })
    }

    pub fn backspace(&self) -> EditorResult<()> {
        self.edit_text(|entry| {
            entry.backspace();
            Ok(())
        })
    }

    pub fn set_text_cursor(&self, char_idx: usize) -> EditorResult<()> {
        self.edit_text(|entry| {
            entry.set_cursor(char_idx);
            Ok(())
        })
    }

    pub fn choose_text_key(&self, key: &str) -> EditorResult<()> {
        self.edit_text(|entry| entry.choose_key(key))
    }

    pub fn insert_text_field(&self) -> EditorResult<()> {
        self.edit_text(TextEntry::insert_field)
    }

    // ---- line ----

    pub fn set_line_width(&self, width: f64) -> EditorResult<()> {
        let object = {
            let s = self.state.borrow();
            if s.line_width.is_none() {
                return Err(EditorError::NoPage { page: "line" });
            }
            target(&s)?
        };
        {
            let _held = self.applying.hold();
            object.set_line_width(width)?;
        }
        self.state.borrow_mut().line_width = Some(width);
        self.emit_changed();
        Ok(())
    }

    fn edit_fill<F>(&self, edit: F) -> EditorResult<()>
    where
        F: FnOnce(&mut FillPage) -> EditorResult<()>,
    {
        let applied: Option<(Rc<LabelObject>, ColorNode)> = {
            let mut s = self.state.borrow_mut();
            let page = s.fill.as_mut().ok_or(EditorError::NoPage { page: "fill" })?;
            let before = page.fill_color();
            edit(page)?;
            let after = page.fill_color();
            if before == after {
                None
            } else {
                Some((target(&s)?, after))
            }
        };

        if let Some((object, fill)) = applied {
            tracing::debug!("Object {}: fill set to {:?}", object.id(), fill);
            {
                let _held = self.applying.hold();
                object.set_fill(fill);
            }
            self.emit_changed();
        }
        Ok(())
    }

    fn edit_text<F>(&self, edit: F) -> EditorResult<()>
    where
        F: FnOnce(&mut TextEntry) -> EditorResult<()>,
    {
        let applied: Option<(Rc<LabelObject>, Vec<TextLine>)> = {
            let mut s = self.state.borrow_mut();
            let entry = s.text.as_mut().ok_or(EditorError::NoPage { page: "text" })?;
            let before = entry.text_string();
            edit(entry)?;
            if entry.text_string() == before {
                None
            } else {
                let lines = entry.text();
                Some((target(&s)?, lines))
            }
        };

        if let Some((object, lines)) = applied {
            tracing::debug!("Object {}: text set", object.id());
            {
                let _held = self.applying.hold();
                object.set_text(lines);
            }
            self.emit_changed();
        }
        Ok(())
    }

    fn emit_changed(&self) {
        self.changed.emit(&());
    }
}

/// The loaded object, or why there is none.
fn target(s: &EditorState) -> EditorResult<Rc<LabelObject>> {
    s.object.upgrade().ok_or(match s.object_id {
        Some(id) => EditorError::ObjectGone { id },
        None => EditorError::NotLoaded,
    })
}

impl PropertyDialog for ObjectEditor {
    fn show_all(&mut self) {
        let mut s = self.state.borrow_mut();
        s.visible = true;
        if let Some(page) = s.fill.as_mut() {
            page.show();
        }
    }

    fn hide(&mut self) {
        let mut s = self.state.borrow_mut();
        s.visible = false;
        if let Some(page) = s.fill.as_mut() {
            page.hide();
        }
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    fn load(&mut self, object: &Rc<LabelObject>) {
        if self.applying.is_held() {
            tracing::trace!("Object {}: skipping reload of own edit", object.id());
            return;
        }
        load_pages(&self.state, self.default_fill_color, object);
    }
}

/// Fill the pages from `object` and follow its label's merge fields.
fn load_pages(
    state: &Rc<RefCell<EditorState>>,
    default_fill_color: Rgba,
    object: &Rc<LabelObject>,
) {
    let label = object.parent();
    let merge_enabled = label.as_ref().is_some_and(|l| l.is_merge_enabled());
    let keys = label.as_ref().map(|l| l.merge_fields()).unwrap_or_default();
    let kind = object.kind();

    let Ok(mut s) = state.try_borrow_mut() else {
        tracing::warn!("Object {}: editor busy, reload skipped", object.id());
        return;
    };

    if s.kind != Some(kind) {
        tracing::debug!("Building editor pages for {}", kind);
        s.fill = kind.has_fill().then(|| FillPage::new(default_fill_color));
        s.text = kind.has_text().then(|| TextEntry::new("Text", keys.clone()));
        s.kind = Some(kind);
    }
    s.object = Rc::downgrade(object);
    s.object_id = Some(object.id());

    if let Some(page) = s.fill.as_mut() {
        page.set_key_names(keys.clone());
        page.set_fill_color(merge_enabled, &object.fill());
    }
    if let Some(entry) = s.text.as_mut() {
        entry.set_key_names(keys);
        entry.set_text(merge_enabled, &object.text());
    }
    s.line_width = kind.has_line().then(|| object.line_width());

    let following = label
        .as_ref()
        .zip(s.label.upgrade())
        .is_some_and(|(new, old)| Rc::ptr_eq(new, &old));
    if !following {
        s.stop_following_merge();
        if let Some(label) = &label {
            let weak = Rc::downgrade(state);
            let handler = label.merge_changed().connect(move |_: &()| {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                let object = state.try_borrow().ok().and_then(|s| s.object.upgrade());
                if let Some(object) = object {
                    tracing::debug!("Object {}: merge fields changed, reloading", object.id());
                    load_pages(&state, default_fill_color, &object);
                }
            });
            s.label = Rc::downgrade(label);
            s.merge_handler = Some(handler);
        }
    }

    tracing::debug!("Loaded object {} into editor", object.id());
}

impl std::fmt::Debug for ObjectEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("ObjectEditor")
            .field("object_id", &s.object_id)
            .field("kind", &s.kind)
            .field("visible", &s.visible)
            .finish()
    }
}
