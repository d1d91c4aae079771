//! Multi-line text entry with merge field insertion
//!
//! Text is edited as plain characters where `${KEY}` marks a merge field.
//! A key combo and an "insert" button put such a field at the cursor; both
//! are only sensitive while merge is enabled.

use crate::error::{EditorError, EditorResult};
use crate::widgets::KeyCombo;
use glabels_core::label::text::{lines_from_text, lines_to_text};
use glabels_core::{Guard, Signal, TextLine, TextNode};
use ropey::Rope;
use std::rc::Rc;

pub struct TextEntry {
    label: String,
    buffer: Rope,
    /// Char index of the insertion point.
    cursor: usize,
    key_combo: KeyCombo,
    key_combo_sensitive: bool,
    insert_button_sensitive: bool,
    stop_signals: Rc<Guard>,
    changed: Signal<()>,
}

impl TextEntry {
    pub fn new(label: impl Into<String>, keys: Vec<String>) -> Self {
        let mut key_combo = KeyCombo::new();
        key_combo.set_strings(keys);
        if let Some(first) = key_combo.keys().first().cloned() {
            key_combo.select(&first);
        }
        Self {
            label: label.into(),
            buffer: Rope::new(),
            cursor: 0,
            key_combo,
            key_combo_sensitive: false,
            insert_button_sensitive: false,
            stop_signals: Rc::new(Guard::new()),
            changed: Signal::new("text-entry-changed"),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_key_names(&mut self, keys: Vec<String>) {
        self.key_combo.set_strings(keys);
        if self.key_combo.active_text().is_none() {
            if let Some(first) = self.key_combo.keys().first().cloned() {
                self.key_combo.select(&first);
            }
        }
    }

    /// Load text without emitting `changed`. The cursor goes to the end.
    pub fn set_text(&mut self, merge_enabled: bool, lines: &[TextLine]) {
        let guard = Rc::clone(&self.stop_signals);
        let _held = guard.hold();

        self.key_combo_sensitive = merge_enabled;
        self.insert_button_sensitive = merge_enabled;

        self.buffer = Rope::from_str(&lines_to_text(lines));
        self.cursor = self.buffer.len_chars();
    }

    pub fn text(&self) -> Vec<TextLine> {
        lines_from_text(&self.buffer.to_string())
    }

    pub fn text_string(&self) -> String {
        self.buffer.to_string()
    }

    /// Insert typed characters at the cursor and move past them.
    pub fn type_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.buffer.insert(self.cursor, text);
        self.cursor += text.chars().count();
        self.emit_changed();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.buffer.remove(self.cursor - 1..self.cursor);
        self.cursor -= 1;
        self.emit_changed();
    }

    /// Move the cursor, clamped to the end of the text.
    pub fn set_cursor(&mut self, char_idx: usize) {
        self.cursor = char_idx.min(self.buffer.len_chars());
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor as (line, column), both zero based.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let line = self.buffer.char_to_line(self.cursor);
        (line, self.cursor - self.buffer.line_to_char(line))
    }

    pub fn choose_key(&mut self, key: &str) -> EditorResult<()> {
        if !self.key_combo_sensitive {
            tracing::warn!("Refused edit: key combo is not sensitive");
            return Err(EditorError::Insensitive {
                control: "key combo",
            });
        }
        if !self.key_combo.select(key) {
            return Err(EditorError::UnknownKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Insert the chosen key as `${KEY}` at the cursor.
    pub fn insert_field(&mut self) -> EditorResult<()> {
        if !self.insert_button_sensitive {
            tracing::warn!("Refused edit: insert button is not sensitive");
            return Err(EditorError::Insensitive {
                control: "insert button",
            });
        }
        let key = self.key_combo.active_text().ok_or(EditorError::NoKey)?;
        let field = TextNode::field(key).to_text();
        tracing::debug!("Inserting {} at {}", field, self.cursor);
        self.type_text(&field);
        Ok(())
    }

    pub fn key_combo(&self) -> &KeyCombo {
        &self.key_combo
    }

    pub fn is_key_combo_sensitive(&self) -> bool {
        self.key_combo_sensitive
    }

    pub fn is_insert_button_sensitive(&self) -> bool {
        self.insert_button_sensitive
    }

    /// Emitted when the user edits the text.
    pub fn changed(&self) -> &Signal<()> {
        &self.changed
    }

    fn emit_changed(&self) {
        if !self.stop_signals.is_held() {
            self.changed.emit(&());
        }
    }
}

impl std::fmt::Debug for TextEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEntry")
            .field("label", &self.label)
            .field("text", &self.buffer.to_string())
            .field("cursor", &self.cursor)
            .field("key_combo", &self.key_combo)
            .finish()
    }
}
