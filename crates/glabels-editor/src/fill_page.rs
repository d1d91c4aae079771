//! Fill color page
//!
//! The page offers two sources for an object's fill: a literal color picked
//! from a color combo, or a merge field picked from a key combo. A pair of
//! radio buttons selects the source; only the combo belonging to the active
//! source is sensitive. The key radio is only sensitive while merge is
//! enabled on the label.

use crate::error::{EditorError, EditorResult};
use crate::widgets::{ColorCombo, KeyCombo};
use glabels_core::{ColorNode, Guard, Rgba, Signal};
use std::rc::Rc;

/// Which radio button of the page is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Literal color from the color combo
    #[default]
    Color,
    /// Merge field from the key combo
    Key,
}

pub struct FillPage {
    mode: FillMode,
    color_combo: ColorCombo,
    key_combo: KeyCombo,
    key_radio_sensitive: bool,
    color_combo_sensitive: bool,
    key_combo_sensitive: bool,
    visible: bool,
    stop_signals: Rc<Guard>,
    changed: Signal<()>,
}

impl FillPage {
    pub fn new(default_color: Rgba) -> Self {
        let mut page = Self {
            mode: FillMode::Color,
            color_combo: ColorCombo::new(default_color),
            key_combo: KeyCombo::new(),
            key_radio_sensitive: false,
            color_combo_sensitive: true,
            key_combo_sensitive: false,
            visible: false,
            stop_signals: Rc::new(Guard::new()),
            changed: Signal::new("fill-page-changed"),
        };
        page.prepare(default_color);
        page
    }

    /// Reset the page for a fresh object: color mode with `default_color`
    /// picked, key combo disabled, page shown.
    ///
    /// The key radio stays insensitive until [`set_fill_color`] says merge
    /// is enabled.
    ///
    /// [`set_fill_color`]: FillPage::set_fill_color
    pub fn prepare(&mut self, default_color: Rgba) {
        tracing::debug!("Preparing fill page");
        self.color_combo.set_default_color(default_color);
        self.color_combo.set_color(default_color);
        self.mode = FillMode::Color;
        self.apply_mode_sensitivity();
        self.visible = true;
    }

    pub fn set_key_names(&mut self, keys: Vec<String>) {
        self.key_combo.set_strings(keys);
    }

    /// Load a fill value into the page without emitting `changed`.
    ///
    /// A field reference is stored even when merge is disabled; the key
    /// radio is then active but insensitive, so the user can leave key mode
    /// and not come back.
    pub fn set_fill_color(&mut self, merge_enabled: bool, node: &ColorNode) {
        let guard = Rc::clone(&self.stop_signals);
        let _held = guard.hold();

        self.key_radio_sensitive = merge_enabled;

        match node.color {
            Some(color) => self.color_combo.set_color(color),
            None => self.color_combo.set_to_default(),
        }

        if node.field_flag {
            self.mode = FillMode::Key;
            if let Some(key) = node.key.as_deref() {
                self.key_combo.set_active_text(key);
            }
        } else {
            self.mode = FillMode::Color;
        }
        self.set_mode(self.mode);
    }

    /// The fill value the page currently describes.
    ///
    /// Key mode yields a field reference without a color. Color mode yields
    /// a literal, with no color when the default entry is picked.
    pub fn fill_color(&self) -> ColorNode {
        match self.mode {
            FillMode::Key => ColorNode {
                field_flag: true,
                key: self.key_combo.active_text().map(str::to_owned),
                color: None,
            },
            FillMode::Color => {
                let (color, is_default) = self.color_combo.color();
                ColorNode {
                    field_flag: false,
                    key: None,
                    color: (!is_default).then_some(color),
                }
            }
        }
    }

    pub fn choose_color_mode(&mut self) -> EditorResult<()> {
        self.toggle_radio(FillMode::Color);
        Ok(())
    }

    pub fn choose_key_mode(&mut self) -> EditorResult<()> {
        if !self.key_radio_sensitive {
            return Err(insensitive("key radio"));
        }
        self.toggle_radio(FillMode::Key);
        Ok(())
    }

    pub fn choose_color(&mut self, color: Rgba) -> EditorResult<()> {
        if !self.color_combo_sensitive {
            return Err(insensitive("color combo"));
        }
        if self.color_combo.color() != (color, false) {
            self.color_combo.set_color(color);
            self.emit_changed();
        }
        Ok(())
    }

    /// Pick the combo's default entry.
    pub fn choose_default_color(&mut self) -> EditorResult<()> {
        if !self.color_combo_sensitive {
            return Err(insensitive("color combo"));
        }
        if !self.color_combo.color().1 {
            self.color_combo.set_to_default();
            self.emit_changed();
        }
        Ok(())
    }

    pub fn choose_key(&mut self, key: &str) -> EditorResult<()> {
        if !self.key_combo_sensitive {
            return Err(insensitive("key combo"));
        }
        if self.key_combo.active_text() == Some(key) {
            return Ok(());
        }
        if !self.key_combo.select(key) {
            return Err(EditorError::UnknownKey {
                key: key.to_string(),
            });
        }
        self.emit_changed();
        Ok(())
    }

    pub fn mode(&self) -> FillMode {
        self.mode
    }

    pub fn color_combo(&self) -> &ColorCombo {
        &self.color_combo
    }

    pub fn key_combo(&self) -> &KeyCombo {
        &self.key_combo
    }

    pub fn is_key_radio_sensitive(&self) -> bool {
        self.key_radio_sensitive
    }

    pub fn is_color_combo_sensitive(&self) -> bool {
        self.color_combo_sensitive
    }

    pub fn is_key_combo_sensitive(&self) -> bool {
        self.key_combo_sensitive
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Emitted when the user edits the page, never while it is loaded.
    pub fn changed(&self) -> &Signal<()> {
        &self.changed
    }

    fn toggle_radio(&mut self, mode: FillMode) {
        if self.mode == mode {
            return;
        }
        self.set_mode(mode);
        self.emit_changed();
    }

    fn set_mode(&mut self, mode: FillMode) {
        self.mode = mode;
        self.apply_mode_sensitivity();
    }

    fn apply_mode_sensitivity(&mut self) {
        let key_mode = self.mode == FillMode::Key;
        self.color_combo_sensitive = !key_mode;
        self.key_combo_sensitive = key_mode;
    }

    fn emit_changed(&self) {
        if self.stop_signals.is_held() {
            return;
        }
        tracing::debug!(fill = ?self.fill_color(), "Fill page changed");
        self.changed.emit(&());
    }
}

impl std::fmt::Debug for FillPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FillPage")
            .field("mode", &self.mode)
            .field("color_combo", &self.color_combo)
            .field("key_combo", &self.key_combo)
            .field("key_radio_sensitive", &self.key_radio_sensitive)
            .field("visible", &self.visible)
            .finish()
    }
}

fn insensitive(control: &'static str) -> EditorError {
    tracing::warn!("Refused edit: {} is not sensitive", control);
    EditorError::Insensitive { control }
}
