//! Combo box models shared by the editor pages.

use glabels_core::Rgba;

/// Color picker with a "default" entry.
///
/// The combo either shows an explicit color or its default entry, which
/// stands for "use the default color".
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCombo {
    default_color: Rgba,
    color: Option<Rgba>,
}

impl ColorCombo {
    pub fn new(default_color: Rgba) -> Self {
        Self {
            default_color,
            color: None,
        }
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = Some(color);
    }

    pub fn set_to_default(&mut self) {
        self.color = None;
    }

    /// Current color and whether the default entry is selected.
    pub fn color(&self) -> (Rgba, bool) {
        match self.color {
            Some(color) => (color, false),
            None => (self.default_color, true),
        }
    }

    pub fn default_color(&self) -> Rgba {
        self.default_color
    }

    pub fn set_default_color(&mut self, color: Rgba) {
        self.default_color = color;
    }
}

/// Drop-down list of merge field keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyCombo {
    keys: Vec<String>,
    active: Option<usize>,
}

impl KeyCombo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list. The active key stays selected if it is still
    /// offered.
    pub fn set_strings(&mut self, keys: Vec<String>) {
        let active = self.active_text().map(str::to_owned);
        self.keys = keys;
        self.active = active.and_then(|key| self.position(&key));
    }

    /// Select `key`, appending it to the list when it is not offered.
    pub fn set_active_text(&mut self, key: &str) {
        let index = match self.position(key) {
            Some(index) => index,
            None => {
                self.keys.push(key.to_string());
                self.keys.len() - 1
            }
        };
        self.active = Some(index);
    }

    /// Select an offered key. Returns false for keys not in the list.
    pub fn select(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn active_text(&self) -> Option<&str> {
        self.active
            .and_then(|index| self.keys.get(index))
            .map(String::as_str)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }
}
