//! Context menu for an object binding.
//!
//! The menu is data only: a fixed list of entries naming the action each
//! one triggers. Building it has no side effects; actions run when the
//! caller hands an entry back to [`View::activate`](crate::View::activate).

use crate::binding::BindingKey;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Show the property dialog.
    EditProperties,
    /// Tear the binding down.
    Delete,
    /// Raise the object above every other object.
    BringToFront,
    /// Lower the object beneath every other object, above the background.
    SendToBack,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::EditProperties => "Edit properties...",
            Self::Delete => "Delete",
            Self::BringToFront => "Bring to front",
            Self::SendToBack => "Send to back",
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuAction),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    binding: BindingKey,
    entries: Vec<MenuEntry>,
}

impl ContextMenu {
    pub fn new(binding: BindingKey) -> Self {
        Self {
            binding,
            entries: vec![
                MenuEntry::Item(MenuAction::EditProperties),
                MenuEntry::Separator,
                MenuEntry::Item(MenuAction::Delete),
                MenuEntry::Separator,
                MenuEntry::Item(MenuAction::BringToFront),
                MenuEntry::Item(MenuAction::SendToBack),
            ],
        }
    }

    /// The binding every action of this menu targets.
    pub fn binding(&self) -> BindingKey {
        self.binding
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Action of the entry at `index`; separators have none.
    pub fn action_at(&self, index: usize) -> Option<MenuAction> {
        match self.entries.get(index)? {
            MenuEntry::Item(action) => Some(*action),
            MenuEntry::Separator => None,
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = MenuAction> + '_ {
        self.entries.iter().filter_map(|e| match e {
            MenuEntry::Item(action) => Some(*action),
            MenuEntry::Separator => None,
        })
    }
}
