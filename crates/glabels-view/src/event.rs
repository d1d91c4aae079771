//! Pointer input routed from scene items to their bindings.

use crate::menu::ContextMenu;
use glabels_core::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
}

/// An input event delivered to a scene item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemEvent {
    /// `add_modifier` extends the selection instead of replacing it.
    ButtonPress {
        button: Button,
        point: Point,
        add_modifier: bool,
    },
    DoubleClick {
        point: Point,
    },
    Motion {
        point: Point,
    },
    ButtonRelease {
        button: Button,
        point: Point,
    },
}

/// What the view did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResponse {
    Handled,
    /// The event did not concern any binding, or had no effect.
    Ignored,
    /// The caller should pop this menu up at the pointer.
    PopupMenu(ContextMenu),
}

impl EventResponse {
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}
