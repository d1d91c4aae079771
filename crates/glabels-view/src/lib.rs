//! # gLabels View
//!
//! Presents label objects in a scene graph. Each bound object gets a
//! [`Binding`]: a group holding its rendered content, a selection
//! highlight, a context menu and an optional property dialog. The
//! [`View`] registry owns the bindings, the selection and the background
//! layers, and keeps the scene in step with the label through the
//! objects' signals.
//!
//! Rendering is left to whatever implements [`Scene`]; [`MemoryScene`] is
//! a headless implementation.

pub mod binding;
pub mod create;
pub mod dialog;
pub mod event;
pub mod highlight;
pub mod menu;
pub mod presentation;
pub mod scene;
pub mod view;

pub use binding::{Binding, BindingKey};
pub use create::CreateTool;
pub use dialog::PropertyDialog;
pub use event::{Button, EventResponse, ItemEvent};
pub use highlight::{Handle, HandleRole, HighlightGeometry, HighlightStyle, ROTATE_HANDLE_OFFSET};
pub use menu::{ContextMenu, MenuAction, MenuEntry};
pub use presentation::Presentation;
pub use scene::{ItemId, ItemRole, MemoryScene, Scene, SceneError};
pub use view::View;
