//! # gLabels Object Editor
//!
//! Headless models of the property editor: the state, sensitivity and
//! change notifications of each page, without any toolkit widgets.
//!
//! ## Components
//!
//! - **FillPage**: fill color from a literal color or a merge field
//! - **TextEntry**: multi-line text with `${KEY}` merge fields
//! - **ObjectEditor**: the property dialog of one label object, combining
//!   the pages its kind needs and writing user edits back to the object
//!
//! Pages emit `changed` only for user edits. Loading a page from an object
//! is silent, so the editor never feeds its own load back into the object.

pub mod error;
pub mod fill_page;
pub mod object_editor;
pub mod text_entry;
pub mod widgets;

pub use error::{EditorError, EditorResult};
pub use fill_page::{FillMode, FillPage};
pub use object_editor::ObjectEditor;
pub use text_entry::TextEntry;
pub use widgets::{ColorCombo, KeyCombo};
