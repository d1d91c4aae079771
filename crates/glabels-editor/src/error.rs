//! Error types for the editor crate.

use glabels_core::{LabelError, ObjectId};
use thiserror::Error;

/// Reasons a user edit is refused or cannot be applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// The control is disabled.
    #[error("{control} is not sensitive")]
    Insensitive { control: &'static str },

    /// The key is not one of the merge fields offered.
    #[error("unknown merge field '{key}'")]
    UnknownKey { key: String },

    /// No key is chosen in the key combo.
    #[error("no merge field chosen")]
    NoKey,

    /// The page edits a property the object kind does not have.
    #[error("no {page} page for this object")]
    NoPage { page: &'static str },

    /// The edited object no longer exists.
    #[error("object {id} is gone")]
    ObjectGone { id: ObjectId },

    /// Nothing has been loaded into the editor yet.
    #[error("no object loaded")]
    NotLoaded,

    #[error(transparent)]
    Label(#[from] LabelError),
}

pub type EditorResult<T> = Result<T, EditorError>;
