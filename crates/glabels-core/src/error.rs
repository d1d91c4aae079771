//! Error types for the label model and its views.
//!
//! [`LabelError`] covers the document, [`ViewError`] the bindings and
//! selection kept over a scene. [`Error`] wraps both for callers that
//! drive the two together.

use thiserror::Error;

/// Label document error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LabelError {
    /// No object with this id exists in the label
    #[error("Object {id} not found in label")]
    ObjectNotFound {
        /// The id that was looked up.
        id: u64,
    },

    /// Geometry value rejected by the object
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry {
        /// Why the value was rejected.
        reason: String,
    },

    /// Color text could not be parsed
    #[error("Invalid color '{text}'")]
    InvalidColor {
        /// The offending text.
        text: String,
    },
}

/// View error type
///
/// Represents failures of binding, selection and stacking operations.
/// None of these are fatal: the view stays consistent after any of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    /// The binding key does not refer to a live binding
    #[error("Binding {key} is not live in this view")]
    UnknownBinding {
        /// Debug rendering of the key.
        key: String,
    },

    /// The object does not belong to the label this view presents
    #[error("Object {id} does not belong to the label shown by this view")]
    ForeignObject {
        /// The id of the rejected object.
        id: u64,
    },

    /// The domain object has been dropped while still bound
    #[error("Object {id} is no longer alive")]
    ObjectGone {
        /// The id of the vanished object.
        id: u64,
    },

    /// The binding has no property dialog attached
    #[error("No property dialog attached to binding {key}")]
    NoDialog {
        /// Debug rendering of the key.
        key: String,
    },

    /// The scene collaborator rejected an item operation
    #[error("Scene error: {reason}")]
    Scene {
        /// The scene's description of the failure.
        reason: String,
    },

    /// The view state is already being mutated further up the call stack
    #[error("View is busy: {operation} re-entered while the view was being updated")]
    Busy {
        /// The operation that was refused.
        operation: String,
    },
}

/// Any failure of the label model, its views or the tools that drive them.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    View(#[from] ViewError),

    /// An interactive tool was used out of sequence.
    #[error("Tool error: {0}")]
    Tool(String),
}

impl Error {
    pub fn tool(msg: impl Into<String>) -> Self {
        Error::Tool(msg.into())
    }

    pub fn is_view_error(&self) -> bool {
        matches!(self, Error::View(_))
    }

    pub fn is_label_error(&self) -> bool {
        matches!(self, Error::Label(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
