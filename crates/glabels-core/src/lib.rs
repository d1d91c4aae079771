//! # gLabels Core
//!
//! Core types, traits, and utilities for gLabels.
//! Provides the label document model the views observe, the color and
//! merge-field value objects the property editors exchange, unit handling,
//! the synchronous signal mechanism, and the error taxonomy.

pub mod color;
pub mod error;
pub mod geometry;
pub mod label;
pub mod signal;
pub mod units;

pub use color::{ColorNode, Rgba};
pub use error::{Error, LabelError, Result, ViewError};
pub use geometry::{Point, Size};
pub use label::{
    text::{TextLine, TextNode},
    Label, LabelObject, ObjectId, ObjectKind,
};
pub use signal::{Guard, GuardToken, HandlerId, Signal};
pub use units::Units;
