//! # gLabels
//!
//! Label and business card layout. This crate ties the workspace together:
//!
//! 1. **glabels-core** - label document, objects, colors, merge text, signals
//! 2. **glabels-view** - bindings between label objects and scene items,
//!    selection, stacking, context menus and input routing
//! 3. **glabels-editor** - headless property editor pages
//! 4. **glabels-settings** - user preferences
//!
//! ## Architecture
//!
//! ```text
//! Label ──signals──> View (registry) ──> Binding ──> Scene items
//!   ^                                      │
//!   └────────── ObjectEditor <── dialog ───┘
//! ```
//!
//! Everything runs on one thread. Label objects announce moves, restacking
//! and property changes through signals; each binding follows its object
//! synchronously.

pub use glabels_core::{
    ColorNode, Error, Label, LabelError, LabelObject, ObjectId, ObjectKind, Point, Result, Rgba,
    Signal, Size, TextLine, TextNode, Units, ViewError,
};

pub use glabels_view::{
    Binding, BindingKey, Button, ContextMenu, CreateTool, EventResponse, HighlightStyle, ItemEvent,
    ItemId, MemoryScene, MenuAction, MenuEntry, PropertyDialog, Scene, SceneError, View,
};

pub use glabels_editor::{EditorError, FillMode, FillPage, ObjectEditor, TextEntry};

pub use glabels_settings::{ConfigError, Preferences, SettingsError, ViewSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
