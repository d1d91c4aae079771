//! Preference errors
//!
//! File access and parsing fail with [`SettingsError`]; a value that parses
//! but is unusable is a [`ConfigError`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read preferences from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The platform has no per-user configuration directory.
    #[error("no configuration directory on this platform")]
    NoConfigDir,

    #[error("malformed JSON preferences: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed TOML preferences: {0}")]
    TomlRead(#[from] toml::de::Error),

    #[error("cannot encode preferences as TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("invalid preferences: {0}")]
    Invalid(#[from] ConfigError),
}

/// A preference value or file name that cannot be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Only `.json` and `.toml` files are understood.
    #[error("unknown preferences file extension '{0}'")]
    UnknownExtension(String),

    #[error("{key} = {value} is out of range")]
    OutOfRange { key: String, value: String },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
