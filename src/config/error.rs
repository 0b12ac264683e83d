//! Errors raised while reading or writing the settings file.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `save` was called before `load` chose a location
    #[error("No settings file location chosen, load the configuration first")]
    NotLoaded,

    #[error("Could not determine the home directory for the settings file")]
    HomeDirectoryNotFound,

    #[error("Could not read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Settings in {path} are not valid YAML: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A setting parsed but cannot be used
    #[error("Setting '{key}' {message}")]
    InvalidValue { key: String, message: String },

    #[error("Could not encode settings: {0}")]
    Encode(#[source] serde_yaml::Error),

    #[error("Could not create settings directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
