use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("config file '{path}' must contain a JSON object at the top level, found {found}")]
    NotAnObject { path: PathBuf, found: &'static str },

    #[error("missing config key: {0}")]
    MissingKey(String),

    #[error("config key '{key}' is {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("config key '{0}' is both a value and a namespace")]
    KeyConflict(String),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl ConfigError {
    /// True when the file could not be opened or read.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::ReadError { .. })
    }

    /// True when the file was read but is not a JSON object.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::ParseError { .. } | Self::NotAnObject { .. })
    }
}
