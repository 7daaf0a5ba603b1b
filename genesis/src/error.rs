use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenesisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid JSON, lacks a `records` array, or holds a record
    /// that claims a known kind but cannot be read as one.
    #[error("malformed genesis: {0}")]
    MalformedInput(String),

    #[error("invalid balance '{0}'")]
    InvalidBalance(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for GenesisError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenesisError>;
