use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OracleError>;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON in {path}: {source}")]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid leak catalog: {0}")]
    InvalidCatalog(String),

    #[error("Theory file not found: {0}")]
    TheoryNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid regex: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Cut-set error: {0}")]
    CutsetError(#[from] leakcut_cutset::CutsetError),
}

impl OracleError {
    pub fn invalid_catalog(msg: impl Into<String>) -> Self {
        Self::InvalidCatalog(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
