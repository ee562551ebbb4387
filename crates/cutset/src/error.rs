use thiserror::Error;

/// Result type for cut-set operations
pub type Result<T> = std::result::Result<T, CutsetError>;

/// Errors raised while building the canonical order or leak sets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CutsetError {
    /// The catalog lists the same label twice
    #[error("Duplicate label in catalog: {0}")]
    DuplicateLabel(String),

    /// A leak set refers to a label the catalog does not define
    #[error("Unknown label: {0}")]
    UnknownLabel(String),
}
