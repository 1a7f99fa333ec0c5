//! Error types for AMR data access.

use thiserror::Error;

/// Errors that can occur while loading or accessing AMR data.
#[derive(Error, Debug)]
pub enum AmrError {
    /// Failed to resolve or open a data source.
    #[error("failed to load dataset: {0}")]
    Load(String),

    /// The named field is absent from one or more snapshots.
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// The requested refinement level exceeds what every snapshot provides.
    #[error("level {requested} not available: maximum common level is {max_level}")]
    LevelNotAvailable { requested: usize, max_level: usize },

    /// Index arity mismatch or out-of-bounds index.
    #[error("index error: {0}")]
    Index(String),

    /// Unsupported derivative axis for the dataset's dimensionality.
    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    /// A reduction or index operation was attempted over a multi-level
    /// selection, where cells have unequal volumes.
    #[error("operation requires a single level selection, {selected} levels selected")]
    AmbiguousLevelSelection { selected: usize },

    /// A derived-field name is already registered with a different definition.
    #[error("derived field conflict: '{0}' is already registered with a different definition")]
    DerivedFieldConflict(String),

    /// The operation is not supported by the delegated reader.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The delegated reader failed.
    #[error("reader error: {0}")]
    Read(String),
}

impl AmrError {
    /// Create a Load error.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Create a FieldNotFound error.
    pub fn field_not_found(name: impl Into<String>) -> Self {
        Self::FieldNotFound(name.into())
    }

    /// Create an Index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::Index(msg.into())
    }

    /// Create an InvalidDirection error.
    pub fn invalid_direction(msg: impl Into<String>) -> Self {
        Self::InvalidDirection(msg.into())
    }

    /// Create an Unsupported error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a Read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }
}

impl From<std::io::Error> for AmrError {
    fn from(err: std::io::Error) -> Self {
        Self::Read(err.to_string())
    }
}

/// Result type for AMR data access operations.
pub type Result<T> = std::result::Result<T, AmrError>;
