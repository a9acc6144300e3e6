use std::fmt;

/// Result type for tablekit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for direct programmatic calls into the engine.
///
/// Pipeline configuration problems (bad sort keys, unsupported operators)
/// never surface here; they degrade to ignored rules reported through the
/// diagnostics types. These errors cover only misuse of the editing and
/// lookup APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No column with the given id exists in the configuration
    UnknownColumn(String),
    /// The column exists but is not flagged editable
    NotEditable(String),
    /// An edit operation was invoked while no cell is in editing state
    NoActiveEdit,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownColumn(id) => write!(f, "Unknown column: {}", id),
            Error::NotEditable(id) => write!(f, "Column is not editable: {}", id),
            Error::NoActiveEdit => write!(f, "No cell is currently being edited"),
        }
    }
}

impl std::error::Error for Error {}
