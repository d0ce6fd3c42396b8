/*!
 * Error types for the lexis dictionary core.
 *
 * Schema errors are startup-fatal, repository errors are per-request and
 * never retried. Rendering and playback failures are recovered locally and
 * only appear here so that collaborators can report them.
 */

use thiserror::Error;

/// Errors raised while resolving which table and columns back the dictionary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The store has no user-defined table
    #[error("No user table found in the dictionary store")]
    NoTables,

    /// The first table does not have enough columns for term, definition and audio
    #[error("Table '{table}' has {found} column(s), at least 3 are required")]
    TooFewColumns {
        /// Table that was inspected
        table: String,
        /// Number of columns it declares
        found: usize,
    },

    /// An explicit override named some but not all of the required values
    #[error("Incomplete schema override, missing: {}", missing.join(", "))]
    IncompleteOverride {
        /// Names of the values that were not supplied
        missing: Vec<&'static str>,
    },

    /// Two roles were bound to the same column
    #[error("Column '{0}' is bound to more than one role")]
    DuplicateColumn(String),

    /// Reading the store metadata failed
    #[error("Failed to read schema metadata: {0}")]
    Metadata(String),
}

impl From<RepositoryError> for SchemaError {
    fn from(error: RepositoryError) -> Self {
        Self::Metadata(error.to_string())
    }
}

/// Errors raised while querying the dictionary store
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The underlying query failed
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// The connection lock was poisoned
    #[error("Failed to acquire database lock: {0}")]
    Lock(String),

    /// The blocking task running the query did not complete
    #[error("Database task failed: {0}")]
    Task(String),

    /// The store could not be opened
    #[error("Failed to open dictionary store: {0}")]
    Open(String),
}

/// A math typesetter could not render one formula
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to typeset formula '{formula}': {reason}")]
pub struct TypesetError {
    /// Formula that failed
    pub formula: String,
    /// Typesetter message
    pub reason: String,
}

/// One audio entry could not be played
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to play '{reference}': {reason}")]
pub struct PlaybackFailure {
    /// Audio reference that failed
    pub reference: String,
    /// Decoder or transport message
    pub reason: String,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error resolving the schema binding
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Error querying the store
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The requested term does not exist
    #[error("Term not found: {0}")]
    NotFound(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
