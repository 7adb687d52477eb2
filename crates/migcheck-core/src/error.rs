use thiserror::Error;

/// Core error type shared across migcheck crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A database session could not be established.
    #[error("connection error: {0}")]
    Connection(String),
    /// A catalog introspection query failed.
    #[error("catalog error during {operation} on '{table}': {message}")]
    Catalog {
        operation: String,
        table: String,
        message: String,
    },
    /// Rows could not be sampled from a table.
    #[error("sample error for table '{table}': {message}")]
    Sample { table: String, message: String },
    /// The infrastructure output provider failed.
    #[error("infrastructure lookup failed: {0}")]
    InfraLookup(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

impl Error {
    /// Build a catalog error for `operation` against `table`.
    pub fn catalog(
        operation: impl Into<String>,
        table: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        Error::Catalog {
            operation: operation.into(),
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// Build a sample error for `table`.
    pub fn sample(table: impl Into<String>, message: impl ToString) -> Self {
        Error::Sample {
            table: table.into(),
            message: message.to_string(),
        }
    }
}

/// Convenience alias for results returned by migcheck crates.
pub type Result<T> = std::result::Result<T, Error>;
