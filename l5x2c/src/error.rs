//! Error types for the translator.

use thiserror::Error;

/// Result type alias for translation operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read the input file
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the output file
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The input file is not a usable L5X document
    #[error("Failed to parse L5X file: {0}")]
    L5x(#[from] l5x::Error),

    /// The data-type dependency graph has a cycle
    #[error("data type dependency cycle involving: {}", names.join(", "))]
    TypeCycle { names: Vec<String> },
}
