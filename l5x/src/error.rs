//! Error types for the L5X reader.

use thiserror::Error;

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// XML deserialization failed
    #[error("XML deserialization failed: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// The document has no Controller element
    #[error("document has no Controller element")]
    MissingController,
}
