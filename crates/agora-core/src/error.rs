use thiserror::Error;

/// Convenience `Result` alias using [`AgoraError`].
pub type AgoraResult<T> = Result<T, AgoraError>;

/// Top-level error type for Agora.
///
/// `Storage` and `Io` together form the I/O failure family: the durable
/// snapshot could not be read or written, or is not a readable document.
/// `MalformedRecord` means the document was readable but one of its entries
/// is not a well-formed record.
#[derive(Error, Debug)]
pub enum AgoraError {
    /// Durable storage could not be read or written, or is corrupt.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted entry failed to deserialize into a record.
    #[error("Malformed record '{id}': {reason}")]
    MalformedRecord {
        /// Key of the offending entry in the snapshot.
        id: String,
        /// Why the entry was rejected.
        reason: String,
    },

    /// Configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgoraError {
    /// Whether this error belongs to the I/O failure family.
    pub fn is_io_failure(&self) -> bool {
        matches!(self, AgoraError::Storage(_) | AgoraError::Io(_))
    }
}
