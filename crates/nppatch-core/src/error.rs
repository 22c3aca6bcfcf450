use thiserror::Error;

/// Top-level error type for NPPatch.
#[derive(Debug, Error)]
pub enum NppatchError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Label catalog error.
    #[error("labels error: {0}")]
    Labels(String),

    /// Permission set generation error.
    #[error("permission set error: {0}")]
    PermissionSet(String),

    /// XML read/write error.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
