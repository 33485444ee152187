//! Error types for markdown-online.
//!
//! Almost nothing in the sync core is allowed to fail loudly: storage problems
//! degrade to "not persisted this cycle" and the converter never raises. The
//! errors here cover setup (config parsing, missing page elements) and the
//! storage backends, whose failures callers log and drop.

/// Main error type for markdown-online operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Config JSON could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// Storage backend error.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// A page element the app mounts onto was not found.
    #[error("missing element #{0}")]
    MissingElement(String),

    /// Host platform call failed (DOM API threw, etc.)
    #[error("platform error: {0}")]
    Platform(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Platform(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Platform(s)
    }
}

/// Errors from a `KeyValueStore` backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Storage is disabled or not present (private browsing, sandboxed frame).
    #[error("storage unavailable")]
    Unavailable,

    /// The write was rejected, usually because the quota is exhausted.
    #[error("storage write failed: {0}")]
    Write(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
