//! LocalGrid error types.
//!
//! None of these errors reach callers of [`LocalGrid::count_tokens`] or
//! [`LocalGrid::get_model_token_limit`]. They are produced by the internal
//! "attempt" steps (read a provider file, load a tokenizer, encode text) and
//! turned into a fallback choice where those steps are called.
//!
//! [`LocalGrid::count_tokens`]: crate::LocalGrid::count_tokens
//! [`LocalGrid::get_model_token_limit`]: crate::LocalGrid::get_model_token_limit

use std::path::PathBuf;

use thiserror::Error;

/// LocalGrid errors.
#[derive(Error, Debug)]
pub enum LocalGridError {
    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Metadata source could not be scanned or a provider file was malformed.
    #[error("Data source error: {0}")]
    DataSource(String),

    /// Tokenizer engine failed to initialize or encode.
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// No bundled tokenizer directory at the expected path.
    #[error("Tokenizer not found at {}", .0.display())]
    TokenizerNotFound(PathBuf),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for LocalGrid operations
pub type Result<T> = std::result::Result<T, LocalGridError>;

impl From<toml::de::Error> for LocalGridError {
    fn from(err: toml::de::Error) -> Self {
        LocalGridError::Config(err.to_string())
    }
}

impl From<tokenizers::Error> for LocalGridError {
    fn from(err: tokenizers::Error) -> Self {
        LocalGridError::Tokenizer(err.to_string())
    }
}
