//! Error types for a single key candidate attempt.

use thiserror::Error;

/// Reasons a key candidate can fail to recover a line.
///
/// These never leave the cascade as a hard failure, a line that no candidate
/// recovers is passed through unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// Line is not valid standard base64.
    #[error("invalid base64 data: {0}")]
    Base64(String),

    /// Ciphertext is not a whole number of blocks or the pkcs7 padding is invalid.
    #[error("invalid block size or pkcs7 padding")]
    Padding,

    /// Decrypted bytes are not valid utf-8.
    #[error("decrypted data is not valid utf-8")]
    Utf8,
}

/// Result type for key candidate attempts.
pub type Result<T> = std::result::Result<T, AttemptError>;
