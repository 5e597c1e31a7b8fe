use thiserror::Error;

pub type PasslockResult<T> = Result<T, PasslockError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasslockError {
    /// Empty password, plaintext, or blob.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("malformed blob: {len} bytes (minimum {min})")]
    MalformedBlob { len: usize, min: usize },

    /// Tag verification failed: wrong password, tampering, or corruption.
    #[error("authentication failed: wrong password or corrupted data")]
    Authentication,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("secure random source failed: {0}")]
    RandomSource(String),
}

impl PasslockError {
    /// Whether repeating the same call could succeed.
    ///
    /// Only an exhausted or unavailable OS random source is transient; every
    /// other variant is determined entirely by the inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PasslockError::RandomSource(_))
    }
}

impl From<rand::Error> for PasslockError {
    fn from(e: rand::Error) -> Self {
        PasslockError::RandomSource(e.to_string())
    }
}
