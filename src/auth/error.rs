use thiserror::Error;

/// Failures reported by the authentication core.
///
/// Expected conditions (unknown token, malformed header) are values of this
/// type, never panics, so callers can map them uniformly to access denied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("identity must not be empty")]
    InvalidIdentity,
    #[error("not found")]
    NotFound,
    #[error("decode error: {0}")]
    Decode(&'static str),
    #[error("already exists")]
    AlreadyExists,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// True for the outcomes that mean "not authenticated" rather than a fault.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::InvalidIdentity | Self::NotFound | Self::Decode(_)
        )
    }
}
