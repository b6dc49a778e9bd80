use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    // Remote
    #[error("entry not found or not visible: {0}")]
    NotFound(String),

    #[error("remote service failure: {0}")]
    Transient(String),

    // Credentials
    #[error("authentication failed: {0}")]
    Auth(String),

    // Config
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScanError {
    /// The identifier this error concerns, if it is a lookup failure.
    /// Callers use this to present "Missing: <id>" without matching on variants.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::NotFound(id) => Some(id.as_str()),
            _ => None,
        }
    }

    /// Whether a later attempt could plausibly succeed.
    ///
    /// Nothing in this crate retries; the flag is for callers that wrap a
    /// scan in their own retry policy.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
