use thiserror::Error;

/// Failure kinds crossing the gateway boundary. Every variant is converted to
/// a `{error}` body with status 500 before it reaches the caller; the Display
/// text is the surfaced message.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No usable API key after filtering. Fatal before any network call.
    #[error("No API keys configured.")]
    NoCredentials,

    /// A single credential's attempt failed (auth, rate limit, transport,
    /// timeout). Recovered by the fail-over loop unless it was the last key.
    #[error("upstream attempt failed: {0}")]
    Upstream(String),

    /// Every credential failed; carries the final attempt's message verbatim.
    #[error("{0}")]
    Exhausted(String),

    /// Request body could not be parsed as JSON.
    #[error("malformed request body: {0}")]
    MalformedRequest(String),

    /// Fallback for anything else.
    #[error("Unknown error")]
    Unknown,
}

pub type Result<T> = std::result::Result<T, GatewayError>;
