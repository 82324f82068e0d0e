use thiserror::Error;

/// Failures while expanding an inbound subscription payload.
///
/// Decode is all-or-nothing: each of these aborts the invocation
/// without retry.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("error decoding input: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("error unzipping input: {0}")]
    Gunzip(#[from] std::io::Error),

    #[error("error parsing log batch: {0}")]
    Format(#[from] serde_json::Error),
}
