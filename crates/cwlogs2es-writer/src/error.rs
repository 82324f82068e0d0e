use thiserror::Error;

/// Failures talking to the Elasticsearch endpoint.
///
/// All of these are transient from the pipeline's point of view and go
/// through the bounded retry in [`crate::retry`].
#[derive(Debug, Error)]
pub enum EsError {
    /// The request never produced an HTTP response.
    #[error("ES connectivity error {0}")]
    Transport(#[source] anyhow::Error),

    /// The bulk endpoint rejected the write outright.
    #[error("elasticsearch update error: {body}")]
    BulkRejected { status: u16, body: String },

    /// The probe saw a response, just not the one it wanted.
    #[error("unexpected status code {0} returned from ES")]
    UnexpectedStatus(u16),
}
