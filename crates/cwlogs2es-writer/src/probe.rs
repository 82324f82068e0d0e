//! Write-free connectivity check against the Elasticsearch endpoint

use tracing::debug;

use crate::error::EsError;
use crate::http::HttpClient;

/// Issues a signed GET against the domain root.
///
/// Exercises the same signing and transport path as the bulk writer
/// without touching any index, so a deploy can verify reachability and
/// access policy before real traffic flows.
pub struct ConnectivityProbe<T: HttpClient> {
    http: T,
    endpoint: String,
}

impl<T: HttpClient> ConnectivityProbe<T> {
    pub fn new(http: T, es_host: &str) -> Self {
        Self {
            http,
            endpoint: es_host.to_string(),
        }
    }

    /// Succeeds only on an exact HTTP 200.
    pub async fn ping(&self) -> Result<(), EsError> {
        let response = self
            .http
            .request(
                "GET",
                &self.endpoint,
                vec![("Content-Type".to_string(), "application/json".to_string())],
                None,
            )
            .await
            .map_err(EsError::Transport)?;

        if response.status != 200 {
            return Err(EsError::UnexpectedStatus(response.status));
        }
        debug!("elasticsearch reachable");
        Ok(())
    }
}
