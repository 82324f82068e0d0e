//! Bulk writes against the Elasticsearch `_bulk` API

use serde::Deserialize;
use std::fmt;
use tracing::debug;

use crate::error::EsError;
use crate::http::HttpClient;

/// Aggregate outcome of one accepted bulk write.
///
/// Its `Display` form is the status string reported back to the
/// invocation harness, line structure included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkSummary {
    pub successful: usize,
    pub failed: usize,
}

impl fmt::Display for BulkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "elasticsearch bulk update successful\nsuccessful items: {}\nfailed items: {}",
            self.successful, self.failed
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<BulkResponseItem>,
}

#[derive(Debug, Default, Deserialize)]
struct BulkResponseItem {
    #[serde(default)]
    status: u16,
}

/// Sends bulk payloads to a single Elasticsearch endpoint.
pub struct BulkWriter<T: HttpClient> {
    http: T,
    bulk_url: String,
}

impl<T: HttpClient> BulkWriter<T> {
    pub fn new(http: T, es_host: &str) -> Self {
        Self {
            http,
            bulk_url: format!("{}/_bulk", es_host.trim_end_matches('/')),
        }
    }

    /// Send one non-empty payload and summarize the per-item outcome.
    ///
    /// Only HTTP 200 counts as accepted. An accepted response is parsed
    /// tolerantly: a body that does not match the expected shape counts
    /// as zero items rather than an error. Items with status >= 300 are
    /// failures.
    pub async fn write(&self, payload: &str) -> Result<BulkSummary, EsError> {
        let response = self
            .http
            .request(
                "POST",
                &self.bulk_url,
                vec![("Content-Type".to_string(), "application/json".to_string())],
                Some(payload.as_bytes().to_vec()),
            )
            .await
            .map_err(EsError::Transport)?;

        if response.status != 200 {
            return Err(EsError::BulkRejected {
                status: response.status,
                body: response.body_string(),
            });
        }

        let parsed: BulkResponse = serde_json::from_slice(&response.body).unwrap_or_default();
        let mut summary = BulkSummary::default();
        for item in &parsed.items {
            if item.status >= 300 {
                summary.failed += 1;
            } else {
                summary.successful += 1;
            }
        }
        debug!(
            successful = summary.successful,
            failed = summary.failed,
            "bulk update accepted"
        );
        Ok(summary)
    }
}
