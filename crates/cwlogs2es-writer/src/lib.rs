// cwlogs2es-writer - Signed Elasticsearch transport
//
// The pieces that talk to the network: an HTTP client seam, the SigV4
// signing client, the bulk writer, the connectivity probe, and the
// bounded retry wrapper around both.

pub mod aws;
pub mod error;
pub mod http;
pub mod probe;
pub mod retry;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use aws::SigV4Client;
pub use error::EsError;
pub use http::{HttpClient, HttpResponse};
pub use probe::ConnectivityProbe;
pub use retry::{run_with_retry, RetryPolicy, Sleep, TokioSleep};
pub use writer::{BulkSummary, BulkWriter};
