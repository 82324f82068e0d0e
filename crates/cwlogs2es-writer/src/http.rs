//! HTTP client abstraction

use anyhow::Result;
use async_trait::async_trait;

/// Response captured from one HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Response body as text, lossy on invalid UTF-8.
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Minimal async HTTP surface the transport components depend on.
///
/// Production code uses [`SigV4Client`](crate::aws::SigV4Client); tests
/// substitute scripted implementations.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(
        &self,
        method: &str,
        url: &str,
        headers: Vec<(String, String)>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse>;
}
