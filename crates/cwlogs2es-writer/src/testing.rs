// Scripted HttpClient for unit tests.

use crate::http::{HttpClient, HttpResponse};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One request exactly as the component under test issued it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }
}

/// HttpClient that replays scripted responses in order and records every
/// request. Clones share state, so tests keep a handle for assertions
/// after moving a clone into the component under test.
#[derive(Clone, Default)]
pub struct MockHttpClient {
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    pub fn reply(self, status: u16, body: &[u8]) -> Self {
        self.state.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_vec(),
        }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.state
            .responses
            .lock()
            .unwrap()
            .push_back(Err(anyhow::anyhow!(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn request(
        &self,
        method: &str,
        url: &str,
        headers: Vec<(String, String)>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse> {
        self.state.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers,
            body,
        });
        match self.state.responses.lock().unwrap().pop_front() {
            Some(result) => result,
            None => panic!("no scripted response remaining for {} {}", method, url),
        }
    }
}
