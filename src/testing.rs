use crate::error::VaultError;
use crate::transport::{RawResponse, Transport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub uri: String,
    pub body: Option<serde_json::Value>,
    pub token: Option<String>,
}

/// Recording transport. Routes match on URI suffix and answer every time;
/// queued responses are consumed in order when no route matches.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<Vec<(String, RawResponse)>>,
    queue: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: RawResponse) {
        self.queue.lock().unwrap().push_back(response);
    }

    pub fn route(&self, uri_suffix: &str, response: RawResponse) {
        self.routes
            .lock()
            .unwrap()
            .push((uri_suffix.to_string(), response));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }

    fn respond(&self, request: RecordedRequest) -> Result<RawResponse, VaultError> {
        let uri = request.uri.clone();
        self.requests.lock().unwrap().push(request);

        let routed = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(suffix, _)| uri.ends_with(suffix.as_str()))
            .map(|(_, response)| response.clone());

        routed
            .or_else(|| self.queue.lock().unwrap().pop_front())
            .ok_or_else(|| VaultError::RequestError(format!("no stubbed response for {}", uri)))
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, uri: &str, token: Option<&str>) -> Result<RawResponse, VaultError> {
        self.respond(RecordedRequest {
            method: "GET",
            uri: uri.to_string(),
            body: None,
            token: token.map(str::to_string),
        })
    }

    async fn post(
        &self,
        uri: &str,
        body: &serde_json::Value,
        token: Option<&str>,
    ) -> Result<RawResponse, VaultError> {
        self.respond(RecordedRequest {
            method: "POST",
            uri: uri.to_string(),
            body: Some(body.clone()),
            token: token.map(str::to_string),
        })
    }

    async fn put(
        &self,
        uri: &str,
        body: &serde_json::Value,
        token: Option<&str>,
    ) -> Result<RawResponse, VaultError> {
        self.respond(RecordedRequest {
            method: "PUT",
            uri: uri.to_string(),
            body: Some(body.clone()),
            token: token.map(str::to_string),
        })
    }
}
