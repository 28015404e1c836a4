use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::transport::{Transport, TransportRequest, TransportResponse};
use crate::error::{ClientError, ClientResult};

/// Scripted transport: replays queued responses in order and records every
/// request it receives.
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<ClientResult<TransportResponse>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_response(&self, response: TransportResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) {
        self.push_response(TransportResponse {
            status,
            content_type: Some("application/json".to_string()),
            set_cookies: Vec::new(),
            body: body.to_string(),
        });
    }

    pub(crate) fn push_text(&self, status: u16, content_type: &str, body: &str) {
        self.push_response(TransportResponse {
            status,
            content_type: Some(content_type.to_string()),
            set_cookies: Vec::new(),
            body: body.to_string(),
        });
    }

    pub(crate) fn push_error(&self, error: ClientError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no scripted response".to_string())))
    }
}
