/*
[INPUT]:  Canned transport responses
[OUTPUT]: In-memory transport that records every request it receives
[POS]:    HTTP layer - test double for the transport seam
[UPDATE]: When the Transport trait changes
*/

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::http::transport::{HttpStatus, Transport, TransportRequest, TransportResponse};
use crate::types::SignedEnvelope;

/// Mock transport for testing
///
/// Responses are served in the order they were queued. Once the queue is
/// drained every further request gets a transport error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response
    pub fn push(&self, response: TransportResponse) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
        self
    }

    /// Queue a 200 response with a JSON body
    pub fn push_json(&self, body: Value) -> &Self {
        self.push(TransportResponse {
            status: HttpStatus::Code(200),
            headers: HashMap::new(),
            body: body.to_string(),
        })
    }

    /// Queue a response with an arbitrary status and raw body
    pub fn push_status(&self, status: u16, body: &str) -> &Self {
        self.push(TransportResponse {
            status: HttpStatus::Code(status),
            headers: HashMap::new(),
            body: body.to_string(),
        })
    }

    /// Every request sent so far
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Decode the envelopes of every request sent so far
    pub fn envelopes(&self) -> Vec<SignedEnvelope> {
        self.requests()
            .iter()
            .filter_map(|request| serde_json::from_str(&request.body).ok())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> TransportResponse {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| TransportResponse::failed("no scripted response"))
    }
}
