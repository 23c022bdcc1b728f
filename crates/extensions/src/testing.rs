//! In-memory [`StoreClient`] for tests.
//!
//! [`RecordingClient`] records every request it receives and answers with a
//! canned JSON value (or a queued sequence of results).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::{RequestSpec, StoreClient, TransportError};

/// One request observed by a [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Path passed to [`StoreClient::fetch`].
    pub path: String,
    /// Full request description, including merged headers.
    pub spec: RequestSpec,
}

/// A [`StoreClient`] that never touches the network.
#[derive(Debug, Default)]
pub struct RecordingClient {
    requests: Mutex<Vec<RecordedRequest>>,
    queued: Mutex<VecDeque<Result<Value, TransportError>>>,
    fallback: Mutex<Value>,
}

impl RecordingClient {
    /// A client that answers every request with `null`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that answers every request with `response`.
    pub fn responding(response: Value) -> Self {
        let client = Self::default();
        *client.fallback.lock().expect("fallback lock poisoned") = response;
        client
    }

    /// Queues one result, returned ahead of the fallback response.
    pub fn enqueue(&self, result: Result<Value, TransportError>) {
        self.queued.lock().expect("queue lock poisoned").push_back(result);
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request lock poisoned").clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().expect("request lock poisoned").last().cloned()
    }
}

#[async_trait]
impl StoreClient for RecordingClient {
    async fn fetch(&self, path: &str, spec: RequestSpec) -> Result<Value, TransportError> {
        self.requests
            .lock()
            .expect("request lock poisoned")
            .push(RecordedRequest {
                path: path.to_owned(),
                spec,
            });

        if let Some(result) = self.queued.lock().expect("queue lock poisoned").pop_front() {
            return result;
        }
        Ok(self.fallback.lock().expect("fallback lock poisoned").clone())
    }
}
