//! Scripted transport used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::error::{Result, WedofError};
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Transport answering from per-path queues of canned responses.
///
/// A path with an exhausted (or missing) queue answers `[]`.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<Result<HttpResponse>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, path: &str, response: HttpResponse) {
        self.push(path, Ok(response));
    }

    pub fn push_json(&self, path: &str, body: Value) {
        self.push_response(path, HttpResponse::ok(body.to_string()));
    }

    pub fn push_raw(&self, path: &str, body: &str) {
        self.push_response(path, HttpResponse::ok(body));
    }

    pub fn push_status(&self, path: &str, status: u16, body: &str) {
        let mut response = HttpResponse::ok(body);
        response.status = status;
        self.push_response(path, response);
    }

    pub fn push_error(&self, path: &str, error: WedofError) {
        self.push(path, Err(error));
    }

    fn push(&self, path: &str, outcome: Result<HttpResponse>) {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(outcome);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.routes
            .lock()
            .unwrap()
            .get_mut(request.url.path())
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(HttpResponse::ok("[]")))
    }
}

/// A page of `size` records with consecutive ids starting at `first_id`.
pub fn page_of(size: usize, first_id: usize) -> Value {
    Value::Array(
        (first_id..first_id + size)
            .map(|id| json!({"id": id, "name": format!("record {id}")}))
            .collect(),
    )
}
