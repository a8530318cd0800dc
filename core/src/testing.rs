//! In-memory `Transport` for unit tests: replays queued responses and
//! records every call.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, MultipartForm, Query};
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub method: HttpMethod,
    pub path: String,
    pub params: Option<Query>,
    pub body: Option<Value>,
    pub form: Option<MultipartForm>,
}

#[derive(Default)]
pub(crate) struct RecordingTransport {
    calls: RefCell<Vec<Call>>,
    responses: RefCell<VecDeque<Result<Value, ApiError>>>,
    bytes: RefCell<VecDeque<Vec<u8>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response; calls beyond the queue get `Value::Null`.
    pub fn respond(self, value: Value) -> Self {
        self.responses.borrow_mut().push_back(Ok(value));
        self
    }

    pub fn fail(self, err: ApiError) -> Self {
        self.responses.borrow_mut().push_back(Err(err));
        self
    }

    pub fn respond_bytes(self, data: &[u8]) -> Self {
        self.bytes.borrow_mut().push_back(data.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn last(&self) -> Call {
        self.calls
            .borrow()
            .last()
            .cloned()
            .expect("no calls recorded")
    }

    fn record(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Query>,
        body: Option<&Value>,
        form: Option<&MultipartForm>,
    ) {
        self.calls.borrow_mut().push(Call {
            method,
            path: path.to_string(),
            params: params.cloned(),
            body: body.cloned(),
            form: form.cloned(),
        });
    }

    fn next(&self) -> Result<Value, ApiError> {
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

impl Transport for RecordingTransport {
    fn get(&self, path: &str, params: Option<&Query>) -> Result<Value, ApiError> {
        self.record(HttpMethod::Get, path, params, None, None);
        self.next()
    }

    fn post(&self, path: &str, options: Option<&Value>) -> Result<Value, ApiError> {
        self.record(HttpMethod::Post, path, None, options, None);
        self.next()
    }

    fn put(&self, path: &str, options: Option<&Value>) -> Result<Value, ApiError> {
        self.record(HttpMethod::Put, path, None, options, None);
        self.next()
    }

    fn delete(&self, path: &str, params: Option<&Query>) -> Result<Value, ApiError> {
        self.record(HttpMethod::Delete, path, params, None, None);
        self.next()
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        self.record(HttpMethod::Get, path, None, None, None);
        Ok(self.bytes.borrow_mut().pop_front().unwrap_or_default())
    }

    fn post_multipart(&self, path: &str, form: &MultipartForm) -> Result<Value, ApiError> {
        self.record(HttpMethod::Post, path, None, None, Some(form));
        self.next()
    }
}
