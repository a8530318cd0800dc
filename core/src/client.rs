//! HTTP-backed `Transport` over a pluggable executor.
//!
//! # Design
//! `Client` holds the base URL, the optional bearer token and an `Executor`.
//! `build_request` turns a relative path plus query/body into an
//! `HttpRequest` without any I/O, so a host can run the round-trip itself.
//! The `Transport` impl hands that request to the executor, checks the
//! status and decodes JSON. Any 2xx is success.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, Query};
use crate::options::DriverOptions;
use crate::transport::Transport;

/// Performs the actual HTTP round-trip for a `Client`.
///
/// Implementations return non-2xx responses as data; only failures that
/// leave no response behind become `ApiError::Transport`.
pub trait Executor {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Executor for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

/// Request body before headers are derived from it.
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone)]
pub struct Client<E> {
    base_url: String,
    token: Option<String>,
    debug: bool,
    executor: E,
}

impl<E: Executor> Client<E> {
    pub fn new(options: &DriverOptions, executor: E) -> Self {
        Self {
            base_url: options.base_url(),
            token: options.token.clone(),
            debug: options.debug,
            executor,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Build the request for `method path?params` with an optional body.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Query>,
        body: Option<&Body>,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = format!("{}{}", self.base_url, path);
        if let Some(query) = params.filter(|q| !q.is_empty()) {
            url.push(if path.contains('?') { '&' } else { '?' });
            url.push_str(&query.encode());
        }

        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        let body = match body {
            None => None,
            Some(Body::Json(value)) => {
                let bytes =
                    serde_json::to_vec(value).map_err(|e| ApiError::Serialization(e.to_string()))?;
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(bytes)
            }
            Some(Body::Multipart(form)) => {
                let boundary = format!("mmdriver-{}", uuid::Uuid::new_v4().simple());
                headers.push((
                    "content-type".to_string(),
                    format!("multipart/form-data; boundary={boundary}"),
                ));
                Some(form.encode(&boundary))
            }
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        if self.debug {
            tracing::info!(method = %request.method, url = %request.url, "sending request");
        } else {
            tracing::debug!(method = %request.method, url = %request.url, "sending request");
        }
        let method = request.method;
        let url = request.url.clone();
        let response = self.executor.execute(request)?;
        tracing::debug!(status = response.status, "received response");
        check_status(response).inspect_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request failed");
        })
    }

    fn call(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Query>,
        body: Option<Body>,
    ) -> Result<Value, ApiError> {
        let request = self.build_request(method, path, params, body.as_ref())?;
        let response = self.send(request)?;
        parse_json(&response)
    }
}

impl<E: Executor> Transport for Client<E> {
    fn get(&self, path: &str, params: Option<&Query>) -> Result<Value, ApiError> {
        self.call(HttpMethod::Get, path, params, None)
    }

    fn post(&self, path: &str, options: Option<&Value>) -> Result<Value, ApiError> {
        self.call(HttpMethod::Post, path, None, options.cloned().map(Body::Json))
    }

    fn put(&self, path: &str, options: Option<&Value>) -> Result<Value, ApiError> {
        self.call(HttpMethod::Put, path, None, options.cloned().map(Body::Json))
    }

    fn delete(&self, path: &str, params: Option<&Query>) -> Result<Value, ApiError> {
        self.call(HttpMethod::Delete, path, params, None)
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let request = self.build_request(HttpMethod::Get, path, None, None)?;
        Ok(self.send(request)?.body)
    }

    fn post_multipart(&self, path: &str, form: &MultipartForm) -> Result<Value, ApiError> {
        self.call(HttpMethod::Post, path, None, Some(Body::Multipart(form.clone())))
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    Err(ApiError::from_status(response.status, &response.body))
}

fn parse_json(response: &HttpResponse) -> Result<Value, ApiError> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.body).map_err(ApiError::decode)
}
