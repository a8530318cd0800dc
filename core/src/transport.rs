//! The contract every endpoint group talks through.
//!
//! Paths are relative to the API base (`/teams/{id}`); the implementation
//! owns the base URL, authentication headers, JSON encoding and the mapping
//! of HTTP statuses onto `ApiError`. An empty 2xx body is `Value::Null`.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{MultipartForm, Query};

pub trait Transport {
    fn get(&self, path: &str, params: Option<&Query>) -> Result<Value, ApiError>;

    fn post(&self, path: &str, options: Option<&Value>) -> Result<Value, ApiError>;

    fn put(&self, path: &str, options: Option<&Value>) -> Result<Value, ApiError>;

    fn delete(&self, path: &str, params: Option<&Query>) -> Result<Value, ApiError>;

    /// GET returning the raw body, for non-JSON resources such as images.
    fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError>;

    fn post_multipart(&self, path: &str, form: &MultipartForm) -> Result<Value, ApiError>;
}
