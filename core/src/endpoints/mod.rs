//! Endpoint groups, one per resource.
//!
//! # Design
//! Every group borrows the shared `Transport` and owns a URL prefix. A
//! method builds its path (sometimes from another group's prefix, e.g.
//! `/users/{id}/teams`), shapes the query or body, delegates, and wraps
//! structured results in entity types. Status-style responses are returned
//! as the decoded `Value` untouched.

mod channels;
mod posts;
mod reactions;
mod teams;
mod users;

pub use channels::Channels;
pub use posts::Posts;
pub use reactions::Reactions;
pub use teams::Teams;
pub use users::Users;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::Query;
use crate::transport::Transport;

/// Default page size for listing operations.
pub const DEFAULT_PER_PAGE: u32 = 1 << 10;

/// Shared shape of an endpoint group.
pub trait Endpoint<'a> {
    /// URL prefix relative to the API base, e.g. `/posts`.
    const ENDPOINT: &'static str;

    fn new(client: &'a dyn Transport) -> Self;
}

/// `page`/`per_page` for listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    pub(crate) fn to_query(self) -> Query {
        Query::new()
            .with("page", self.page)
            .with("per_page", self.per_page)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(ApiError::decode)
}

pub(crate) fn to_options<T: Serialize>(input: &T) -> Result<Value, ApiError> {
    serde_json::to_value(input).map_err(|e| ApiError::Serialization(e.to_string()))
}
