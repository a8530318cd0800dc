//! The slice of `/users` other groups depend on: single and batch lookup.

use serde_json::Value;

use super::{decode, Endpoint};
use crate::error::ApiError;
use crate::models::User;
use crate::transport::Transport;

pub const ENDPOINT: &str = "/users";

#[derive(Clone, Copy)]
pub struct Users<'a> {
    client: &'a dyn Transport,
}

impl<'a> Endpoint<'a> for Users<'a> {
    const ENDPOINT: &'static str = ENDPOINT;

    fn new(client: &'a dyn Transport) -> Self {
        Self { client }
    }
}

impl<'a> Users<'a> {
    pub fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        decode(self.client.get(&format!("{ENDPOINT}/{user_id}"), None)?)
    }

    /// `POST /users/ids`. An empty id list returns an empty result without
    /// a request.
    pub fn get_users_by_ids<S: AsRef<str>>(&self, user_ids: &[S]) -> Result<Vec<User>, ApiError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Value> = user_ids
            .iter()
            .map(|id| Value::String(id.as_ref().to_string()))
            .collect();
        decode(self.client.post(&format!("{ENDPOINT}/ids"), Some(&Value::Array(ids)))?)
    }
}
