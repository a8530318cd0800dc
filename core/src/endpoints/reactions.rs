use serde_json::Value;

use super::{decode, posts, to_options, users, Endpoint};
use crate::error::ApiError;
use crate::models::{CreateReaction, Reaction};
use crate::transport::Transport;

pub const ENDPOINT: &str = "/reactions";

/// `/reactions` endpoint group. Reactions have no id of their own; delete
/// addresses one by user, post and emoji.
#[derive(Clone, Copy)]
pub struct Reactions<'a> {
    client: &'a dyn Transport,
}

impl<'a> Endpoint<'a> for Reactions<'a> {
    const ENDPOINT: &'static str = ENDPOINT;

    fn new(client: &'a dyn Transport) -> Self {
        Self { client }
    }
}

impl<'a> Reactions<'a> {
    /// `create_at` is a client-supplied timestamp in milliseconds.
    pub fn create_reaction(
        &self,
        user_id: &str,
        post_id: &str,
        emoji_name: &str,
        create_at: i64,
    ) -> Result<Reaction, ApiError> {
        let body = to_options(&CreateReaction {
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            emoji_name: emoji_name.to_string(),
            create_at,
        })?;
        decode(self.client.post(ENDPOINT, Some(&body))?)
    }

    /// Every reaction on the post, from all users. A post without reactions
    /// may come back as `null`, which yields an empty list.
    pub fn get_reactions_of_post(&self, post_id: &str) -> Result<Vec<Reaction>, ApiError> {
        let value = self
            .client
            .get(&format!("{}/{post_id}{ENDPOINT}", posts::ENDPOINT), None)?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        decode(value)
    }

    pub fn delete_reaction(
        &self,
        user_id: &str,
        post_id: &str,
        emoji_name: &str,
    ) -> Result<Value, ApiError> {
        self.client.delete(
            &format!(
                "{}/{user_id}/posts/{post_id}{ENDPOINT}/{emoji_name}",
                users::ENDPOINT
            ),
            None,
        )
    }
}
