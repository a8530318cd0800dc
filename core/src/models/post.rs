use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::empty_as_none;
use crate::endpoints::{Channels, Posts, Users};
use crate::error::ApiError;
use crate::models::{Channel, User};

/// A post. Related entities are stored as ids and resolved on demand
/// through the endpoint group passed to the accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub channel_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub root_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub original_id: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub post_type: String,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub has_reactions: bool,
    #[serde(default)]
    pub create_at: i64,
    #[serde(default)]
    pub update_at: i64,
    #[serde(default)]
    pub delete_at: i64,
    #[serde(default)]
    pub file_ids: Vec<String>,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    /// Fetch the author. `None` when the post carries no user id.
    pub fn user(&self, users: &Users<'_>) -> Result<Option<User>, ApiError> {
        self.user_id.as_deref().map(|id| users.get_user(id)).transpose()
    }

    pub fn channel(&self, channels: &Channels<'_>) -> Result<Option<Channel>, ApiError> {
        self.channel_id
            .as_deref()
            .map(|id| channels.get_channel(id))
            .transpose()
    }

    /// Fetch the thread root this post replies to.
    pub fn root(&self, posts: &Posts<'_>) -> Result<Option<Post>, ApiError> {
        self.root_id.as_deref().map(|id| posts.get_post(id)).transpose()
    }

    pub fn parent(&self, posts: &Posts<'_>) -> Result<Option<Post>, ApiError> {
        self.parent_id.as_deref().map(|id| posts.get_post(id)).transpose()
    }

    /// Fetch the post this one was edited from.
    pub fn original(&self, posts: &Posts<'_>) -> Result<Option<Post>, ApiError> {
        self.original_id.as_deref().map(|id| posts.get_post(id)).transpose()
    }
}

/// A thread as returned by `GET /posts/{id}/thread`: the ordered post ids
/// plus the cursors for the neighbouring pages.
///
/// The embedded post bodies are left in `extra`; `posts` fetches each post
/// again by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub next_post_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub prev_post_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Thread {
    pub fn post_ids(&self) -> &[String] {
        &self.order
    }

    /// One `get_post` per id, in thread order. Stops at the first failure.
    pub fn posts(&self, posts: &Posts<'_>) -> Result<Vec<Post>, ApiError> {
        self.order.iter().map(|id| posts.get_post(id)).collect()
    }

    pub fn next_post(&self, posts: &Posts<'_>) -> Result<Option<Post>, ApiError> {
        self.next_post_id
            .as_deref()
            .map(|id| posts.get_post(id))
            .transpose()
    }

    pub fn previous_post(&self, posts: &Posts<'_>) -> Result<Option<Post>, ApiError> {
        self.prev_post_id
            .as_deref()
            .map(|id| posts.get_post(id))
            .transpose()
    }
}

/// A page of posts keyed by id, with the display order alongside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostList {
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub posts: HashMap<String, Post>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub next_post_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub prev_post_id: Option<String>,
}

impl PostList {
    /// Posts in `order`; ids missing from the map are skipped.
    pub fn ordered(&self) -> Vec<&Post> {
        self.order.iter().filter_map(|id| self.posts.get(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Request payload for `POST /posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePost {
    pub channel_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Value>,
}

/// Fields for `update_post` and `patch_post`.
///
/// Unset fields are sent as JSON `null`. The patch endpoint leaves null
/// fields untouched on the server; the update endpoint replaces the post and
/// may reset them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    pub is_pinned: Option<bool>,
    pub message: Option<String>,
    pub has_reactions: Option<bool>,
    pub props: Option<Value>,
}

impl PostPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = Some(is_pinned);
        self
    }

    pub fn has_reactions(mut self, has_reactions: bool) -> Self {
        self.has_reactions = Some(has_reactions);
        self
    }

    pub fn props(mut self, props: Value) -> Self {
        self.props = Some(props);
        self
    }
}
