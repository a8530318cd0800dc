use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An emoji reaction. There is no reaction id: a reaction is identified by
/// its `(user_id, post_id, emoji_name)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub user_id: String,
    pub post_id: String,
    pub emoji_name: String,
    #[serde(default)]
    pub create_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reaction {
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.user_id, &self.post_id, &self.emoji_name)
    }
}

/// Request payload for `POST /reactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReaction {
    pub user_id: String,
    pub post_id: String,
    pub emoji_name: String,
    pub create_at: i64,
}
