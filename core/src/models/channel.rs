use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Channel kind as the server encodes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelType {
    #[default]
    #[serde(rename = "O")]
    Public,
    #[serde(rename = "P")]
    Private,
    #[serde(rename = "D")]
    Direct,
    #[serde(rename = "G")]
    Group,
}

/// A channel. `name` is unique within the team, `display_name` is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, rename = "type")]
    pub channel_type: ChannelType,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub creator_id: String,
    #[serde(default)]
    pub create_at: i64,
    #[serde(default)]
    pub update_at: i64,
    #[serde(default)]
    pub delete_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request payload for `POST /channels`. Unset purpose/header go out as
/// `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChannel {
    pub team_id: String,
    pub name: String,
    pub display_name: String,
    pub purpose: Option<String>,
    pub header: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
}
