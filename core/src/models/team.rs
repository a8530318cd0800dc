use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Who may join a team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamType {
    #[default]
    #[serde(rename = "O")]
    Open,
    #[serde(rename = "I")]
    InviteOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub team_type: TeamType,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub allow_open_invite: bool,
    #[serde(default)]
    pub invite_id: String,
    #[serde(default)]
    pub create_at: i64,
    #[serde(default)]
    pub update_at: i64,
    #[serde(default)]
    pub delete_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request payload for `POST /teams`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub team_type: TeamType,
}
