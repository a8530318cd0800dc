use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The user fields this crate reads; everything else stays in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub roles: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
