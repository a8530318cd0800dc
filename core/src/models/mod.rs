//! Entity value objects decoded from API responses.
//!
//! # Design
//! Each entity has a fixed set of named fields plus an `extra` map that
//! absorbs anything the server adds later. Only identity fields are
//! required; a mapping without them fails with `ApiError::Decode`.
//! Entities are snapshots: nothing keeps them in sync with the server, and
//! the cross-reference accessors on `Post`/`Thread` fetch again every call.

mod channel;
mod post;
mod reaction;
mod team;
mod user;

pub use channel::{Channel, ChannelType, CreateChannel};
pub use post::{CreatePost, Post, PostList, PostPatch, Thread};
pub use reaction::{CreateReaction, Reaction};
pub use team::{CreateTeam, Team, TeamType};
pub use user::User;

use serde::{Deserialize, Deserializer};

/// The server sends `""` for unset id references; treat that as absent.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
