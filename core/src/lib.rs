//! Synchronous client binding for the Mattermost REST API v4.
//!
//! # Overview
//! Endpoint groups (`Teams`, `Channels`, `Posts`, `Reactions`, `Users`)
//! turn method calls into paths, query strings and JSON bodies, delegate to
//! a `Transport`, and decode the answers into entity value objects.
//!
//! # Design
//! - `Transport` is the only seam. `Client` implements it over a pluggable
//!   `Executor`, so the core stays free of I/O (host-does-IO); the `ureq`
//!   feature supplies a blocking executor.
//! - No caching, retries or background work. Every call, including the
//!   cross-reference accessors on `Post` and `Thread`, is one fresh request.
//! - Errors split into transport failures and `Decode` for responses that
//!   do not fit the expected entity.

pub mod client;
pub mod driver;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod models;
pub mod options;
pub mod transport;
#[cfg(feature = "ureq")]
pub mod ureq_executor;

#[cfg(test)]
mod testing;

pub use client::{Body, Client, Executor};
pub use driver::Driver;
pub use endpoints::{Channels, Endpoint, Pagination, Posts, Reactions, Teams, Users, DEFAULT_PER_PAGE};
pub use error::ApiError;
pub use http::{FilePart, HttpMethod, HttpRequest, HttpResponse, MultipartForm, Query};
pub use models::{
    Channel, ChannelType, CreateChannel, CreatePost, CreateReaction, CreateTeam, Post, PostList,
    PostPatch, Reaction, Team, TeamType, Thread, User,
};
pub use options::DriverOptions;
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use ureq_executor::UreqExecutor;
