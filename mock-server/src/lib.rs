//! In-memory stand-in for the subset of the Mattermost v4 API the driver's
//! integration tests exercise.
//!
//! The caller is identified by the bearer token: whatever follows
//! `Bearer ` is taken as the acting user id. Ids are random UUIDs; timestamps
//! come from a logical clock so ordering is deterministic.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub roles: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub team_type: String,
    pub create_at: i64,
    pub update_at: i64,
    pub delete_at: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: String,
    pub user_id: String,
    pub roles: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub team_id: String,
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub channel_type: String,
    pub purpose: String,
    pub header: String,
    pub creator_id: String,
    pub create_at: i64,
    pub update_at: i64,
    pub delete_at: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelMember {
    pub channel_id: String,
    pub user_id: String,
    pub roles: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub channel_id: String,
    pub root_id: String,
    pub original_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub post_type: String,
    pub is_pinned: bool,
    pub has_reactions: bool,
    pub file_ids: Vec<String>,
    pub props: Map<String, Value>,
    pub create_at: i64,
    pub update_at: i64,
    pub delete_at: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reaction {
    pub user_id: String,
    pub post_id: String,
    pub emoji_name: String,
    pub create_at: i64,
}

#[derive(Debug, Default)]
pub struct Store {
    clock: i64,
    pub users: HashMap<String, User>,
    pub teams: HashMap<String, Team>,
    pub team_members: Vec<TeamMember>,
    pub channels: HashMap<String, Channel>,
    pub channel_members: Vec<ChannelMember>,
    pub posts: HashMap<String, Post>,
    pub reactions: Vec<Reaction>,
}

impl Store {
    fn tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }

    /// Register a user directly; the driver has no user creation call.
    pub fn add_user(&mut self, username: &str) -> User {
        let user = User {
            id: new_id(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            roles: "system_user".to_string(),
        };
        self.users.insert(user.id.clone(), user.clone());
        user
    }
}

pub type Db = Arc<RwLock<Store>>;

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Error shaped like the Mattermost error body.
#[derive(Debug)]
pub struct ApiErr {
    status: StatusCode,
    message: String,
}

impl ApiErr {
    fn not_found(what: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("Unable to find the {what}."),
        }
    }

    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, message = %self.message, "request rejected");
        let body = json!({
            "id": "mock.error",
            "message": self.message,
            "request_id": "",
            "status_code": self.status.as_u16(),
            "is_oauth": false,
        });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiErr>;

fn ok_status() -> Json<Value> {
    Json(json!({"status": "OK"}))
}

fn acting_user(headers: &HeaderMap) -> String {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default)]
    page: usize,
    #[serde(default = "default_per_page")]
    per_page: usize,
    #[serde(default)]
    include_total_count: bool,
}

fn default_per_page() -> usize {
    60
}

fn paginate<T>(items: Vec<T>, paging: &Paging) -> Vec<T> {
    items
        .into_iter()
        .skip(paging.page.saturating_mul(paging.per_page))
        .take(paging.per_page)
        .collect()
}

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    let api = Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{team_id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/teams/{team_id}/patch", put(patch_team))
        .route("/teams/name/{name}", get(get_team_by_name))
        .route("/teams/name/{name}/exists", get(team_exists))
        .route(
            "/teams/{team_id}/members",
            get(list_team_members).post(add_team_member),
        )
        .route("/teams/{team_id}/channels", get(list_public_channels))
        .route(
            "/teams/{team_id}/channels/name/{channel_name}",
            get(get_channel_by_name),
        )
        .route("/channels", post(create_channel))
        .route("/channels/{channel_id}", get(get_channel).delete(delete_channel))
        .route("/channels/{channel_id}/patch", put(patch_channel))
        .route("/channels/{channel_id}/restore", post(restore_channel))
        .route(
            "/channels/{channel_id}/members",
            get(list_channel_members).post(add_channel_member),
        )
        .route("/channels/{channel_id}/pinned", get(pinned_posts))
        .route("/channels/{channel_id}/posts", get(channel_posts))
        .route("/users/ids", post(users_by_ids))
        .route("/users/{user_id}", get(get_user))
        .route(
            "/users/{user_id}/posts/{post_id}/reactions/{emoji_name}",
            delete(delete_reaction),
        )
        .route("/posts", post(create_post))
        .route(
            "/posts/{post_id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/{post_id}/patch", put(patch_post))
        .route("/posts/{post_id}/thread", get(get_thread))
        .route("/posts/{post_id}/pin", post(pin_post))
        .route("/posts/{post_id}/unpin", post(unpin_post))
        .route("/posts/{post_id}/reactions", get(list_reactions))
        .route("/reactions", post(create_reaction))
        .with_state(db);
    Router::new().nest("/api/v4", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

// --- teams ---

#[derive(Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub team_type: String,
}

async fn create_team(
    State(db): State<Db>,
    Json(input): Json<CreateTeam>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let mut store = db.write().await;
    if store.teams.values().any(|t| t.name == input.name) {
        return Err(ApiErr::bad_request("A team with that name already exists."));
    }
    let now = store.tick();
    let team = Team {
        id: new_id(),
        name: input.name,
        display_name: input.display_name,
        description: String::new(),
        team_type: input.team_type,
        create_at: now,
        update_at: now,
        delete_at: 0,
    };
    store.teams.insert(team.id.clone(), team.clone());
    tracing::info!(team_id = %team.id, name = %team.name, "team created");
    Ok((StatusCode::CREATED, Json(team)))
}

async fn list_teams(State(db): State<Db>, Query(paging): Query<Paging>) -> Json<Value> {
    let store = db.read().await;
    let mut teams: Vec<Team> = store.teams.values().cloned().collect();
    teams.sort_by_key(|t| t.create_at);
    let total = teams.len();
    let page = paginate(teams, &paging);
    if paging.include_total_count {
        Json(json!({"teams": page, "total_count": total}))
    } else {
        Json(json!(page))
    }
}

async fn get_team(State(db): State<Db>, Path(team_id): Path<String>) -> ApiResult<Json<Team>> {
    let store = db.read().await;
    store
        .teams
        .get(&team_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiErr::not_found("team"))
}

async fn get_team_by_name(State(db): State<Db>, Path(name): Path<String>) -> ApiResult<Json<Team>> {
    let store = db.read().await;
    store
        .teams
        .values()
        .find(|t| t.name == name)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiErr::not_found("team"))
}

async fn team_exists(State(db): State<Db>, Path(name): Path<String>) -> Json<Value> {
    let store = db.read().await;
    let exists = store.teams.values().any(|t| t.name == name);
    Json(json!({ "exists": exists }))
}

fn str_field<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
    input.get(key).and_then(Value::as_str)
}

async fn update_team(
    State(db): State<Db>,
    Path(team_id): Path<String>,
    Json(input): Json<Value>,
) -> ApiResult<Json<Team>> {
    let mut store = db.write().await;
    let now = store.tick();
    let team = store
        .teams
        .get_mut(&team_id)
        .ok_or_else(|| ApiErr::not_found("team"))?;
    team.display_name = str_field(&input, "display_name").unwrap_or_default().to_string();
    team.description = str_field(&input, "description").unwrap_or_default().to_string();
    team.update_at = now;
    Ok(Json(team.clone()))
}

async fn patch_team(
    State(db): State<Db>,
    Path(team_id): Path<String>,
    Json(input): Json<Value>,
) -> ApiResult<Json<Team>> {
    let mut store = db.write().await;
    let now = store.tick();
    let team = store
        .teams
        .get_mut(&team_id)
        .ok_or_else(|| ApiErr::not_found("team"))?;
    if let Some(display_name) = str_field(&input, "display_name") {
        team.display_name = display_name.to_string();
    }
    if let Some(description) = str_field(&input, "description") {
        team.description = description.to_string();
    }
    team.update_at = now;
    Ok(Json(team.clone()))
}

async fn delete_team(State(db): State<Db>, Path(team_id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store
        .teams
        .remove(&team_id)
        .ok_or_else(|| ApiErr::not_found("team"))?;
    store.team_members.retain(|m| m.team_id != team_id);
    Ok(ok_status())
}

async fn list_team_members(
    State(db): State<Db>,
    Path(team_id): Path<String>,
    Query(paging): Query<Paging>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    let store = db.read().await;
    if !store.teams.contains_key(&team_id) {
        return Err(ApiErr::not_found("team"));
    }
    let members = store
        .team_members
        .iter()
        .filter(|m| m.team_id == team_id)
        .cloned()
        .collect();
    Ok(Json(paginate(members, &paging)))
}

#[derive(Deserialize)]
pub struct AddTeamMember {
    pub user_id: String,
}

async fn add_team_member(
    State(db): State<Db>,
    Path(team_id): Path<String>,
    Json(input): Json<AddTeamMember>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    let mut store = db.write().await;
    if !store.teams.contains_key(&team_id) {
        return Err(ApiErr::not_found("team"));
    }
    if !store.users.contains_key(&input.user_id) {
        return Err(ApiErr::not_found("user"));
    }
    let member = TeamMember {
        team_id,
        user_id: input.user_id,
        roles: "team_user".to_string(),
    };
    store.team_members.push(member.clone());
    Ok((StatusCode::CREATED, Json(member)))
}

// --- channels ---

#[derive(Deserialize)]
pub struct CreateChannel {
    pub team_id: String,
    pub name: String,
    pub display_name: String,
    pub purpose: Option<String>,
    pub header: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: String,
}

async fn create_channel(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateChannel>,
) -> ApiResult<(StatusCode, Json<Channel>)> {
    let mut store = db.write().await;
    if !store.teams.contains_key(&input.team_id) {
        return Err(ApiErr::not_found("team"));
    }
    if store
        .channels
        .values()
        .any(|c| c.team_id == input.team_id && c.name == input.name)
    {
        return Err(ApiErr::bad_request("A channel with that name already exists on the same team."));
    }
    let now = store.tick();
    let channel = Channel {
        id: new_id(),
        team_id: input.team_id,
        name: input.name,
        display_name: input.display_name,
        channel_type: input.channel_type,
        purpose: input.purpose.unwrap_or_default(),
        header: input.header.unwrap_or_default(),
        creator_id: acting_user(&headers),
        create_at: now,
        update_at: now,
        delete_at: 0,
    };
    store.channels.insert(channel.id.clone(), channel.clone());
    tracing::info!(channel_id = %channel.id, team_id = %channel.team_id, "channel created");
    Ok((StatusCode::CREATED, Json(channel)))
}

async fn get_channel(
    State(db): State<Db>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<Channel>> {
    let store = db.read().await;
    store
        .channels
        .get(&channel_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiErr::not_found("channel"))
}

#[derive(Deserialize)]
pub struct ByName {
    #[serde(default)]
    include_deleted: bool,
}

async fn get_channel_by_name(
    State(db): State<Db>,
    Path((team_id, channel_name)): Path<(String, String)>,
    Query(query): Query<ByName>,
) -> ApiResult<Json<Channel>> {
    let store = db.read().await;
    store
        .channels
        .values()
        .find(|c| {
            c.team_id == team_id
                && c.name == channel_name
                && (query.include_deleted || c.delete_at == 0)
        })
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiErr::not_found("channel"))
}

async fn list_public_channels(
    State(db): State<Db>,
    Path(team_id): Path<String>,
    Query(paging): Query<Paging>,
) -> Json<Vec<Channel>> {
    let store = db.read().await;
    let mut channels: Vec<Channel> = store
        .channels
        .values()
        .filter(|c| c.team_id == team_id && c.channel_type == "O" && c.delete_at == 0)
        .cloned()
        .collect();
    channels.sort_by_key(|c| c.create_at);
    Json(paginate(channels, &paging))
}

async fn patch_channel(
    State(db): State<Db>,
    Path(channel_id): Path<String>,
    Json(input): Json<Value>,
) -> ApiResult<Json<Channel>> {
    let mut store = db.write().await;
    let now = store.tick();
    let channel = store
        .channels
        .get_mut(&channel_id)
        .ok_or_else(|| ApiErr::not_found("channel"))?;
    if let Some(display_name) = str_field(&input, "display_name") {
        channel.display_name = display_name.to_string();
    }
    if let Some(purpose) = str_field(&input, "purpose") {
        channel.purpose = purpose.to_string();
    }
    if let Some(header) = str_field(&input, "header") {
        channel.header = header.to_string();
    }
    channel.update_at = now;
    Ok(Json(channel.clone()))
}

async fn delete_channel(
    State(db): State<Db>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let now = store.tick();
    let channel = store
        .channels
        .get_mut(&channel_id)
        .ok_or_else(|| ApiErr::not_found("channel"))?;
    channel.delete_at = now;
    Ok(ok_status())
}

async fn restore_channel(
    State(db): State<Db>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<Channel>> {
    let mut store = db.write().await;
    let channel = store
        .channels
        .get_mut(&channel_id)
        .ok_or_else(|| ApiErr::not_found("channel"))?;
    channel.delete_at = 0;
    Ok(Json(channel.clone()))
}

async fn list_channel_members(
    State(db): State<Db>,
    Path(channel_id): Path<String>,
    Query(paging): Query<Paging>,
) -> ApiResult<Json<Vec<ChannelMember>>> {
    let store = db.read().await;
    if !store.channels.contains_key(&channel_id) {
        return Err(ApiErr::not_found("channel"));
    }
    let members = store
        .channel_members
        .iter()
        .filter(|m| m.channel_id == channel_id)
        .cloned()
        .collect();
    Ok(Json(paginate(members, &paging)))
}

#[derive(Deserialize)]
pub struct AddChannelMember {
    pub user_id: String,
    #[serde(default)]
    pub post_root_id: Option<String>,
}

async fn add_channel_member(
    State(db): State<Db>,
    Path(channel_id): Path<String>,
    Json(input): Json<AddChannelMember>,
) -> ApiResult<(StatusCode, Json<ChannelMember>)> {
    let mut store = db.write().await;
    if !store.channels.contains_key(&channel_id) {
        return Err(ApiErr::not_found("channel"));
    }
    if !store.users.contains_key(&input.user_id) {
        return Err(ApiErr::not_found("user"));
    }
    if let Some(root) = input.post_root_id.as_deref().filter(|r| !r.is_empty()) {
        if !store.posts.contains_key(root) {
            return Err(ApiErr::bad_request("Invalid post_root_id."));
        }
    }
    let member = ChannelMember {
        channel_id,
        user_id: input.user_id,
        roles: "channel_user".to_string(),
    };
    if !store
        .channel_members
        .iter()
        .any(|m| m.channel_id == member.channel_id && m.user_id == member.user_id)
    {
        store.channel_members.push(member.clone());
    }
    Ok((StatusCode::CREATED, Json(member)))
}

// --- users ---

async fn get_user(State(db): State<Db>, Path(user_id): Path<String>) -> ApiResult<Json<User>> {
    let store = db.read().await;
    store
        .users
        .get(&user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiErr::not_found("user"))
}

async fn users_by_ids(State(db): State<Db>, Json(ids): Json<Vec<String>>) -> ApiResult<Json<Vec<User>>> {
    if ids.is_empty() {
        return Err(ApiErr::bad_request("Invalid user_ids parameter."));
    }
    let store = db.read().await;
    let users = ids
        .iter()
        .filter_map(|id| store.users.get(id).cloned())
        .collect();
    Ok(Json(users))
}

// --- posts ---

#[derive(Deserialize)]
pub struct CreatePost {
    pub channel_id: String,
    pub message: String,
    #[serde(default)]
    pub root_id: Option<String>,
    #[serde(default)]
    pub file_ids: Option<Vec<String>>,
    #[serde(default)]
    pub props: Option<Map<String, Value>>,
}

async fn create_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreatePost>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let mut store = db.write().await;
    if !store.channels.contains_key(&input.channel_id) {
        return Err(ApiErr::bad_request("Invalid channel_id."));
    }
    let root_id = input.root_id.unwrap_or_default();
    if !root_id.is_empty() && !store.posts.contains_key(&root_id) {
        return Err(ApiErr::bad_request("Invalid RootId parameter."));
    }
    let now = store.tick();
    let post = Post {
        id: new_id(),
        user_id: acting_user(&headers),
        channel_id: input.channel_id,
        root_id,
        original_id: String::new(),
        message: input.message,
        post_type: String::new(),
        is_pinned: false,
        has_reactions: false,
        file_ids: input.file_ids.unwrap_or_default(),
        props: input.props.unwrap_or_default(),
        create_at: now,
        update_at: now,
        delete_at: 0,
    };
    store.posts.insert(post.id.clone(), post.clone());
    tracing::debug!(post_id = %post.id, channel_id = %post.channel_id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn get_post(State(db): State<Db>, Path(post_id): Path<String>) -> ApiResult<Json<Post>> {
    let store = db.read().await;
    store
        .posts
        .get(&post_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiErr::not_found("post"))
}

/// Full replace: absent fields fall back to their zero values.
async fn update_post(
    State(db): State<Db>,
    Path(post_id): Path<String>,
    Json(input): Json<Value>,
) -> ApiResult<Json<Post>> {
    let mut store = db.write().await;
    let now = store.tick();
    let post = store
        .posts
        .get_mut(&post_id)
        .ok_or_else(|| ApiErr::not_found("post"))?;
    post.message = str_field(&input, "message").unwrap_or_default().to_string();
    post.is_pinned = input.get("is_pinned").and_then(Value::as_bool).unwrap_or(false);
    post.props = input
        .get("props")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    post.update_at = now;
    Ok(Json(post.clone()))
}

/// Partial update: only non-null fields change.
async fn patch_post(
    State(db): State<Db>,
    Path(post_id): Path<String>,
    Json(input): Json<Value>,
) -> ApiResult<Json<Post>> {
    let mut store = db.write().await;
    let now = store.tick();
    let post = store
        .posts
        .get_mut(&post_id)
        .ok_or_else(|| ApiErr::not_found("post"))?;
    if let Some(message) = str_field(&input, "message") {
        post.message = message.to_string();
    }
    if let Some(is_pinned) = input.get("is_pinned").and_then(Value::as_bool) {
        post.is_pinned = is_pinned;
    }
    if let Some(props) = input.get("props").and_then(Value::as_object) {
        post.props = props.clone();
    }
    post.update_at = now;
    Ok(Json(post.clone()))
}

async fn delete_post(State(db): State<Db>, Path(post_id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store
        .posts
        .remove(&post_id)
        .ok_or_else(|| ApiErr::not_found("post"))?;
    store.reactions.retain(|r| r.post_id != post_id);
    Ok(ok_status())
}

async fn set_pinned(db: Db, post_id: String, pinned: bool) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let post = store
        .posts
        .get_mut(&post_id)
        .ok_or_else(|| ApiErr::not_found("post"))?;
    post.is_pinned = pinned;
    Ok(ok_status())
}

async fn pin_post(State(db): State<Db>, Path(post_id): Path<String>) -> ApiResult<Json<Value>> {
    set_pinned(db, post_id, true).await
}

async fn unpin_post(State(db): State<Db>, Path(post_id): Path<String>) -> ApiResult<Json<Value>> {
    set_pinned(db, post_id, false).await
}

/// Newest first, as the real server orders post lists.
fn post_list<'a>(posts: impl Iterator<Item = &'a Post>) -> Value {
    let mut posts: Vec<&Post> = posts.collect();
    posts.sort_by_key(|p| std::cmp::Reverse(p.create_at));
    let order: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    let by_id: HashMap<&str, &Post> = posts.iter().map(|p| (p.id.as_str(), *p)).collect();
    json!({
        "order": order,
        "posts": by_id,
        "next_post_id": "",
        "prev_post_id": "",
    })
}

async fn get_thread(State(db): State<Db>, Path(post_id): Path<String>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let post = store
        .posts
        .get(&post_id)
        .ok_or_else(|| ApiErr::not_found("post"))?;
    let root = if post.root_id.is_empty() {
        post.id.clone()
    } else {
        post.root_id.clone()
    };
    let thread = store
        .posts
        .values()
        .filter(|p| p.id == root || p.root_id == root);
    Ok(Json(post_list(thread)))
}

async fn channel_posts(
    State(db): State<Db>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    if !store.channels.contains_key(&channel_id) {
        return Err(ApiErr::not_found("channel"));
    }
    let posts = store.posts.values().filter(|p| p.channel_id == channel_id);
    Ok(Json(post_list(posts)))
}

async fn pinned_posts(
    State(db): State<Db>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    if !store.channels.contains_key(&channel_id) {
        return Err(ApiErr::not_found("channel"));
    }
    let posts = store
        .posts
        .values()
        .filter(|p| p.channel_id == channel_id && p.is_pinned);
    Ok(Json(post_list(posts)))
}

// --- reactions ---

async fn create_reaction(
    State(db): State<Db>,
    Json(input): Json<Reaction>,
) -> ApiResult<Json<Reaction>> {
    let mut store = db.write().await;
    let post = store
        .posts
        .get_mut(&input.post_id)
        .ok_or_else(|| ApiErr::bad_request("Invalid post_id."))?;
    post.has_reactions = true;
    store.reactions.retain(|r| {
        !(r.user_id == input.user_id && r.post_id == input.post_id && r.emoji_name == input.emoji_name)
    });
    store.reactions.push(input.clone());
    Ok(Json(input))
}

async fn list_reactions(
    State(db): State<Db>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<Vec<Reaction>>> {
    let store = db.read().await;
    if !store.posts.contains_key(&post_id) {
        return Err(ApiErr::not_found("post"));
    }
    let reactions = store
        .reactions
        .iter()
        .filter(|r| r.post_id == post_id)
        .cloned()
        .collect();
    Ok(Json(reactions))
}

async fn delete_reaction(
    State(db): State<Db>,
    Path((user_id, post_id, emoji_name)): Path<(String, String, String)>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let before = store.reactions.len();
    store.reactions.retain(|r| {
        !(r.user_id == user_id && r.post_id == post_id && r.emoji_name == emoji_name)
    });
    if store.reactions.len() == before {
        return Err(ApiErr::not_found("reaction"));
    }
    if !store.reactions.iter().any(|r| r.post_id == post_id) {
        if let Some(post) = store.posts.get_mut(&post_id) {
            post.has_reactions = false;
        }
    }
    Ok(ok_status())
}
