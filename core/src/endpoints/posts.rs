use serde_json::{json, Value};

use super::{channels, decode, teams, to_options, users, Channels, Endpoint, Users};
use crate::error::ApiError;
use crate::http::Query;
use crate::models::{Channel, CreatePost, Post, PostList, PostPatch, Thread, User};
use crate::transport::Transport;

pub const ENDPOINT: &str = "/posts";

/// `/posts` endpoint group. Also exposes the `Users` and `Channels` groups
/// so `Post` accessors can be handed everything from one place.
#[derive(Clone, Copy)]
pub struct Posts<'a> {
    client: &'a dyn Transport,
    users: Users<'a>,
    channels: Channels<'a>,
}

impl<'a> Endpoint<'a> for Posts<'a> {
    const ENDPOINT: &'static str = ENDPOINT;

    fn new(client: &'a dyn Transport) -> Self {
        Self {
            client,
            users: Users::new(client),
            channels: Channels::new(client),
        }
    }
}

impl<'a> Posts<'a> {
    pub fn users(&self) -> &Users<'a> {
        &self.users
    }

    pub fn channels(&self) -> &Channels<'a> {
        &self.channels
    }

    /// Create a post in `channel`. Passing `root` makes it a reply in that
    /// post's thread.
    pub fn create_post(
        &self,
        channel: &Channel,
        message: &str,
        root: Option<&Post>,
        file_ids: Option<Vec<String>>,
        props: Option<Value>,
    ) -> Result<Post, ApiError> {
        let body = to_options(&CreatePost {
            channel_id: channel.id.clone(),
            message: message.to_string(),
            root_id: root.map(|post| post.id.clone()),
            file_ids,
            props,
        })?;
        decode(self.client.post(ENDPOINT, Some(&body))?)
    }

    /// Post visible only to `user`. Requires system-admin permissions.
    pub fn create_ephemeral_post(
        &self,
        user: &User,
        channel: &Channel,
        message: &str,
    ) -> Result<Post, ApiError> {
        let body = json!({
            "user_id": user.id,
            "post": {"channel_id": channel.id, "message": message},
        });
        decode(self.client.post(&format!("{ENDPOINT}/ephemeral"), Some(&body))?)
    }

    pub fn get_post(&self, post_id: &str) -> Result<Post, ApiError> {
        decode(self.client.get(&format!("{ENDPOINT}/{post_id}"), None)?)
    }

    pub fn delete_post(&self, post: &Post) -> Result<Value, ApiError> {
        self.client.delete(&format!("{ENDPOINT}/{}", post.id), None)
    }

    /// Replace the post. Fields left unset are sent as `null` and the
    /// server may reset them, `is_pinned` included; prefer `patch_post`.
    pub fn update_post(&self, post_id: &str, update: &PostPatch) -> Result<Post, ApiError> {
        let body = patch_body(post_id, update)?;
        decode(self.client.put(&format!("{ENDPOINT}/{post_id}"), Some(&body))?)
    }

    /// Partially update the post. Fields left unset keep their server-side
    /// value.
    pub fn patch_post(&self, post_id: &str, patch: &PostPatch) -> Result<Post, ApiError> {
        let body = patch_body(post_id, patch)?;
        decode(
            self.client
                .put(&format!("{ENDPOINT}/{post_id}/patch"), Some(&body))?,
        )
    }

    pub fn get_thread(&self, post: &Post) -> Result<Thread, ApiError> {
        decode(self.client.get(&format!("{ENDPOINT}/{}/thread", post.id), None)?)
    }

    /// `params` may narrow by `team_id`/`channel_id` and page.
    pub fn get_list_of_flagged_posts(
        &self,
        user_id: &str,
        params: Option<&Query>,
    ) -> Result<PostList, ApiError> {
        decode(self.client.get(
            &format!("{}/{user_id}/posts/flagged", users::ENDPOINT),
            params,
        )?)
    }

    pub fn get_file_info_for_post(&self, post_id: &str) -> Result<Value, ApiError> {
        self.client
            .get(&format!("{ENDPOINT}/{post_id}/files/info"), None)
    }

    /// `params` takes `page`, `per_page`, `since`, `before`, `after`.
    pub fn get_posts_for_channel(
        &self,
        channel_id: &str,
        params: Option<&Query>,
    ) -> Result<PostList, ApiError> {
        decode(self.client.get(
            &format!("{}/{channel_id}/posts", channels::ENDPOINT),
            params,
        )?)
    }

    /// `options` carries `terms` and `is_or_search`.
    pub fn search_for_team_posts(&self, team_id: &str, options: &Value) -> Result<PostList, ApiError> {
        decode(self.client.post(
            &format!("{}/{team_id}/posts/search", teams::ENDPOINT),
            Some(options),
        )?)
    }

    pub fn pin_post_to_channel(&self, post_id: &str) -> Result<Value, ApiError> {
        self.client.post(&format!("{ENDPOINT}/{post_id}/pin"), None)
    }

    pub fn unpin_post_to_channel(&self, post_id: &str) -> Result<Value, ApiError> {
        self.client.post(&format!("{ENDPOINT}/{post_id}/unpin"), None)
    }

    /// Trigger an interactive message action attached to the post.
    pub fn perform_post_action(&self, post_id: &str, action_id: &str) -> Result<Value, ApiError> {
        self.client
            .post(&format!("{ENDPOINT}/{post_id}/actions/{action_id}"), None)
    }
}

fn patch_body(post_id: &str, patch: &PostPatch) -> Result<Value, ApiError> {
    let mut body = to_options(patch)?;
    if let Value::Object(map) = &mut body {
        map.insert("id".to_string(), Value::String(post_id.to_string()));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::RecordingTransport;

    fn post(value: Value) -> Post {
        decode(value).unwrap()
    }

    fn channel(id: &str) -> Channel {
        decode(json!({"id": id})).unwrap()
    }

    #[test]
    fn create_post_returns_server_identity() {
        let transport = RecordingTransport::new().respond(json!({
            "id": "p-new", "channel_id": "c1", "message": "hello", "root_id": ""
        }));
        let created = Posts::new(&transport)
            .create_post(&channel("c1"), "hello", None, None, None)
            .unwrap();
        assert_eq!(created.id, "p-new");
        assert_eq!(created.root_id, None);
        let call = transport.last();
        assert_eq!(call.path, "/posts");
        assert_eq!(call.body, Some(json!({"channel_id": "c1", "message": "hello"})));
    }

    #[test]
    fn reply_carries_root_id_and_extras() {
        let transport = RecordingTransport::new().respond(json!({"id": "p2", "root_id": "p1"}));
        let root = post(json!({"id": "p1"}));
        let reply = Posts::new(&transport)
            .create_post(
                &channel("c1"),
                "reply",
                Some(&root),
                Some(vec!["f1".to_string()]),
                Some(json!({"from_bot": "true"})),
            )
            .unwrap();
        assert_eq!(reply.root_id.as_deref(), Some("p1"));
        let body = transport.last().body.unwrap();
        assert_eq!(body["root_id"], "p1");
        assert_eq!(body["file_ids"], json!(["f1"]));
        assert_eq!(body["props"], json!({"from_bot": "true"}));
    }

    #[test]
    fn ephemeral_post_nests_payload() {
        let transport = RecordingTransport::new().respond(json!({"id": "e1"}));
        let user: User = decode(json!({"id": "u1"})).unwrap();
        Posts::new(&transport)
            .create_ephemeral_post(&user, &channel("c1"), "only you")
            .unwrap();
        let call = transport.last();
        assert_eq!(call.path, "/posts/ephemeral");
        assert_eq!(
            call.body,
            Some(json!({"user_id": "u1", "post": {"channel_id": "c1", "message": "only you"}}))
        );
    }

    #[test]
    fn patch_post_preserves_unset_pin_as_null() {
        let transport = RecordingTransport::new().respond(json!({"id": "p1", "is_pinned": true}));
        let patched = Posts::new(&transport)
            .patch_post("p1", &PostPatch::new().message("edited"))
            .unwrap();
        assert!(patched.is_pinned);
        let call = transport.last();
        assert_eq!(call.method, HttpMethod::Put);
        assert_eq!(call.path, "/posts/p1/patch");
        let body = call.body.unwrap();
        assert_eq!(body["id"], "p1");
        assert_eq!(body["message"], "edited");
        assert!(body.as_object().unwrap().contains_key("is_pinned"));
        assert_eq!(body["is_pinned"], Value::Null);
        assert_eq!(body["has_reactions"], Value::Null);
    }

    #[test]
    fn update_post_uses_replace_path() {
        let transport = RecordingTransport::new().respond(json!({"id": "p1"}));
        Posts::new(&transport)
            .update_post("p1", &PostPatch::new().pinned(false).message("m"))
            .unwrap();
        let call = transport.last();
        assert_eq!(call.path, "/posts/p1");
        assert_eq!(call.body.unwrap()["is_pinned"], false);
    }

    #[test]
    fn thread_of_lonely_post() {
        let transport = RecordingTransport::new().respond(json!({
            "order": ["p1"],
            "posts": {"p1": {"id": "p1"}},
            "next_post_id": "",
            "prev_post_id": ""
        }));
        let thread = Posts::new(&transport)
            .get_thread(&post(json!({"id": "p1"})))
            .unwrap();
        assert_eq!(thread.post_ids().len(), 1);
        assert_eq!(thread.post_ids()[0], "p1");
        assert!(thread.next_post_id.is_none());
        assert!(thread.prev_post_id.is_none());
        assert_eq!(transport.last().path, "/posts/p1/thread");
    }

    #[test]
    fn thread_posts_fetch_each_id() {
        let transport = RecordingTransport::new()
            .respond(json!({"order": ["p1", "p2"], "next_post_id": "p3", "prev_post_id": ""}))
            .respond(json!({"id": "p1"}))
            .respond(json!({"id": "p2"}))
            .respond(json!({"id": "p3"}));
        let posts = Posts::new(&transport);
        let thread = posts.get_thread(&post(json!({"id": "p1"}))).unwrap();
        let fetched = thread.posts(&posts).unwrap();
        assert_eq!(fetched.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), ["p1", "p2"]);
        assert_eq!(thread.next_post(&posts).unwrap().unwrap().id, "p3");
        assert!(thread.previous_post(&posts).unwrap().is_none());
        let paths: Vec<String> = transport.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, ["/posts/p1/thread", "/posts/p1", "/posts/p2", "/posts/p3"]);
    }

    #[test]
    fn accessors_refetch_every_time() {
        let transport = RecordingTransport::new()
            .respond(json!({"id": "c1"}))
            .respond(json!({"id": "c1"}))
            .respond(json!({"id": "u1"}))
            .respond(json!({"id": "root"}));
        let posts = Posts::new(&transport);
        let reply = post(json!({
            "id": "p2", "user_id": "u1", "channel_id": "c1", "root_id": "root", "parent_id": ""
        }));
        reply.channel(posts.channels()).unwrap();
        reply.channel(posts.channels()).unwrap();
        assert_eq!(reply.user(posts.users()).unwrap().unwrap().id, "u1");
        assert_eq!(reply.root(&posts).unwrap().unwrap().id, "root");
        assert!(reply.parent(&posts).unwrap().is_none());
        assert!(reply.original(&posts).unwrap().is_none());
        let paths: Vec<String> = transport.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, ["/channels/c1", "/channels/c1", "/users/u1", "/posts/root"]);
    }

    #[test]
    fn listings_decode_post_lists() {
        let list = json!({"order": ["p1"], "posts": {"p1": {"id": "p1"}}});
        let transport = RecordingTransport::new()
            .respond(list.clone())
            .respond(list.clone())
            .respond(list);
        let posts = Posts::new(&transport);
        let params = Query::new().with("page", 0).with("per_page", 60);
        posts.get_list_of_flagged_posts("u1", None).unwrap();
        posts.get_posts_for_channel("c1", Some(&params)).unwrap();
        let found = posts
            .search_for_team_posts("t1", &json!({"terms": "deploy", "is_or_search": false}))
            .unwrap();
        assert_eq!(found.ordered()[0].id, "p1");
        let calls = transport.calls();
        assert_eq!(calls[0].path, "/users/u1/posts/flagged");
        assert_eq!(calls[1].path, "/channels/c1/posts");
        assert_eq!(calls[1].params.as_ref().unwrap().get("per_page"), Some("60"));
        assert_eq!(calls[2].path, "/teams/t1/posts/search");
        assert_eq!(calls[2].method, HttpMethod::Post);
    }

    #[test]
    fn pin_unpin_action_and_delete() {
        let transport = RecordingTransport::new();
        let posts = Posts::new(&transport);
        posts.pin_post_to_channel("p1").unwrap();
        posts.unpin_post_to_channel("p1").unwrap();
        posts.perform_post_action("p1", "approve").unwrap();
        posts.get_file_info_for_post("p1").unwrap();
        posts.delete_post(&post(json!({"id": "p1"}))).unwrap();
        let summary: Vec<(HttpMethod, String)> =
            transport.calls().into_iter().map(|c| (c.method, c.path)).collect();
        assert_eq!(
            summary,
            [
                (HttpMethod::Post, "/posts/p1/pin".to_string()),
                (HttpMethod::Post, "/posts/p1/unpin".to_string()),
                (HttpMethod::Post, "/posts/p1/actions/approve".to_string()),
                (HttpMethod::Get, "/posts/p1/files/info".to_string()),
                (HttpMethod::Delete, "/posts/p1".to_string()),
            ]
        );
    }
}
