use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode, teams, to_options, users, Endpoint, Pagination, Users};
use crate::error::ApiError;
use crate::http::Query;
use crate::models::{Channel, ChannelType, CreateChannel, PostList, Team, User};
use crate::transport::Transport;

pub const ENDPOINT: &str = "/channels";

/// `/channels` endpoint group.
#[derive(Clone, Copy)]
pub struct Channels<'a> {
    client: &'a dyn Transport,
    users: Users<'a>,
}

impl<'a> Endpoint<'a> for Channels<'a> {
    const ENDPOINT: &'static str = ENDPOINT;

    fn new(client: &'a dyn Transport) -> Self {
        Self {
            client,
            users: Users::new(client),
        }
    }
}

#[derive(Deserialize)]
struct MemberRef {
    user_id: String,
}

impl<'a> Channels<'a> {
    pub fn create_channel(
        &self,
        team_id: &str,
        name: &str,
        display_name: &str,
        channel_type: ChannelType,
        purpose: Option<&str>,
        header: Option<&str>,
    ) -> Result<Channel, ApiError> {
        let body = to_options(&CreateChannel {
            team_id: team_id.to_string(),
            name: name.to_string(),
            display_name: display_name.to_string(),
            purpose: purpose.map(str::to_string),
            header: header.map(str::to_string),
            channel_type,
        })?;
        decode(self.client.post(ENDPOINT, Some(&body))?)
    }

    pub fn create_public_channel(
        &self,
        team_id: &str,
        name: &str,
        display_name: &str,
        purpose: Option<&str>,
        header: Option<&str>,
    ) -> Result<Channel, ApiError> {
        self.create_channel(team_id, name, display_name, ChannelType::Public, purpose, header)
    }

    pub fn create_private_channel(
        &self,
        team_id: &str,
        name: &str,
        display_name: &str,
        purpose: Option<&str>,
        header: Option<&str>,
    ) -> Result<Channel, ApiError> {
        self.create_channel(team_id, name, display_name, ChannelType::Private, purpose, header)
    }

    pub fn create_direct_message_channel(
        &self,
        current_user_id: &str,
        other_user_id: &str,
    ) -> Result<Channel, ApiError> {
        decode(self.client.post(
            &format!("{ENDPOINT}/direct"),
            Some(&json!([current_user_id, other_user_id])),
        )?)
    }

    pub fn create_group_message_channel<S: AsRef<str>>(&self, user_ids: &[S]) -> Result<Channel, ApiError> {
        let ids: Vec<&str> = user_ids.iter().map(AsRef::as_ref).collect();
        decode(self.client.post(&format!("{ENDPOINT}/group"), Some(&json!(ids)))?)
    }

    pub fn get_list_of_channels_by_ids<S: AsRef<str>>(
        &self,
        team_id: &str,
        channel_ids: &[S],
    ) -> Result<Vec<Channel>, ApiError> {
        let ids: Vec<&str> = channel_ids.iter().map(AsRef::as_ref).collect();
        decode(self.client.post(
            &format!("{}/{team_id}/channels/ids", teams::ENDPOINT),
            Some(&json!(ids)),
        )?)
    }

    pub fn get_channel(&self, channel_id: &str) -> Result<Channel, ApiError> {
        decode(self.client.get(&format!("{ENDPOINT}/{channel_id}"), None)?)
    }

    pub fn update_channel(&self, channel_id: &str, options: &Value) -> Result<Channel, ApiError> {
        decode(self.client.put(&format!("{ENDPOINT}/{channel_id}"), Some(options))?)
    }

    pub fn patch_channel(&self, channel_id: &str, options: &Value) -> Result<Channel, ApiError> {
        decode(
            self.client
                .put(&format!("{ENDPOINT}/{channel_id}/patch"), Some(options))?,
        )
    }

    pub fn delete_channel(&self, channel_id: &str) -> Result<Value, ApiError> {
        self.client.delete(&format!("{ENDPOINT}/{channel_id}"), None)
    }

    pub fn restore_channel(&self, channel_id: &str) -> Result<Channel, ApiError> {
        decode(
            self.client
                .post(&format!("{ENDPOINT}/{channel_id}/restore"), None)?,
        )
    }

    pub fn get_channel_statistics(&self, channel_id: &str) -> Result<Value, ApiError> {
        self.client.get(&format!("{ENDPOINT}/{channel_id}/stats"), None)
    }

    pub fn get_channel_pinned_posts(&self, channel_id: &str) -> Result<PostList, ApiError> {
        decode(self.client.get(&format!("{ENDPOINT}/{channel_id}/pinned"), None)?)
    }

    pub fn get_channel_by_name(
        &self,
        team: &Team,
        channel_name: &str,
        include_deleted: bool,
    ) -> Result<Channel, ApiError> {
        let params = Query::new().with("include_deleted", include_deleted);
        decode(self.client.get(
            &format!("{}/{}/channels/name/{channel_name}", teams::ENDPOINT, team.id),
            Some(&params),
        )?)
    }

    /// One page of channel members, resolved to users with a batch lookup.
    pub fn get_channel_members(&self, channel: &Channel, page: Pagination) -> Result<Vec<User>, ApiError> {
        let members: Vec<MemberRef> = decode(self.client.get(
            &format!("{ENDPOINT}/{}/members", channel.id),
            Some(&page.to_query()),
        )?)?;
        let ids: Vec<String> = members.into_iter().map(|m| m.user_id).collect();
        tracing::debug!(channel_id = %channel.id, count = ids.len(), "resolving channel members");
        self.users.get_users_by_ids(&ids)
    }

    /// Add a user to a channel. `post_root_id` ties the join message to a
    /// thread.
    pub fn add_user(
        &self,
        channel_id: &str,
        user_id: &str,
        post_root_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.client.post(
            &format!("{ENDPOINT}/{channel_id}/members"),
            Some(&json!({ "user_id": user_id, "post_root_id": post_root_id })),
        )
    }

    pub fn get_channel_members_by_ids<S: AsRef<str>>(
        &self,
        channel_id: &str,
        user_ids: &[S],
    ) -> Result<Value, ApiError> {
        let ids: Vec<&str> = user_ids.iter().map(AsRef::as_ref).collect();
        self.client
            .post(&format!("{ENDPOINT}/{channel_id}/members/ids"), Some(&json!(ids)))
    }

    pub fn get_channel_member(&self, channel_id: &str, user_id: &str) -> Result<Value, ApiError> {
        self.client
            .get(&format!("{ENDPOINT}/{channel_id}/members/{user_id}"), None)
    }

    pub fn remove_channel_member(&self, channel_id: &str, user_id: &str) -> Result<Value, ApiError> {
        self.client
            .delete(&format!("{ENDPOINT}/{channel_id}/members/{user_id}"), None)
    }

    pub fn update_channel_roles(
        &self,
        channel_id: &str,
        user_id: &str,
        roles: &str,
    ) -> Result<Value, ApiError> {
        self.client.put(
            &format!("{ENDPOINT}/{channel_id}/members/{user_id}/roles"),
            Some(&json!({ "roles": roles })),
        )
    }

    pub fn update_scheme_derived_roles_of_channel_member(
        &self,
        channel_id: &str,
        user_id: &str,
        options: &Value,
    ) -> Result<Value, ApiError> {
        self.client.put(
            &format!("{ENDPOINT}/{channel_id}/members/{user_id}/schemeRoles"),
            Some(options),
        )
    }

    pub fn update_channel_notifications(
        &self,
        channel_id: &str,
        user_id: &str,
        options: &Value,
    ) -> Result<Value, ApiError> {
        self.client.put(
            &format!("{ENDPOINT}/{channel_id}/members/{user_id}/notify_props"),
            Some(options),
        )
    }

    /// Mark a channel as viewed; `options` carries `channel_id` and
    /// optionally `prev_channel_id`.
    pub fn view_channel(&self, user_id: &str, options: &Value) -> Result<Value, ApiError> {
        self.client
            .post(&format!("{ENDPOINT}/members/{user_id}/view"), Some(options))
    }

    pub fn get_channel_members_for_user(&self, user_id: &str, team_id: &str) -> Result<Value, ApiError> {
        self.client.get(
            &format!("{}/{user_id}/teams/{team_id}/channels/members", users::ENDPOINT),
            None,
        )
    }

    pub fn get_channels_for_user(&self, user_id: &str, team_id: &str) -> Result<Vec<Channel>, ApiError> {
        decode(self.client.get(
            &format!("{}/{user_id}/teams/{team_id}/channels", users::ENDPOINT),
            None,
        )?)
    }

    pub fn get_unread_messages(&self, user_id: &str, channel_id: &str) -> Result<Value, ApiError> {
        self.client.get(
            &format!("{}/{user_id}/channels/{channel_id}/unread", users::ENDPOINT),
            None,
        )
    }

    pub fn get_public_channels(&self, team: &Team, page: Pagination) -> Result<Vec<Channel>, ApiError> {
        decode(self.client.get(
            &format!("{}/{}/channels", teams::ENDPOINT, team.id),
            Some(&page.to_query()),
        )?)
    }

    pub fn get_deleted_channels(&self, team: &Team, page: Pagination) -> Result<Vec<Channel>, ApiError> {
        decode(self.client.get(
            &format!("{}/{}/channels/deleted", teams::ENDPOINT, team.id),
            Some(&page.to_query()),
        )?)
    }

    pub fn search_channels(&self, team_id: &str, options: &Value) -> Result<Vec<Channel>, ApiError> {
        decode(self.client.post(
            &format!("{}/{team_id}/channels/search", teams::ENDPOINT),
            Some(options),
        )?)
    }

    /// `params` carries the `name` prefix to complete.
    pub fn autocomplete_channels(&self, team_id: &str, params: &Query) -> Result<Vec<Channel>, ApiError> {
        decode(self.client.get(
            &format!("{}/{team_id}/channels/autocomplete", teams::ENDPOINT),
            Some(params),
        )?)
    }

    pub fn set_channel_scheme(&self, channel_id: &str, scheme_id: &str) -> Result<Value, ApiError> {
        self.client.put(
            &format!("{ENDPOINT}/{channel_id}/scheme"),
            Some(&json!({ "scheme_id": scheme_id })),
        )
    }

    /// Convert a public channel to private.
    pub fn convert_channel(&self, channel_id: &str) -> Result<Value, ApiError> {
        self.client.post(&format!("{ENDPOINT}/{channel_id}/convert"), None)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::RecordingTransport;

    fn team(id: &str) -> Team {
        decode(json!({"id": id})).unwrap()
    }

    fn channel(id: &str) -> Channel {
        decode(json!({"id": id, "name": "town-square"})).unwrap()
    }

    #[test]
    fn create_public_channel_forwards_purpose_and_header() {
        let transport = RecordingTransport::new().respond(json!({
            "id": "c1", "name": "ops", "display_name": "Ops", "type": "O"
        }));
        let created = Channels::new(&transport)
            .create_public_channel("t1", "ops", "Ops", Some("x"), Some("y"))
            .unwrap();
        assert_eq!(created.id, "c1");
        let call = transport.last();
        assert_eq!(call.path, "/channels");
        assert_eq!(
            call.body,
            Some(json!({
                "team_id": "t1",
                "name": "ops",
                "display_name": "Ops",
                "purpose": "x",
                "header": "y",
                "type": "O"
            }))
        );
    }

    #[test]
    fn create_private_channel_uses_private_type() {
        let transport = RecordingTransport::new().respond(json!({"id": "c2"}));
        Channels::new(&transport)
            .create_private_channel("t1", "sec", "Sec", None, Some("hdr"))
            .unwrap();
        let body = transport.last().body.unwrap();
        assert_eq!(body["type"], "P");
        assert_eq!(body["purpose"], Value::Null);
        assert_eq!(body["header"], "hdr");
    }

    #[test]
    fn direct_and_group_channels() {
        let transport = RecordingTransport::new()
            .respond(json!({"id": "dm", "type": "D"}))
            .respond(json!({"id": "gm", "type": "G"}));
        let channels = Channels::new(&transport);
        let dm = channels.create_direct_message_channel("u1", "u2").unwrap();
        assert_eq!(dm.channel_type, ChannelType::Direct);
        let gm = channels.create_group_message_channel(&["u1", "u2", "u3"]).unwrap();
        assert_eq!(gm.channel_type, ChannelType::Group);
        let calls = transport.calls();
        assert_eq!(calls[0].path, "/channels/direct");
        assert_eq!(calls[0].body, Some(json!(["u1", "u2"])));
        assert_eq!(calls[1].path, "/channels/group");
        assert_eq!(calls[1].body, Some(json!(["u1", "u2", "u3"])));
    }

    #[test]
    fn channels_by_ids_use_team_prefix() {
        let transport = RecordingTransport::new().respond(json!([{"id": "c1"}, {"id": "c2"}]));
        let found = Channels::new(&transport)
            .get_list_of_channels_by_ids("t1", &["c1", "c2"])
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(transport.last().path, "/teams/t1/channels/ids");
    }

    #[test]
    fn channel_by_name_keeps_name_verbatim() {
        let transport = RecordingTransport::new().respond(json!({"id": "c1"}));
        Channels::new(&transport)
            .get_channel_by_name(&team("t1"), "café?#", false)
            .unwrap();
        let call = transport.last();
        assert_eq!(call.path, "/teams/t1/channels/name/café?#");
        assert_eq!(call.params.unwrap().get("include_deleted"), Some("false"));
    }

    #[test]
    fn members_are_resolved_through_users() {
        let transport = RecordingTransport::new()
            .respond(json!([{"channel_id": "c1", "user_id": "u9"}]))
            .respond(json!([{"id": "u9", "username": "nine"}]));
        let members = Channels::new(&transport)
            .get_channel_members(&channel("c1"), Pagination::default())
            .unwrap();
        assert_eq!(members[0].username, "nine");
        let calls = transport.calls();
        let params = calls[0].params.as_ref().unwrap();
        assert_eq!(params.get("page"), Some("0"));
        assert_eq!(params.get("per_page"), Some("1024"));
        assert_eq!(calls[1].path, "/users/ids");
    }

    #[test]
    fn empty_member_page_skips_user_lookup() {
        let transport = RecordingTransport::new().respond(json!([]));
        let members = Channels::new(&transport)
            .get_channel_members(&channel("c1"), Pagination::page(5))
            .unwrap();
        assert!(members.is_empty());
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn listing_defaults_to_1024_per_page() {
        let transport = RecordingTransport::new()
            .respond(json!([{"id": "c1"}]))
            .respond(json!([]));
        let channels = Channels::new(&transport);
        channels.get_public_channels(&team("t1"), Pagination::default()).unwrap();
        channels.get_deleted_channels(&team("t1"), Pagination::default()).unwrap();
        for call in transport.calls() {
            let params = call.params.unwrap();
            assert_eq!(params.get("page"), Some("0"));
            assert_eq!(params.get("per_page"), Some("1024"));
        }
        let paths: Vec<String> = transport.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, ["/teams/t1/channels", "/teams/t1/channels/deleted"]);
    }

    #[test]
    fn add_user_sends_null_root_when_absent() {
        let transport = RecordingTransport::new();
        Channels::new(&transport).add_user("c1", "u1", None).unwrap();
        let call = transport.last();
        assert_eq!(call.path, "/channels/c1/members");
        assert_eq!(call.body, Some(json!({"user_id": "u1", "post_root_id": null})));
    }

    #[test]
    fn member_management_paths() {
        let transport = RecordingTransport::new();
        let channels = Channels::new(&transport);
        channels.get_channel_member("c1", "u1").unwrap();
        channels.remove_channel_member("c1", "u1").unwrap();
        channels.update_channel_roles("c1", "u1", "channel_user").unwrap();
        channels
            .update_scheme_derived_roles_of_channel_member("c1", "u1", &json!({"scheme_user": true}))
            .unwrap();
        channels
            .update_channel_notifications("c1", "u1", &json!({"desktop": "mention"}))
            .unwrap();
        channels.get_channel_members_by_ids("c1", &["u1"]).unwrap();
        channels.view_channel("u1", &json!({"channel_id": "c1"})).unwrap();

        let calls = transport.calls();
        let summary: Vec<(HttpMethod, &str)> =
            calls.iter().map(|c| (c.method, c.path.as_str())).collect();
        assert_eq!(
            summary,
            [
                (HttpMethod::Get, "/channels/c1/members/u1"),
                (HttpMethod::Delete, "/channels/c1/members/u1"),
                (HttpMethod::Put, "/channels/c1/members/u1/roles"),
                (HttpMethod::Put, "/channels/c1/members/u1/schemeRoles"),
                (HttpMethod::Put, "/channels/c1/members/u1/notify_props"),
                (HttpMethod::Post, "/channels/c1/members/ids"),
                (HttpMethod::Post, "/channels/members/u1/view"),
            ]
        );
        assert_eq!(calls[2].body, Some(json!({"roles": "channel_user"})));
    }

    #[test]
    fn user_scoped_queries() {
        let transport = RecordingTransport::new()
            .respond(json!([]))
            .respond(json!([{"id": "c1", "team_id": "t1"}]))
            .respond(json!({"msg_count": 3}));
        let channels = Channels::new(&transport);
        channels.get_channel_members_for_user("u1", "t1").unwrap();
        let mine = channels.get_channels_for_user("u1", "t1").unwrap();
        assert_eq!(mine[0].team_id, "t1");
        let unread = channels.get_unread_messages("u1", "c1").unwrap();
        assert_eq!(unread["msg_count"], 3);
        let paths: Vec<String> = transport.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(
            paths,
            [
                "/users/u1/teams/t1/channels/members",
                "/users/u1/teams/t1/channels",
                "/users/u1/channels/c1/unread"
            ]
        );
    }

    #[test]
    fn lifecycle_paths() {
        let transport = RecordingTransport::new()
            .respond(json!({"id": "c1", "purpose": "new"}))
            .respond(json!({"id": "c1", "header": "h"}))
            .respond(json!({"status": "OK"}))
            .respond(json!({"id": "c1"}));
        let channels = Channels::new(&transport);
        let updated = channels.update_channel("c1", &json!({"id": "c1", "purpose": "new"})).unwrap();
        assert_eq!(updated.purpose, "new");
        let patched = channels.patch_channel("c1", &json!({"header": "h"})).unwrap();
        assert_eq!(patched.header, "h");
        assert_eq!(channels.delete_channel("c1").unwrap(), json!({"status": "OK"}));
        channels.restore_channel("c1").unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].path, "/channels/c1");
        assert_eq!(calls[1].path, "/channels/c1/patch");
        assert_eq!(calls[2].method, HttpMethod::Delete);
        assert_eq!(calls[3].path, "/channels/c1/restore");
    }

    #[test]
    fn search_and_autocomplete() {
        let transport = RecordingTransport::new()
            .respond(json!([{"id": "c1"}]))
            .respond(json!([{"id": "c2"}]));
        let channels = Channels::new(&transport);
        channels.search_channels("t1", &json!({"term": "ops"})).unwrap();
        let params = Query::new().with("name", "op");
        let completed = channels.autocomplete_channels("t1", &params).unwrap();
        assert_eq!(completed[0].id, "c2");
        let calls = transport.calls();
        assert_eq!(calls[0].path, "/teams/t1/channels/search");
        assert_eq!(calls[1].path, "/teams/t1/channels/autocomplete");
        assert_eq!(calls[1].params.as_ref().unwrap().get("name"), Some("op"));
    }

    #[test]
    fn pinned_posts_decode_as_list() {
        let transport = RecordingTransport::new().respond(json!({
            "order": ["p1"],
            "posts": {"p1": {"id": "p1", "is_pinned": true}}
        }));
        let pinned = Channels::new(&transport).get_channel_pinned_posts("c1").unwrap();
        assert!(pinned.ordered()[0].is_pinned);
        assert_eq!(transport.last().path, "/channels/c1/pinned");
    }

    #[test]
    fn scheme_stats_and_convert() {
        let transport = RecordingTransport::new();
        let channels = Channels::new(&transport);
        channels.set_channel_scheme("c1", "s1").unwrap();
        assert_eq!(transport.last().path, "/channels/c1/scheme");
        assert_eq!(transport.last().body, Some(json!({"scheme_id": "s1"})));
        channels.get_channel_statistics("c1").unwrap();
        assert_eq!(transport.last().path, "/channels/c1/stats");
        channels.convert_channel("c1").unwrap();
        assert_eq!(transport.last().path, "/channels/c1/convert");
        assert_eq!(transport.last().method, HttpMethod::Post);
    }
}
