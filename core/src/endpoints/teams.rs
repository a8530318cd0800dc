use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode, to_options, users, Endpoint, Pagination, Users};
use crate::error::ApiError;
use crate::http::{FilePart, MultipartForm, Query};
use crate::models::{CreateTeam, Team, TeamType, User};
use crate::transport::Transport;

pub const ENDPOINT: &str = "/teams";

/// `/teams` endpoint group.
#[derive(Clone, Copy)]
pub struct Teams<'a> {
    client: &'a dyn Transport,
    users: Users<'a>,
}

impl<'a> Endpoint<'a> for Teams<'a> {
    const ENDPOINT: &'static str = ENDPOINT;

    fn new(client: &'a dyn Transport) -> Self {
        Self {
            client,
            users: Users::new(client),
        }
    }
}

#[derive(Deserialize)]
struct TeamsWithCount {
    #[serde(default)]
    teams: Vec<Team>,
    #[serde(default)]
    total_count: i64,
}

/// `/teams/search` answers with a plain list, or with the counted envelope
/// when the request pages.
#[derive(Deserialize)]
#[serde(untagged)]
enum TeamSearch {
    Plain(Vec<Team>),
    Paged(TeamsWithCount),
}

#[derive(Deserialize)]
struct MemberRef {
    user_id: String,
}

impl<'a> Teams<'a> {
    pub fn create_team(
        &self,
        name: &str,
        display_name: &str,
        team_type: TeamType,
    ) -> Result<Team, ApiError> {
        let body = to_options(&CreateTeam {
            name: name.to_string(),
            display_name: display_name.to_string(),
            team_type,
        })?;
        decode(self.client.post(ENDPOINT, Some(&body))?)
    }

    pub fn get_teams(&self, page: Pagination) -> Result<Vec<Team>, ApiError> {
        let params = page.to_query().with("include_total_count", false);
        decode(self.client.get(ENDPOINT, Some(&params))?)
    }

    /// Like `get_teams`, but asks the server for the total team count too.
    pub fn get_teams_with_total_count(&self, page: Pagination) -> Result<(Vec<Team>, i64), ApiError> {
        let params = page.to_query().with("include_total_count", true);
        let page: TeamsWithCount = decode(self.client.get(ENDPOINT, Some(&params))?)?;
        Ok((page.teams, page.total_count))
    }

    pub fn get_team(&self, team_id: &str) -> Result<Team, ApiError> {
        decode(self.client.get(&format!("{ENDPOINT}/{team_id}"), None)?)
    }

    /// Full replace: fields missing from `options` are reset server-side.
    pub fn update_team(&self, team_id: &str, options: &Value) -> Result<Team, ApiError> {
        decode(self.client.put(&format!("{ENDPOINT}/{team_id}"), Some(options))?)
    }

    /// Partial update: only fields present in `options` change.
    pub fn patch_team(&self, team_id: &str, options: &Value) -> Result<Team, ApiError> {
        decode(
            self.client
                .put(&format!("{ENDPOINT}/{team_id}/patch"), Some(options))?,
        )
    }

    /// Soft-deletes unless `params` carries `permanent=true`.
    pub fn delete_team(&self, team_id: &str, params: Option<&Query>) -> Result<Value, ApiError> {
        self.client.delete(&format!("{ENDPOINT}/{team_id}"), params)
    }

    pub fn get_team_by_name(&self, name: &str) -> Result<Team, ApiError> {
        decode(self.client.get(&format!("{ENDPOINT}/name/{name}"), None)?)
    }

    /// `options` carries `term` and optionally `page`/`per_page`. Either
    /// answer shape yields the matching teams.
    pub fn search_teams(&self, options: &Value) -> Result<Vec<Team>, ApiError> {
        let found: TeamSearch = decode(self.client.post(&format!("{ENDPOINT}/search"), Some(options))?)?;
        Ok(match found {
            TeamSearch::Plain(teams) => teams,
            TeamSearch::Paged(page) => page.teams,
        })
    }

    pub fn check_team_exists(&self, name: &str) -> Result<Value, ApiError> {
        self.client.get(&format!("{ENDPOINT}/name/{name}/exists"), None)
    }

    pub fn get_user_teams(&self, user_id: &str) -> Result<Vec<Team>, ApiError> {
        decode(
            self.client
                .get(&format!("{}/{user_id}/teams", users::ENDPOINT), None)?,
        )
    }

    /// One page of team members, resolved to users with a batch lookup.
    pub fn get_team_members(&self, team: &Team, page: Pagination) -> Result<Vec<User>, ApiError> {
        let members: Vec<MemberRef> = decode(self.client.get(
            &format!("{ENDPOINT}/{}/members", team.id),
            Some(&page.to_query()),
        )?)?;
        let ids: Vec<String> = members.into_iter().map(|m| m.user_id).collect();
        tracing::debug!(team_id = %team.id, count = ids.len(), "resolving team members");
        self.users.get_users_by_ids(&ids)
    }

    pub fn add_user_to_team(&self, team_id: &str, options: &Value) -> Result<Value, ApiError> {
        self.client
            .post(&format!("{ENDPOINT}/{team_id}/members"), Some(options))
    }

    /// Join a team through an invite; `params` carries `token` or `invite_id`.
    pub fn add_user_to_team_from_invite(&self, params: &Query) -> Result<Value, ApiError> {
        let path = if params.is_empty() {
            format!("{ENDPOINT}/members/invite")
        } else {
            format!("{ENDPOINT}/members/invite?{}", params.encode())
        };
        self.client.post(&path, None)
    }

    pub fn add_multiple_users_to_team(&self, team_id: &str, options: &Value) -> Result<Value, ApiError> {
        self.client
            .post(&format!("{ENDPOINT}/{team_id}/members/batch"), Some(options))
    }

    pub fn get_team_members_for_user(&self, user_id: &str) -> Result<Value, ApiError> {
        self.client
            .get(&format!("{}/{user_id}/teams/members", users::ENDPOINT), None)
    }

    pub fn get_team_member(&self, team_id: &str, user_id: &str) -> Result<Value, ApiError> {
        self.client
            .get(&format!("{ENDPOINT}/{team_id}/members/{user_id}"), None)
    }

    pub fn remove_user_from_team(&self, team_id: &str, user_id: &str) -> Result<Value, ApiError> {
        self.client
            .delete(&format!("{ENDPOINT}/{team_id}/members/{user_id}"), None)
    }

    pub fn get_team_members_by_id<S: AsRef<str>>(
        &self,
        team_id: &str,
        user_ids: &[S],
    ) -> Result<Value, ApiError> {
        let ids: Vec<&str> = user_ids.iter().map(AsRef::as_ref).collect();
        self.client
            .post(&format!("{ENDPOINT}/{team_id}/members/ids"), Some(&json!(ids)))
    }

    pub fn get_team_stats(&self, team_id: &str) -> Result<Value, ApiError> {
        self.client.get(&format!("{ENDPOINT}/{team_id}/stats"), None)
    }

    /// `roles` is a space-separated role list, e.g. `"team_user team_admin"`.
    pub fn update_team_member_roles(
        &self,
        team_id: &str,
        user_id: &str,
        roles: &str,
    ) -> Result<Value, ApiError> {
        self.client.put(
            &format!("{ENDPOINT}/{team_id}/members/{user_id}/roles"),
            Some(&json!({ "roles": roles })),
        )
    }

    pub fn update_scheme_derived_roles_of_team_member(
        &self,
        team_id: &str,
        user_id: &str,
        options: &Value,
    ) -> Result<Value, ApiError> {
        self.client.put(
            &format!("{ENDPOINT}/{team_id}/members/{user_id}/schemeRoles"),
            Some(options),
        )
    }

    pub fn get_team_unreads_for_user(
        &self,
        user_id: &str,
        params: Option<&Query>,
    ) -> Result<Value, ApiError> {
        self.client
            .get(&format!("{}/{user_id}/teams/unread", users::ENDPOINT), params)
    }

    pub fn get_unreads_for_team(&self, user_id: &str, team_id: &str) -> Result<Value, ApiError> {
        self.client.get(
            &format!("{}/{user_id}/teams/{team_id}/unread", users::ENDPOINT),
            None,
        )
    }

    pub fn invite_users_to_team_by_mail<S: AsRef<str>>(
        &self,
        team_id: &str,
        emails: &[S],
    ) -> Result<Value, ApiError> {
        let emails: Vec<&str> = emails.iter().map(AsRef::as_ref).collect();
        self.client.post(
            &format!("{ENDPOINT}/{team_id}/invite/email"),
            Some(&json!(emails)),
        )
    }

    /// Upload an export from another chat application (`import_from` is
    /// e.g. `"slack"`).
    pub fn import_team_from_other_app(
        &self,
        team_id: &str,
        file: FilePart,
        import_from: &str,
    ) -> Result<Value, ApiError> {
        let form = MultipartForm::new()
            .text("filesize", file.data.len())
            .text("importFrom", import_from)
            .file("file", file);
        self.client
            .post_multipart(&format!("{ENDPOINT}/{team_id}/import"), &form)
    }

    pub fn get_invite_info_for_team(&self, invite_id: &str) -> Result<Value, ApiError> {
        self.client.get(&format!("{ENDPOINT}/invite/{invite_id}"), None)
    }

    /// Raw image bytes.
    pub fn get_team_icon(&self, team_id: &str) -> Result<Vec<u8>, ApiError> {
        self.client.get_bytes(&format!("{ENDPOINT}/{team_id}/image"))
    }

    pub fn set_team_icon(&self, team_id: &str, image: FilePart) -> Result<Value, ApiError> {
        let form = MultipartForm::new().file("image", image);
        self.client
            .post_multipart(&format!("{ENDPOINT}/{team_id}/image"), &form)
    }

    pub fn delete_team_icon(&self, team_id: &str) -> Result<Value, ApiError> {
        self.client.delete(&format!("{ENDPOINT}/{team_id}/image"), None)
    }

    pub fn set_team_scheme(&self, team_id: &str, scheme_id: &str) -> Result<Value, ApiError> {
        self.client.put(
            &format!("{ENDPOINT}/{team_id}/scheme"),
            Some(&json!({ "scheme_id": scheme_id })),
        )
    }
}
