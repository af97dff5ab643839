// sendgrid-api/src/resources/teammates.rs
use super::{execute, fetch, fetch_property};
use crate::error::Result;
use crate::http::{encode_segment, ApiRequest, HttpClient};
use crate::types::{AccessRequest, ListOptions, Teammate, TeammateInvitation};
use serde::Serialize;

const ENDPOINT: &str = "teammates";
const SCOPES_ENDPOINT: &str = "scopes";
const READ_ONLY_SUFFIX: &str = ".read";

#[derive(Serialize)]
struct InvitePayload<'a> {
    email: &'a str,
    scopes: &'a [String],
    is_admin: bool,
}

#[derive(Serialize)]
struct PermissionsPayload<'a> {
    scopes: &'a [String],
    is_admin: bool,
}

/// Teammates, their invitations and scope access requests
pub struct Teammates<'a, C: HttpClient + ?Sized> {
    http: &'a C,
}

impl<'a, C: HttpClient + ?Sized> Teammates<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// List teammates, `limit`/`offset` paged
    pub async fn list(
        &self,
        options: ListOptions,
        on_behalf_of: Option<&str>,
    ) -> Result<Vec<Teammate>> {
        let request = ApiRequest::get(ENDPOINT)
            .query("limit", options.limit)
            .query("offset", options.offset)
            .on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "result").await
    }

    pub async fn get(&self, username: &str, on_behalf_of: Option<&str>) -> Result<Teammate> {
        let request = ApiRequest::get(format!("{}/{}", ENDPOINT, encode_segment(username)))
            .on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    /// Replace a teammate's scopes. Admins ignore `scopes` server-side.
    pub async fn update_permissions(
        &self,
        username: &str,
        scopes: &[String],
        is_admin: bool,
        on_behalf_of: Option<&str>,
    ) -> Result<Teammate> {
        let request = ApiRequest::patch(format!("{}/{}", ENDPOINT, encode_segment(username)))
            .json(&PermissionsPayload { scopes, is_admin })?
            .on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    pub async fn delete(&self, username: &str, on_behalf_of: Option<&str>) -> Result<()> {
        let request = ApiRequest::delete(format!("{}/{}", ENDPOINT, encode_segment(username)))
            .on_behalf_of(on_behalf_of);
        execute(self.http, request).await
    }

    /// Invite a teammate with the given scopes
    pub async fn invite(
        &self,
        email: &str,
        scopes: &[String],
        on_behalf_of: Option<&str>,
    ) -> Result<TeammateInvitation> {
        self.send_invitation(email, scopes, false, on_behalf_of).await
    }

    /// Invite a teammate with full admin rights
    pub async fn invite_admin(
        &self,
        email: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<TeammateInvitation> {
        self.send_invitation(email, &[], true, on_behalf_of).await
    }

    /// Invite a teammate with every `*.read` scope the caller holds
    pub async fn invite_read_only(
        &self,
        email: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<TeammateInvitation> {
        let scopes: Vec<String> = self
            .scopes(on_behalf_of)
            .await?
            .into_iter()
            .filter(|s| s.ends_with(READ_ONLY_SUFFIX))
            .collect();
        self.send_invitation(email, &scopes, false, on_behalf_of).await
    }

    async fn send_invitation(
        &self,
        email: &str,
        scopes: &[String],
        is_admin: bool,
        on_behalf_of: Option<&str>,
    ) -> Result<TeammateInvitation> {
        let request = ApiRequest::post(ENDPOINT)
            .json(&InvitePayload {
                email,
                scopes,
                is_admin,
            })?
            .on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    pub async fn pending_invitations(
        &self,
        on_behalf_of: Option<&str>,
    ) -> Result<Vec<TeammateInvitation>> {
        let request = ApiRequest::get(format!("{}/pending", ENDPOINT)).on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "result").await
    }

    /// Resend an invitation; the server restarts its 7 day expiry
    pub async fn resend_invitation(
        &self,
        token: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<TeammateInvitation> {
        let path = format!("{}/pending/{}/resend", ENDPOINT, encode_segment(token));
        let request = ApiRequest::post(path).on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    pub async fn delete_invitation(&self, token: &str, on_behalf_of: Option<&str>) -> Result<()> {
        let path = format!("{}/pending/{}", ENDPOINT, encode_segment(token));
        let request = ApiRequest::delete(path).on_behalf_of(on_behalf_of);
        execute(self.http, request).await
    }

    /// Pending requests from teammates for additional scopes
    pub async fn access_requests(
        &self,
        options: ListOptions,
        on_behalf_of: Option<&str>,
    ) -> Result<Vec<AccessRequest>> {
        let request = ApiRequest::get(format!("{}/requests", SCOPES_ENDPOINT))
            .query("limit", options.limit)
            .query("offset", options.offset)
            .on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    /// Approve an access request, returning the granted scope group name
    pub async fn approve_access_request(
        &self,
        request_id: u64,
        on_behalf_of: Option<&str>,
    ) -> Result<String> {
        let path = format!("{}/requests/{}/approve", SCOPES_ENDPOINT, request_id);
        let request = ApiRequest::patch(path).on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "scope_group_name").await
    }

    pub async fn deny_access_request(
        &self,
        request_id: u64,
        on_behalf_of: Option<&str>,
    ) -> Result<()> {
        let request = ApiRequest::delete(format!("{}/requests/{}", SCOPES_ENDPOINT, request_id))
            .on_behalf_of(on_behalf_of);
        execute(self.http, request).await
    }

    /// Scopes granted to the calling API key
    pub async fn scopes(&self, on_behalf_of: Option<&str>) -> Result<Vec<String>> {
        let request = ApiRequest::get(SCOPES_ENDPOINT).on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "scopes").await
    }
}
