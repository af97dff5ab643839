// sendgrid-api/src/resources/contact_lists.rs
use super::{execute, fetch, fetch_property};
use crate::error::Result;
use crate::http::{encode_segment, ApiRequest, HttpClient};
use crate::types::{Contact, ContactList, PageOptions};
use serde_json::json;

const ENDPOINT: &str = "contactdb/lists";

/// Contact DB lists and their memberships
pub struct ContactLists<'a, C: HttpClient + ?Sized> {
    http: &'a C,
}

impl<'a, C: HttpClient + ?Sized> ContactLists<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    pub async fn create(&self, name: &str, on_behalf_of: Option<&str>) -> Result<ContactList> {
        let request = ApiRequest::post(ENDPOINT)
            .json(&json!({ "name": name }))?
            .on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    pub async fn list(&self, on_behalf_of: Option<&str>) -> Result<Vec<ContactList>> {
        let request = ApiRequest::get(ENDPOINT).on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "lists").await
    }

    pub async fn get(&self, list_id: u64, on_behalf_of: Option<&str>) -> Result<ContactList> {
        let request =
            ApiRequest::get(format!("{}/{}", ENDPOINT, list_id)).on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    /// Rename a list
    pub async fn update(
        &self,
        list_id: u64,
        name: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<ContactList> {
        let request = ApiRequest::patch(format!("{}/{}", ENDPOINT, list_id))
            .json(&json!({ "name": name }))?
            .on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    /// Delete a list; with `delete_contacts` its recipients go too
    pub async fn delete(
        &self,
        list_id: u64,
        delete_contacts: bool,
        on_behalf_of: Option<&str>,
    ) -> Result<()> {
        let request = ApiRequest::delete(format!("{}/{}", ENDPOINT, list_id))
            .query("delete_contacts", delete_contacts)
            .on_behalf_of(on_behalf_of);
        execute(self.http, request).await
    }

    pub async fn recipients(
        &self,
        list_id: u64,
        options: PageOptions,
        on_behalf_of: Option<&str>,
    ) -> Result<Vec<Contact>> {
        let request = ApiRequest::get(format!("{}/{}/recipients", ENDPOINT, list_id))
            .query("page_size", options.page_size)
            .query("page", options.page)
            .on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "recipients").await
    }

    pub async fn add_recipient(
        &self,
        list_id: u64,
        contact_id: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<()> {
        let path = membership_path(list_id, contact_id);
        let request = ApiRequest::post(path).on_behalf_of(on_behalf_of);
        execute(self.http, request).await
    }

    pub async fn add_recipients(
        &self,
        list_id: u64,
        contact_ids: &[String],
        on_behalf_of: Option<&str>,
    ) -> Result<()> {
        if contact_ids.is_empty() {
            return Ok(());
        }

        let request = ApiRequest::post(format!("{}/{}/recipients", ENDPOINT, list_id))
            .json(contact_ids)?
            .on_behalf_of(on_behalf_of);
        execute(self.http, request).await
    }

    pub async fn remove_recipient(
        &self,
        list_id: u64,
        contact_id: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<()> {
        let request =
            ApiRequest::delete(membership_path(list_id, contact_id)).on_behalf_of(on_behalf_of);
        execute(self.http, request).await
    }
}

fn membership_path(list_id: u64, contact_id: &str) -> String {
    format!("{}/{}/recipients/{}", ENDPOINT, list_id, encode_segment(contact_id))
}
