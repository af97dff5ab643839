// sendgrid-api/src/resources/custom_fields.rs
use super::{execute, fetch, fetch_property};
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::types::{CustomFieldDefinition, FieldType, ReservedField};
use serde::Serialize;

const ENDPOINT: &str = "contactdb/custom_fields";
const RESERVED_ENDPOINT: &str = "contactdb/reserved_fields";

#[derive(Serialize)]
struct CreatePayload<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    field_type: FieldType,
}

/// Custom field definitions for Contact DB recipients
pub struct CustomFields<'a, C: HttpClient + ?Sized> {
    http: &'a C,
}

impl<'a, C: HttpClient + ?Sized> CustomFields<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    pub async fn create(
        &self,
        name: &str,
        field_type: FieldType,
        on_behalf_of: Option<&str>,
    ) -> Result<CustomFieldDefinition> {
        let request = ApiRequest::post(ENDPOINT)
            .json(&CreatePayload { name, field_type })?
            .on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    pub async fn list(&self, on_behalf_of: Option<&str>) -> Result<Vec<CustomFieldDefinition>> {
        let request = ApiRequest::get(ENDPOINT).on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "custom_fields").await
    }

    pub async fn get(
        &self,
        field_id: u64,
        on_behalf_of: Option<&str>,
    ) -> Result<CustomFieldDefinition> {
        let request =
            ApiRequest::get(format!("{}/{}", ENDPOINT, field_id)).on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    pub async fn delete(&self, field_id: u64, on_behalf_of: Option<&str>) -> Result<()> {
        let request =
            ApiRequest::delete(format!("{}/{}", ENDPOINT, field_id)).on_behalf_of(on_behalf_of);
        execute(self.http, request).await
    }

    /// Built-in fields such as `email` and `last_clicked`
    pub async fn reserved(&self, on_behalf_of: Option<&str>) -> Result<Vec<ReservedField>> {
        let request = ApiRequest::get(RESERVED_ENDPOINT).on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "reserved_fields").await
    }
}
