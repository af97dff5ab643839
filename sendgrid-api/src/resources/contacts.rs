// sendgrid-api/src/resources/contacts.rs
use super::{execute, fetch, fetch_property};
use crate::error::{Result, SendGridError};
use crate::http::{encode_segment, ApiRequest, HttpClient};
use crate::types::{
    Contact, ContactList, ContactUpsert, ImportResult, PageOptions, SearchCondition,
};
use serde::Serialize;

const ENDPOINT: &str = "contactdb/recipients";

#[derive(Serialize)]
struct SearchPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    list_id: Option<u64>,
    conditions: &'a [SearchCondition],
}

/// Contact DB recipients
pub struct Contacts<'a, C: HttpClient + ?Sized> {
    http: &'a C,
}

impl<'a, C: HttpClient + ?Sized> Contacts<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// Create a contact and return its id
    pub async fn create(
        &self,
        contact: &ContactUpsert,
        on_behalf_of: Option<&str>,
    ) -> Result<String> {
        let request = ApiRequest::post(ENDPOINT)
            .json(std::slice::from_ref(contact))?
            .on_behalf_of(on_behalf_of);
        let result: ImportResult = fetch(self.http, request).await?;
        ensure_accepted(&result)?;
        result.persisted_recipients.into_iter().next().ok_or_else(|| {
            SendGridError::UnexpectedResponse("no persisted recipient in response".to_string())
        })
    }

    /// Update an existing contact, matched by email. Unset names are left
    /// untouched, `Parameter::Null` clears them.
    pub async fn update(&self, contact: &ContactUpsert, on_behalf_of: Option<&str>) -> Result<()> {
        let request = ApiRequest::patch(ENDPOINT)
            .json(std::slice::from_ref(contact))?
            .on_behalf_of(on_behalf_of);
        let result: ImportResult = fetch(self.http, request).await?;
        ensure_accepted(&result)
    }

    /// Create or update contacts in one batch. Per-record failures are
    /// reported in the result, not as an error.
    pub async fn import(
        &self,
        contacts: &[ContactUpsert],
        on_behalf_of: Option<&str>,
    ) -> Result<ImportResult> {
        let request = ApiRequest::post(ENDPOINT)
            .json(contacts)?
            .on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    pub async fn delete(&self, contact_id: &str, on_behalf_of: Option<&str>) -> Result<()> {
        let path = format!("{}/{}", ENDPOINT, encode_segment(contact_id));
        let request = ApiRequest::delete(path).on_behalf_of(on_behalf_of);
        execute(self.http, request).await
    }

    pub async fn delete_many(
        &self,
        contact_ids: &[String],
        on_behalf_of: Option<&str>,
    ) -> Result<()> {
        if contact_ids.is_empty() {
            return Ok(());
        }

        let request = ApiRequest::delete(ENDPOINT)
            .json(contact_ids)?
            .on_behalf_of(on_behalf_of);
        execute(self.http, request).await
    }

    pub async fn get(&self, contact_id: &str, on_behalf_of: Option<&str>) -> Result<Contact> {
        let path = format!("{}/{}", ENDPOINT, encode_segment(contact_id));
        let request = ApiRequest::get(path).on_behalf_of(on_behalf_of);
        fetch(self.http, request).await
    }

    pub async fn list(
        &self,
        options: PageOptions,
        on_behalf_of: Option<&str>,
    ) -> Result<Vec<Contact>> {
        let request = ApiRequest::get(ENDPOINT)
            .query("page_size", options.page_size)
            .query("page", options.page)
            .on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "recipients").await
    }

    /// Number of contacts counted towards the plan's billing
    pub async fn billable_count(&self, on_behalf_of: Option<&str>) -> Result<u64> {
        let request =
            ApiRequest::get(format!("{}/billable_count", ENDPOINT)).on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "recipient_count").await
    }

    pub async fn total_count(&self, on_behalf_of: Option<&str>) -> Result<u64> {
        let request = ApiRequest::get(format!("{}/count", ENDPOINT)).on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "recipient_count").await
    }

    /// Find contacts whose field equals `value`. Date fields take unix seconds.
    pub async fn search_by_field(
        &self,
        field_name: &str,
        value: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<Vec<Contact>> {
        let request = ApiRequest::get(format!("{}/search", ENDPOINT))
            .query(field_name, value)
            .on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "recipients").await
    }

    /// Segment search, optionally restricted to one list
    pub async fn search(
        &self,
        list_id: Option<u64>,
        conditions: &[SearchCondition],
        on_behalf_of: Option<&str>,
    ) -> Result<Vec<Contact>> {
        let request = ApiRequest::post(format!("{}/search", ENDPOINT))
            .json(&SearchPayload { list_id, conditions })?
            .on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "recipients").await
    }

    /// Lists the contact belongs to
    pub async fn lists(
        &self,
        contact_id: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<Vec<ContactList>> {
        let path = format!("{}/{}/lists", ENDPOINT, encode_segment(contact_id));
        let request = ApiRequest::get(path).on_behalf_of(on_behalf_of);
        fetch_property(self.http, request, "lists").await
    }
}

fn ensure_accepted(result: &ImportResult) -> Result<()> {
    if result.error_count == 0 {
        return Ok(());
    }
    let message = result
        .errors
        .first()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| format!("{} record(s) rejected", result.error_count));
    Err(SendGridError::Rejected(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockHttp;
    use crate::http::Method;
    use crate::parameter::Parameter;
    use crate::types::{ConditionOperator, FieldValue, LogicalOperator};
    use serde_json::json;

    fn persisted(id: &str) -> serde_json::Value {
        json!({
            "new_count": 1,
            "updated_count": 0,
            "error_count": 0,
            "error_indices": [],
            "unmodified_indices": [],
            "persisted_recipients": [id],
            "errors": []
        })
    }

    #[tokio::test]
    async fn test_create_wraps_contact_in_array() {
        let http = MockHttp::new().respond_json(persisted("YUBh"));
        let contact = ContactUpsert::new("ada@example.com")
            .first_name("Ada")
            .custom_field("pet", "Fluffy");
        let id = Contacts::new(&http).create(&contact, None).await.unwrap();

        let req = http.only_request();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "contactdb/recipients");
        assert_eq!(
            req.json_body(),
            Some(json!([{"email": "ada@example.com", "first_name": "Ada", "pet": "Fluffy"}]))
        );
        assert_eq!(id, "YUBh");
    }

    #[tokio::test]
    async fn test_create_rejected_record_is_an_error() {
        let http = MockHttp::new().respond_json(json!({
            "new_count": 0,
            "error_count": 1,
            "error_indices": [0],
            "persisted_recipients": [],
            "errors": [{"message": "Invalid email.", "error_indices": [0]}]
        }));
        let err = Contacts::new(&http)
            .create(&ContactUpsert::new("not-an-email"), None)
            .await
            .unwrap_err();
        match err {
            SendGridError::Rejected(msg) => assert_eq!(msg, "Invalid email."),
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_tri_state_names() {
        let http = MockHttp::new().respond_json(json!({
            "updated_count": 1,
            "error_count": 0,
            "persisted_recipients": ["YUBh"]
        }));
        let contact = ContactUpsert::new("ada@example.com").last_name(Parameter::Null);
        Contacts::new(&http).update(&contact, Some("sub")).await.unwrap();

        let req = http.only_request();
        assert_eq!(req.method, Method::Patch);
        assert_eq!(req.header_value("on-behalf-of"), Some("sub"));
        let body = req.json_body().unwrap();
        assert_eq!(body, json!([{"email": "ada@example.com", "last_name": null}]));
        assert!(body[0].get("first_name").is_none());
    }

    #[tokio::test]
    async fn test_import_returns_partial_failures() {
        let http = MockHttp::new().respond_json(json!({
            "new_count": 1,
            "error_count": 1,
            "error_indices": [1],
            "persisted_recipients": ["YUBh"],
            "errors": [{"message": "Invalid email.", "error_indices": [1]}]
        }));
        let batch = vec![ContactUpsert::new("a@example.com"), ContactUpsert::new("bad")];
        let result = Contacts::new(&http).import(&batch, None).await.unwrap();
        assert_eq!(result.error_indices, vec![1]);
        assert_eq!(http.only_request().json_body().unwrap().as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_many_skips_empty_batch() {
        let http = MockHttp::new();
        Contacts::new(&http).delete_many(&[], None).await.unwrap();
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_many_sends_ids_in_body() {
        let http = MockHttp::new().respond_empty();
        let ids = vec!["a".to_string(), "b".to_string()];
        Contacts::new(&http).delete_many(&ids, None).await.unwrap();

        let req = http.only_request();
        assert_eq!(req.method, Method::Delete);
        assert_eq!(req.path, "contactdb/recipients");
        assert_eq!(req.json_body(), Some(json!(["a", "b"])));
    }

    #[tokio::test]
    async fn test_get_and_delete_single() {
        let http = MockHttp::new()
            .respond_json(json!({"id": "YUBh", "email": "ada@example.com", "custom_fields": []}))
            .respond_empty();
        let contacts = Contacts::new(&http);
        let contact = contacts.get("YUBh", None).await.unwrap();
        contacts.delete("YUBh", None).await.unwrap();

        assert_eq!(contact.email, "ada@example.com");
        let requests = http.requests();
        assert_eq!(requests[0].path, "contactdb/recipients/YUBh");
        assert_eq!(requests[1].method, Method::Delete);
        assert_eq!(requests[1].path, "contactdb/recipients/YUBh");
    }

    #[tokio::test]
    async fn test_contact_id_is_escaped_in_path() {
        let http = MockHttp::new().respond_json(json!({"lists": []}));
        Contacts::new(&http).lists("a/b#c", None).await.unwrap();
        assert_eq!(http.only_request().path, "contactdb/recipients/a%2Fb%23c/lists");
    }

    #[tokio::test]
    async fn test_list_uses_default_paging() {
        let http = MockHttp::new().respond_json(json!({"recipients": []}));
        let contacts = Contacts::new(&http)
            .list(PageOptions::default(), None)
            .await
            .unwrap();
        assert!(contacts.is_empty());

        let req = http.only_request();
        assert_eq!(
            req.query,
            vec![
                ("page_size".to_string(), "100".to_string()),
                ("page".to_string(), "1".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_counts() {
        let http = MockHttp::new()
            .respond_json(json!({"recipient_count": 42}))
            .respond_json(json!({"recipient_count": 50}));
        let contacts = Contacts::new(&http);
        assert_eq!(contacts.billable_count(None).await.unwrap(), 42);
        assert_eq!(contacts.total_count(None).await.unwrap(), 50);

        let requests = http.requests();
        assert_eq!(requests[0].path, "contactdb/recipients/billable_count");
        assert_eq!(requests[1].path, "contactdb/recipients/count");
    }

    #[tokio::test]
    async fn test_search_by_field_uses_field_as_query_key() {
        let http = MockHttp::new().respond_json(json!({
            "recipients": [{
                "id": "YUBh",
                "email": "ada@example.com",
                "custom_fields": [{"id": 2, "name": "pet", "value": "Fluffy", "type": "text"}]
            }]
        }));
        let found = Contacts::new(&http)
            .search_by_field("pet", "Fluffy", None)
            .await
            .unwrap();

        let req = http.only_request();
        assert_eq!(req.path, "contactdb/recipients/search");
        assert_eq!(req.query, vec![("pet".to_string(), "Fluffy".to_string())]);
        assert_eq!(
            found[0].custom_field("pet"),
            Some(&FieldValue::Text("Fluffy".to_string()))
        );
    }

    #[tokio::test]
    async fn test_search_with_conditions() {
        let http = MockHttp::new().respond_json(json!({"recipients": [], "recipient_count": 0}));
        let conditions = vec![
            SearchCondition {
                field: "last_name".to_string(),
                value: "Lovelace".to_string(),
                operator: ConditionOperator::Eq,
                and_or: None,
            },
            SearchCondition {
                field: "email".to_string(),
                value: "example.com".to_string(),
                operator: ConditionOperator::Contains,
                and_or: Some(LogicalOperator::And),
            },
        ];
        Contacts::new(&http)
            .search(Some(5), &conditions, None)
            .await
            .unwrap();

        let req = http.only_request();
        assert_eq!(req.method, Method::Post);
        assert_eq!(
            req.json_body(),
            Some(json!({
                "list_id": 5,
                "conditions": [
                    {"field": "last_name", "value": "Lovelace", "operator": "eq", "and_or": ""},
                    {
                        "field": "email",
                        "value": "example.com",
                        "operator": "contains",
                        "and_or": "and"
                    }
                ]
            }))
        );
    }

    #[tokio::test]
    async fn test_search_without_list_omits_list_id() {
        let http = MockHttp::new().respond_json(json!({"recipients": []}));
        Contacts::new(&http).search(None, &[], None).await.unwrap();
        assert_eq!(http.only_request().json_body(), Some(json!({"conditions": []})));
    }

    #[tokio::test]
    async fn test_lists_of_contact() {
        let http = MockHttp::new().respond_json(json!({
            "lists": [{"id": 1, "name": "Newsletter", "recipient_count": 3}]
        }));
        let lists = Contacts::new(&http).lists("YUBh", None).await.unwrap();
        assert_eq!(http.only_request().path, "contactdb/recipients/YUBh/lists");
        assert_eq!(lists[0].name, "Newsletter");
    }

    #[tokio::test]
    async fn test_server_error_is_raised() {
        let http = MockHttp::new().respond_error(500, "boom");
        let err = Contacts::new(&http).total_count(None).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
