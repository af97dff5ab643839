// sendgrid-api/src/types.rs
use crate::parameter::Parameter;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

// Contacts

/// Contact DB recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub last_emailed: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub last_clicked: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub last_opened: Option<DateTime<Utc>>,
    #[serde(default)]
    pub custom_fields: Vec<Field>,
}

impl Contact {
    /// Value of a custom field by name
    pub fn custom_field(&self, name: &str) -> Option<&FieldValue> {
        self.custom_fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_ref())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
}

/// Typed custom field value. Dates travel as unix seconds.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::Date(_) => FieldType::Date,
        }
    }

    /// Decode a wire value of the declared type; `null` means no value
    fn from_wire(field_type: FieldType, raw: &serde_json::Value) -> Result<Option<Self>, String> {
        if raw.is_null() {
            return Ok(None);
        }
        let value = match field_type {
            FieldType::Text => match raw {
                serde_json::Value::String(s) => Ok(FieldValue::Text(s.clone())),
                other => Ok(FieldValue::Text(other.to_string())),
            },
            FieldType::Number => raw
                .as_f64()
                .or_else(|| raw.as_str().and_then(|s| s.parse().ok()))
                .map(FieldValue::Number)
                .ok_or_else(|| format!("invalid number field value: {}", raw)),
            FieldType::Date => raw
                .as_i64()
                .or_else(|| raw.as_str().and_then(|s| s.parse().ok()))
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
                .map(FieldValue::Date)
                .ok_or_else(|| format!("invalid date field value: {}", raw)),
        }?;
        Ok(Some(value))
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Date(d) => serializer.serialize_i64(d.timestamp()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

/// Custom field attached to a recipient. `value` is `None` when the
/// recipient has no value stored for the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawField", into = "RawField")]
pub struct Field {
    pub id: Option<u64>,
    pub name: String,
    pub field_type: FieldType,
    pub value: Option<FieldValue>,
}

#[derive(Serialize, Deserialize)]
struct RawField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    name: String,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(rename = "type")]
    field_type: FieldType,
}

impl TryFrom<RawField> for Field {
    type Error = String;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        let value = FieldValue::from_wire(raw.field_type, &raw.value)?;
        Ok(Field {
            id: raw.id,
            name: raw.name,
            field_type: raw.field_type,
            value,
        })
    }
}

impl From<Field> for RawField {
    fn from(field: Field) -> Self {
        let value = match field.value {
            Some(FieldValue::Text(s)) => serde_json::Value::String(s),
            Some(FieldValue::Number(n)) => serde_json::json!(n),
            Some(FieldValue::Date(d)) => serde_json::json!(d.timestamp()),
            None => serde_json::Value::Null,
        };
        RawField {
            id: field.id,
            name: field.name,
            value,
            field_type: field.field_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomFieldDefinition {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Type of a built-in field. Reserved fields include set-valued ones
/// (`lists`, `campaigns`) that custom fields cannot use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservedFieldType {
    Text,
    Number,
    Date,
    Set,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReservedField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: ReservedFieldType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactList {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub recipient_count: u64,
}

/// Recipient payload for create/update. Custom fields sit next to the
/// reserved ones in the JSON object; `None` clears a custom field.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ContactUpsert {
    pub email: String,
    #[serde(skip_serializing_if = "Parameter::is_unset")]
    pub first_name: Parameter<String>,
    #[serde(skip_serializing_if = "Parameter::is_unset")]
    pub last_name: Parameter<String>,
    #[serde(flatten)]
    pub custom_fields: BTreeMap<String, Option<FieldValue>>,
}

impl ContactUpsert {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn first_name(mut self, value: impl Into<Parameter<String>>) -> Self {
        self.first_name = value.into();
        self
    }

    pub fn last_name(mut self, value: impl Into<Parameter<String>>) -> Self {
        self.last_name = value.into();
        self
    }

    pub fn custom_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.custom_fields.insert(name.into(), Some(value.into()));
        self
    }

    pub fn clear_custom_field(mut self, name: impl Into<String>) -> Self {
        self.custom_fields.insert(name.into(), None);
        self
    }
}

/// Outcome of a recipient create/update/import batch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportResult {
    #[serde(default)]
    pub new_count: u64,
    #[serde(default)]
    pub updated_count: u64,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub error_indices: Vec<usize>,
    #[serde(default)]
    pub unmodified_indices: Vec<usize>,
    #[serde(default)]
    pub persisted_recipients: Vec<String>,
    #[serde(default)]
    pub errors: Vec<ImportError>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportError {
    pub message: String,
    #[serde(default)]
    pub error_indices: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Empty,
    NotEmpty,
    IsWithin,
    Contains,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
}

/// One clause of a segment search. The first clause carries no `and_or`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchCondition {
    pub field: String,
    pub value: String,
    pub operator: ConditionOperator,
    #[serde(
        default,
        serialize_with = "serialize_and_or",
        deserialize_with = "deserialize_and_or"
    )]
    pub and_or: Option<LogicalOperator>,
}

fn serialize_and_or<S: Serializer>(
    value: &Option<LogicalOperator>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(op) => op.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}

fn deserialize_and_or<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<LogicalOperator>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some("and") => Ok(Some(LogicalOperator::And)),
        Some("or") => Ok(Some(LogicalOperator::Or)),
        Some(other) => Err(serde::de::Error::unknown_variant(other, &["and", "or"])),
    }
}

// Teammates

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Owner,
    Teammate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Teammate {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub user_type: Option<UserType>,
    #[serde(default)]
    pub is_admin: bool,
    /// Only returned by single-teammate endpoints
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Pending teammate invitation. The server expires it after 7 days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeammateInvitation {
    pub email: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Teammate request for additional scopes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessRequest {
    pub id: u64,
    pub scope_group_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// `limit`/`offset` paging for teammate endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

/// `page_size`/`page` paging for Contact DB endpoints (pages start at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub page_size: u32,
    pub page: u32,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page_size: 100,
            page: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contact_deserialization_with_custom_fields() {
        let json = json!({
            "id": "YUBh",
            "email": "a@example.com",
            "first_name": "Ada",
            "last_name": null,
            "created_at": 1422313607,
            "updated_at": 1422313607,
            "last_emailed": null,
            "custom_fields": [
                {"id": 1, "name": "pet", "value": "Fluffy", "type": "text"},
                {"id": 2, "name": "age", "value": 36, "type": "number"},
                {"id": 3, "name": "joined", "value": 1422313607, "type": "date"}
            ]
        });
        let contact: Contact = serde_json::from_value(json).unwrap();
        assert_eq!(contact.first_name.as_deref(), Some("Ada"));
        assert!(contact.last_name.is_none());
        assert!(contact.last_emailed.is_none());
        assert_eq!(contact.created_at.unwrap().timestamp(), 1422313607);
        assert_eq!(
            contact.custom_field("pet"),
            Some(&FieldValue::Text("Fluffy".to_string()))
        );
        assert_eq!(contact.custom_field("age"), Some(&FieldValue::Number(36.0)));
        match contact.custom_field("joined") {
            Some(FieldValue::Date(d)) => assert_eq!(d.timestamp(), 1422313607),
            other => panic!("Expected date field, got {:?}", other),
        }
    }

    #[test]
    fn test_number_field_accepts_numeric_string() {
        let field: Field =
            serde_json::from_value(json!({"name": "age", "value": "41", "type": "number"}))
                .unwrap();
        assert_eq!(field.value, Some(FieldValue::Number(41.0)));
    }

    #[test]
    fn test_null_field_values_decode_as_none() {
        let contact: Contact = serde_json::from_value(json!({
            "id": "YUBh",
            "email": "a@example.com",
            "custom_fields": [
                {"id": 1, "name": "pet", "value": null, "type": "text"},
                {"id": 2, "name": "age", "value": null, "type": "number"},
                {"id": 3, "name": "joined", "type": "date"}
            ]
        }))
        .unwrap();
        assert_eq!(contact.custom_fields.len(), 3);
        assert!(contact.custom_fields.iter().all(|f| f.value.is_none()));
        assert_eq!(contact.custom_fields[1].field_type, FieldType::Number);
        assert_eq!(contact.custom_field("pet"), None);
    }

    #[test]
    fn test_empty_field_serializes_null_with_type() {
        let field = Field {
            id: Some(2),
            name: "age".to_string(),
            field_type: FieldType::Number,
            value: None,
        };
        assert_eq!(
            serde_json::to_value(field).unwrap(),
            json!({"id": 2, "name": "age", "value": null, "type": "number"})
        );
    }

    #[test]
    fn test_reserved_field_types() {
        let fields: Vec<ReservedField> = serde_json::from_value(json!([
            {"name": "lists", "type": "set"},
            {"name": "email", "type": "text"},
            {"name": "future", "type": "geo"}
        ]))
        .unwrap();
        assert_eq!(fields[0].field_type, ReservedFieldType::Set);
        assert_eq!(fields[1].field_type, ReservedFieldType::Text);
        assert_eq!(fields[2].field_type, ReservedFieldType::Unknown);
    }

    #[test]
    fn test_invalid_date_field_is_rejected() {
        let result: Result<Field, _> =
            serde_json::from_value(json!({"name": "d", "value": "soon", "type": "date"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_upsert_flattens_custom_fields() {
        let upsert = ContactUpsert::new("a@example.com")
            .first_name("Ada")
            .last_name(Parameter::Null)
            .custom_field("pet", "Fluffy")
            .custom_field("age", 36.0)
            .clear_custom_field("nickname");
        let json = serde_json::to_value(upsert).unwrap();
        assert_eq!(
            json,
            json!({
                "email": "a@example.com",
                "first_name": "Ada",
                "last_name": null,
                "pet": "Fluffy",
                "age": 36.0,
                "nickname": null
            })
        );
    }

    #[test]
    fn test_upsert_omits_unset_names() {
        let json = serde_json::to_value(ContactUpsert::new("b@example.com")).unwrap();
        assert_eq!(json, json!({"email": "b@example.com"}));
    }

    #[test]
    fn test_search_condition_first_clause_has_empty_and_or() {
        let cond = SearchCondition {
            field: "last_name".to_string(),
            value: "Lovelace".to_string(),
            operator: ConditionOperator::Eq,
            and_or: None,
        };
        assert_eq!(
            serde_json::to_value(cond).unwrap(),
            json!({"field": "last_name", "value": "Lovelace", "operator": "eq", "and_or": ""})
        );
    }

    #[test]
    fn test_invitation_expiration_date() {
        let json = json!({
            "email": "new@example.com",
            "scopes": ["mail.send"],
            "is_admin": false,
            "token": "abc123",
            "expiration_date": 1456424263
        });
        let inv: TeammateInvitation = serde_json::from_value(json).unwrap();
        assert_eq!(inv.expiration_date.unwrap().timestamp(), 1456424263);
        assert_eq!(inv.scopes, vec!["mail.send".to_string()]);
    }

    #[test]
    fn test_paging_defaults() {
        assert_eq!(ListOptions::default(), ListOptions { limit: 10, offset: 0 });
        assert_eq!(
            PageOptions::default(),
            PageOptions {
                page_size: 100,
                page: 1
            }
        );
    }
}
