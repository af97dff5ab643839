// sendgrid-cli/src/commands/contacts.rs
use super::{confirm_destructive, parse_date, parse_key_value, rejected};
use crate::output::{print_list, print_response, ErrorResponse, ExitCode, Response};
use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use sendgrid_client::{
    ConditionOperator, ContactUpsert, FieldValue, LogicalOperator, PageOptions, Parameter,
    SearchCondition, SendGridClient,
};
use serde_json::json;

#[derive(Subcommand, Clone, Debug)]
pub enum ContactsCommands {
    /// List contacts
    List {
        #[arg(long, default_value = "100")]
        page_size: u32,
        #[arg(long, default_value = "1")]
        page: u32,
        /// Fetch every page
        #[arg(long)]
        all: bool,
    },
    /// Get a contact by ID
    Get { id: String },
    /// Find a contact by email address
    Find { email: String },
    /// Create a contact
    Create {
        #[arg(long)]
        email: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Update a contact (matched by email). Omitted fields stay unchanged.
    Update {
        #[arg(long)]
        email: String,
        #[command(flatten)]
        fields: FieldArgs,
        /// Clear the first name
        #[arg(long, conflicts_with = "first_name")]
        clear_first_name: bool,
        /// Clear the last name
        #[arg(long, conflicts_with = "last_name")]
        clear_last_name: bool,
        /// Clear a custom field
        #[arg(long = "clear-field", value_name = "NAME")]
        clear_fields: Vec<String>,
    },
    /// Create or update contacts from a JSON array file
    Import { file: String },
    /// Delete contacts
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        force: bool,
    },
    /// Total number of contacts
    Count,
    /// Number of billable contacts
    BillableCount,
    /// Contacts whose field equals a value
    Search { field: String, value: String },
    /// Segment search with FIELD,OPERATOR,VALUE conditions
    Segment {
        #[arg(long)]
        list_id: Option<u64>,
        #[arg(long = "condition", required = true, value_name = "FIELD,OPERATOR,VALUE")]
        conditions: Vec<String>,
        /// Join conditions with OR instead of AND
        #[arg(long)]
        any: bool,
    },
    /// Lists a contact belongs to
    Lists { id: String },
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct FieldArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    /// Text custom field
    #[arg(long = "field", value_name = "NAME=VALUE")]
    text: Vec<String>,
    /// Number custom field
    #[arg(long = "number", value_name = "NAME=VALUE")]
    number: Vec<String>,
    /// Date custom field (YYYY-MM-DD or RFC 3339)
    #[arg(long = "date", value_name = "NAME=VALUE")]
    date: Vec<String>,
}

impl FieldArgs {
    fn into_upsert(self, email: String) -> Result<ContactUpsert> {
        let mut upsert = ContactUpsert::new(email);
        if let Some(first) = self.first_name {
            upsert = upsert.first_name(first);
        }
        if let Some(last) = self.last_name {
            upsert = upsert.last_name(last);
        }
        for arg in &self.text {
            let (name, value) = parse_key_value(arg)?;
            upsert = upsert.custom_field(name, value);
        }
        for arg in &self.number {
            let (name, value) = parse_key_value(arg)?;
            let n: f64 = value
                .parse()
                .map_err(|_| anyhow!("'{}' is not a number", value))?;
            upsert = upsert.custom_field(name, n);
        }
        for arg in &self.date {
            let (name, value) = parse_key_value(arg)?;
            upsert = upsert.custom_field(name, parse_date(&value)?);
        }
        Ok(upsert)
    }
}

/// Parse `FIELD,OPERATOR,VALUE`
fn parse_condition(arg: &str, and_or: Option<LogicalOperator>) -> Result<SearchCondition> {
    let mut parts = arg.splitn(3, ',');
    let (field, op, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(f), Some(o), v) => (f, o, v.unwrap_or("")),
        _ => return Err(anyhow!("expected FIELD,OPERATOR,VALUE, got '{}'", arg)),
    };
    let operator: ConditionOperator = serde_json::from_value(json!(op))
        .map_err(|_| anyhow!("unknown operator '{}'", op))?;
    Ok(SearchCondition {
        field: field.to_string(),
        value: value.to_string(),
        operator,
        and_or,
    })
}

/// Turn one JSON object into an upsert; strings are text fields, numbers are number fields
fn upsert_from_json(value: serde_json::Value) -> Result<ContactUpsert> {
    let serde_json::Value::Object(map) = value else {
        return Err(anyhow!("each contact must be a JSON object"));
    };
    let email = map
        .get("email")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("contact without 'email'"))?;
    let mut upsert = ContactUpsert::new(email);

    for (key, value) in &map {
        match (key.as_str(), value) {
            ("email", _) => {}
            ("first_name", v) => upsert.first_name = name_from_json(key, v)?,
            ("last_name", v) => upsert.last_name = name_from_json(key, v)?,
            (_, serde_json::Value::Null) => {
                upsert.custom_fields.insert(key.clone(), None);
            }
            (_, serde_json::Value::String(s)) => {
                upsert.custom_fields.insert(key.clone(), Some(FieldValue::Text(s.clone())));
            }
            (_, serde_json::Value::Number(n)) => {
                let n = n.as_f64().ok_or_else(|| anyhow!("'{}' is out of range", key))?;
                upsert.custom_fields.insert(key.clone(), Some(FieldValue::Number(n)));
            }
            (_, other) => return Err(anyhow!("unsupported value for '{}': {}", key, other)),
        }
    }
    Ok(upsert)
}

/// A name must be a string, or `null` to clear it
fn name_from_json(key: &str, value: &serde_json::Value) -> Result<Parameter<String>> {
    match value {
        serde_json::Value::Null => Ok(Parameter::Null),
        serde_json::Value::String(s) => Ok(Parameter::Value(s.clone())),
        other => Err(anyhow!("'{}' must be a string or null, got {}", key, other)),
    }
}

pub async fn handle_contacts(
    client: &SendGridClient,
    on_behalf_of: Option<&str>,
    cmd: ContactsCommands,
) -> Result<ExitCode> {
    let subuser = client.on_behalf_of(on_behalf_of);
    let contacts = client.api().contacts();

    match cmd {
        ContactsCommands::List {
            page_size,
            page,
            all,
        } => {
            let items = if all {
                client.all_contacts(page_size, subuser).await?
            } else {
                contacts.list(PageOptions { page_size, page }, subuser).await?
            };
            print_list(items, subuser)?;
        }
        ContactsCommands::Get { id } => {
            let contact = contacts.get(&id, subuser).await?;
            print_response(&Response::ok(contact))?;
        }
        ContactsCommands::Find { email } => match client.contact_by_email(&email, subuser).await? {
            Some(contact) => print_response(&Response::ok(contact))?,
            None => {
                let resp = Response::<()>::error(ErrorResponse::not_found(format!(
                    "No contact with email {}",
                    email
                )));
                print_response(&resp)?;
                return Ok(ExitCode::PermanentError);
            }
        },
        ContactsCommands::Create { email, fields } => {
            let upsert = fields.into_upsert(email)?;
            let id = contacts.create(&upsert, subuser).await?;
            print_response(&Response::ok(json!({ "id": id })))?;
        }
        ContactsCommands::Update {
            email,
            fields,
            clear_first_name,
            clear_last_name,
            clear_fields,
        } => {
            let mut upsert = fields.into_upsert(email.clone())?;
            if clear_first_name {
                upsert.first_name = Parameter::Null;
            }
            if clear_last_name {
                upsert.last_name = Parameter::Null;
            }
            for name in clear_fields {
                upsert = upsert.clear_custom_field(name);
            }
            contacts.update(&upsert, subuser).await?;
            print_response(&Response::ok(json!({ "email": email, "updated": true })))?;
        }
        ContactsCommands::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file))?;
            let raw: Vec<serde_json::Value> = serde_json::from_str(&content)
                .with_context(|| format!("{} must contain a JSON array", file))?;
            let batch = raw
                .into_iter()
                .map(upsert_from_json)
                .collect::<Result<Vec<_>>>()?;
            let result = contacts.import(&batch, subuser).await?;
            print_response(&Response::ok(result))?;
        }
        ContactsCommands::Delete { ids, force } => {
            if !confirm_destructive(force, &format!("delete {} contact(s)", ids.len()))? {
                return rejected();
            }
            if let [id] = ids.as_slice() {
                contacts.delete(id, subuser).await?;
            } else {
                contacts.delete_many(&ids, subuser).await?;
            }
            print_response(&Response::ok(json!({ "deleted": ids })))?;
        }
        ContactsCommands::Count => {
            let count = contacts.total_count(subuser).await?;
            print_response(&Response::ok(json!({ "recipient_count": count })))?;
        }
        ContactsCommands::BillableCount => {
            let count = contacts.billable_count(subuser).await?;
            print_response(&Response::ok(json!({ "recipient_count": count })))?;
        }
        ContactsCommands::Search { field, value } => {
            let items = contacts.search_by_field(&field, &value, subuser).await?;
            print_list(items, subuser)?;
        }
        ContactsCommands::Segment {
            list_id,
            conditions,
            any,
        } => {
            let joiner = if any {
                LogicalOperator::Or
            } else {
                LogicalOperator::And
            };
            let parsed = conditions
                .iter()
                .enumerate()
                .map(|(i, c)| parse_condition(c, (i > 0).then_some(joiner)))
                .collect::<Result<Vec<_>>>()?;
            let items = contacts.search(list_id, &parsed, subuser).await?;
            print_list(items, subuser)?;
        }
        ContactsCommands::Lists { id } => {
            let lists = contacts.lists(&id, subuser).await?;
            print_list(lists, subuser)?;
        }
    }

    Ok(ExitCode::Success)
}
