// sendgrid-cli/src/commands/fields.rs
use super::{confirm_destructive, rejected};
use crate::output::{print_list, print_response, ExitCode, Response};
use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use sendgrid_client::{FieldType, SendGridClient};
use serde_json::json;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FieldTypeArg {
    Text,
    Number,
    Date,
}

impl From<FieldTypeArg> for FieldType {
    fn from(arg: FieldTypeArg) -> Self {
        match arg {
            FieldTypeArg::Text => FieldType::Text,
            FieldTypeArg::Number => FieldType::Number,
            FieldTypeArg::Date => FieldType::Date,
        }
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum FieldsCommands {
    /// List custom fields
    List,
    /// Get a custom field
    Get { id: u64 },
    /// Create a custom field
    Create {
        name: String,
        #[arg(long = "type", value_enum, default_value = "text")]
        field_type: FieldTypeArg,
    },
    /// Delete a custom field
    Delete {
        id: u64,
        #[arg(long)]
        force: bool,
    },
    /// List reserved fields
    Reserved,
}

pub async fn handle_fields(
    client: &SendGridClient,
    on_behalf_of: Option<&str>,
    cmd: FieldsCommands,
) -> Result<ExitCode> {
    let subuser = client.on_behalf_of(on_behalf_of);
    let fields = client.api().custom_fields();

    match cmd {
        FieldsCommands::List => print_list(fields.list(subuser).await?, subuser)?,
        FieldsCommands::Get { id } => {
            print_response(&Response::ok(fields.get(id, subuser).await?))?
        }
        FieldsCommands::Create { name, field_type } => {
            let created = fields.create(&name, field_type.into(), subuser).await?;
            print_response(&Response::ok(created))?;
        }
        FieldsCommands::Delete { id, force } => {
            if !confirm_destructive(force, &format!("delete custom field {}", id))? {
                return rejected();
            }
            fields.delete(id, subuser).await?;
            print_response(&Response::ok(json!({ "deleted": id })))?;
        }
        FieldsCommands::Reserved => print_list(fields.reserved(subuser).await?, subuser)?,
    }

    Ok(ExitCode::Success)
}
