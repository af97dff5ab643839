// sendgrid-cli/src/commands/lists.rs
use super::{confirm_destructive, rejected};
use crate::output::{print_list, print_response, ExitCode, Response};
use anyhow::Result;
use clap::Subcommand;
use sendgrid_client::{PageOptions, SendGridClient};
use serde_json::json;

#[derive(Subcommand, Clone, Debug)]
pub enum ListsCommands {
    /// List all contact lists
    List,
    /// Get a list
    Get { id: u64 },
    /// Create a list
    Create { name: String },
    /// Return the list with this name, creating it if needed
    Ensure { name: String },
    /// Rename a list
    Rename { id: u64, name: String },
    /// Delete a list
    Delete {
        id: u64,
        /// Also delete the contacts on the list
        #[arg(long)]
        delete_contacts: bool,
        #[arg(long)]
        force: bool,
    },
    /// Contacts on a list
    Recipients {
        id: u64,
        #[arg(long, default_value = "100")]
        page_size: u32,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Add contacts to a list
    Add {
        id: u64,
        #[arg(required = true)]
        contact_ids: Vec<String>,
    },
    /// Remove a contact from a list
    Remove { id: u64, contact_id: String },
}

pub async fn handle_lists(
    client: &SendGridClient,
    on_behalf_of: Option<&str>,
    cmd: ListsCommands,
) -> Result<ExitCode> {
    let subuser = client.on_behalf_of(on_behalf_of);
    let lists = client.api().lists();

    match cmd {
        ListsCommands::List => {
            print_list(lists.list(subuser).await?, subuser)?;
        }
        ListsCommands::Get { id } => {
            print_response(&Response::ok(lists.get(id, subuser).await?))?;
        }
        ListsCommands::Create { name } => {
            print_response(&Response::ok(lists.create(&name, subuser).await?))?;
        }
        ListsCommands::Ensure { name } => {
            print_response(&Response::ok(client.ensure_list(&name, subuser).await?))?;
        }
        ListsCommands::Rename { id, name } => {
            print_response(&Response::ok(lists.update(id, &name, subuser).await?))?;
        }
        ListsCommands::Delete {
            id,
            delete_contacts,
            force,
        } => {
            if !confirm_destructive(force, &format!("delete list {}", id))? {
                return rejected();
            }
            lists.delete(id, delete_contacts, subuser).await?;
            print_response(&Response::ok(json!({
                "deleted": id,
                "contacts_deleted": delete_contacts,
            })))?;
        }
        ListsCommands::Recipients { id, page_size, page } => {
            let recipients = lists
                .recipients(id, PageOptions { page_size, page }, subuser)
                .await?;
            print_list(recipients, subuser)?;
        }
        ListsCommands::Add { id, contact_ids } => {
            if let [contact_id] = contact_ids.as_slice() {
                lists.add_recipient(id, contact_id, subuser).await?;
            } else {
                lists.add_recipients(id, &contact_ids, subuser).await?;
            }
            print_response(&Response::ok(json!({ "list_id": id, "added": contact_ids })))?;
        }
        ListsCommands::Remove { id, contact_id } => {
            lists.remove_recipient(id, &contact_id, subuser).await?;
            print_response(&Response::ok(json!({ "list_id": id, "removed": contact_id })))?;
        }
    }

    Ok(ExitCode::Success)
}
