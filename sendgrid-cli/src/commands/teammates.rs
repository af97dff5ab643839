// sendgrid-cli/src/commands/teammates.rs
use super::{confirm_destructive, rejected};
use crate::output::{print_list, print_response, ErrorResponse, ExitCode, Response};
use anyhow::Result;
use clap::Subcommand;
use sendgrid_client::{ListOptions, SendGridClient};
use serde_json::json;

#[derive(Subcommand, Clone, Debug)]
pub enum TeammatesCommands {
    /// List teammates
    List {
        #[arg(long, default_value = "10")]
        limit: u32,
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Get a teammate by username
    Get { username: String },
    /// Find a teammate by email address
    Find { email: String },
    /// Invite a teammate
    Invite {
        email: String,
        /// Scope to grant (repeatable)
        #[arg(long = "scope", conflicts_with_all = ["admin", "read_only"])]
        scopes: Vec<String>,
        /// Invite as admin
        #[arg(long, conflicts_with = "read_only")]
        admin: bool,
        /// Grant every read scope the account holds
        #[arg(long)]
        read_only: bool,
    },
    /// Replace a teammate's permissions
    Update {
        username: String,
        #[arg(long = "scope")]
        scopes: Vec<String>,
        #[arg(long)]
        admin: bool,
    },
    /// Delete a teammate
    Delete {
        username: String,
        #[arg(long)]
        force: bool,
    },
    /// List pending invitations
    Pending,
    /// Resend a pending invitation
    Resend { token: String },
    /// Cancel a pending invitation
    Cancel {
        token: String,
        #[arg(long)]
        force: bool,
    },
    /// List access requests
    Requests {
        #[arg(long, default_value = "10")]
        limit: u32,
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Approve an access request
    Approve { id: u64 },
    /// Deny an access request
    Deny { id: u64 },
    /// Scopes granted to the API key
    Scopes,
}

pub async fn handle_teammates(
    client: &SendGridClient,
    on_behalf_of: Option<&str>,
    cmd: TeammatesCommands,
) -> Result<ExitCode> {
    let subuser = client.on_behalf_of(on_behalf_of);
    let teammates = client.api().teammates();

    match cmd {
        TeammatesCommands::List { limit, offset } => {
            let items = teammates.list(ListOptions { limit, offset }, subuser).await?;
            print_list(items, subuser)?;
        }
        TeammatesCommands::Get { username } => {
            print_response(&Response::ok(teammates.get(&username, subuser).await?))?;
        }
        TeammatesCommands::Find { email } => {
            match client.find_teammate_by_email(&email, subuser).await? {
                Some(teammate) => print_response(&Response::ok(teammate))?,
                None => {
                    let resp = Response::<()>::error(ErrorResponse::not_found(format!(
                        "No teammate with email {}",
                        email
                    )));
                    print_response(&resp)?;
                    return Ok(ExitCode::PermanentError);
                }
            }
        }
        TeammatesCommands::Invite {
            email,
            scopes,
            admin,
            read_only,
        } => {
            let invitation = if admin {
                teammates.invite_admin(&email, subuser).await?
            } else if read_only {
                teammates.invite_read_only(&email, subuser).await?
            } else {
                if scopes.is_empty() {
                    let resp = Response::<()>::error(ErrorResponse::validation_failed(
                        "Pass --scope, --admin or --read-only".to_string(),
                    ));
                    print_response(&resp)?;
                    return Ok(ExitCode::PermanentError);
                }
                teammates.invite(&email, &scopes, subuser).await?
            };
            print_response(&Response::ok(invitation))?;
        }
        TeammatesCommands::Update {
            username,
            scopes,
            admin,
        } => {
            let updated = teammates
                .update_permissions(&username, &scopes, admin, subuser)
                .await?;
            print_response(&Response::ok(updated))?;
        }
        TeammatesCommands::Delete { username, force } => {
            if !confirm_destructive(force, &format!("delete teammate {}", username))? {
                return rejected();
            }
            teammates.delete(&username, subuser).await?;
            print_response(&Response::ok(json!({ "deleted": username })))?;
        }
        TeammatesCommands::Pending => {
            print_list(teammates.pending_invitations(subuser).await?, subuser)?;
        }
        TeammatesCommands::Resend { token } => {
            print_response(&Response::ok(teammates.resend_invitation(&token, subuser).await?))?;
        }
        TeammatesCommands::Cancel { token, force } => {
            if !confirm_destructive(force, "cancel the invitation")? {
                return rejected();
            }
            teammates.delete_invitation(&token, subuser).await?;
            print_response(&Response::ok(json!({ "cancelled": token })))?;
        }
        TeammatesCommands::Requests { limit, offset } => {
            let requests = teammates
                .access_requests(ListOptions { limit, offset }, subuser)
                .await?;
            print_list(requests, subuser)?;
        }
        TeammatesCommands::Approve { id } => {
            let group = teammates.approve_access_request(id, subuser).await?;
            print_response(&Response::ok(json!({ "id": id, "scope_group_name": group })))?;
        }
        TeammatesCommands::Deny { id } => {
            teammates.deny_access_request(id, subuser).await?;
            print_response(&Response::ok(json!({ "id": id, "denied": true })))?;
        }
        TeammatesCommands::Scopes => {
            print_list(teammates.scopes(subuser).await?, subuser)?;
        }
    }

    Ok(ExitCode::Success)
}
