// sendgrid-cli/src/commands/config.rs
use crate::output::{print_response, ExitCode, Response};
use anyhow::Result;
use clap::Subcommand;
use sendgrid_client::Config;
use serde_json::json;

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (API key masked)
    Show,
    /// Change stored settings
    Set {
        #[arg(long)]
        base_url: Option<String>,
        /// Default subuser for every call
        #[arg(long, conflicts_with = "clear_on_behalf_of")]
        on_behalf_of: Option<String>,
        #[arg(long)]
        clear_on_behalf_of: bool,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

pub fn handle_config(cmd: ConfigCommands) -> Result<ExitCode> {
    match cmd {
        ConfigCommands::Show => {
            let config = Config::load()?;
            let resp = Response::ok(json!({
                "path": Config::config_path()?.display().to_string(),
                "api_key": config.masked_api_key(),
                "base_url": config.base_url(),
                "on_behalf_of": config.on_behalf_of,
                "timeout_secs": config.timeout_secs,
            }));
            print_response(&resp)?;
        }
        ConfigCommands::Set {
            base_url,
            on_behalf_of,
            clear_on_behalf_of,
            timeout,
        } => {
            // Stored values only, so env overrides never get persisted
            let mut config = Config::load_stored()?;
            if let Some(url) = base_url {
                config.base_url = Some(url);
            }
            if let Some(subuser) = on_behalf_of {
                config.on_behalf_of = Some(subuser);
            }
            if clear_on_behalf_of {
                config.on_behalf_of = None;
            }
            if let Some(secs) = timeout {
                config.timeout_secs = Some(secs);
            }
            config.save()?;
            print_response(&Response::ok(json!({ "saved": true })))?;
        }
    }
    Ok(ExitCode::Success)
}
