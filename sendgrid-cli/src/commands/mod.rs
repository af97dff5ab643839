// sendgrid-cli/src/commands/mod.rs
pub mod config;
pub mod contacts;
pub mod fields;
pub mod lists;
pub mod setup;
pub mod teammates;

pub use config::{handle_config, ConfigCommands};
pub use contacts::{handle_contacts, ContactsCommands};
pub use fields::{handle_fields, FieldsCommands};
pub use lists::{handle_lists, ListsCommands};
pub use setup::run_setup;
pub use teammates::{handle_teammates, TeammatesCommands};

use crate::output::{print_response, ErrorResponse, ExitCode, Response};
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use dialoguer::Confirm;
use std::io::IsTerminal;

/// Gate a destructive operation behind `--force` or an interactive prompt.
/// Prints the rejection envelope and returns `false` when refused.
pub fn confirm_destructive(force: bool, action: &str) -> Result<bool> {
    if force {
        return Ok(true);
    }

    if std::io::stdin().is_terminal() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Really {}?", action))
            .default(false)
            .interact()?;
        if confirmed {
            return Ok(true);
        }
    }

    let resp = Response::<()>::error(ErrorResponse::safety_rejected(format!(
        "--force is required to {}",
        action
    )));
    print_response(&resp)?;
    Ok(false)
}

/// Shorthand for the refusal path of `confirm_destructive`
pub fn rejected() -> Result<ExitCode> {
    Ok(ExitCode::SafetyRejected)
}

/// Split a `name=value` argument
pub fn parse_key_value(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{}'", arg))?;
    if key.is_empty() {
        return Err(anyhow!("field name is empty in '{}'", arg));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Accept RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC)
pub fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid date '{}', use YYYY-MM-DD or RFC 3339", value))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("invalid date '{}'", value))?;
    Ok(midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("pet=Fluffy=cat").unwrap(),
            ("pet".to_string(), "Fluffy=cat".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-01").unwrap().timestamp(), 1706745600);
        assert_eq!(
            parse_date("2024-02-01T01:00:00+01:00").unwrap().timestamp(),
            1706745600
        );
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_force_skips_prompt() {
        assert!(confirm_destructive(true, "delete things").unwrap());
    }
}
