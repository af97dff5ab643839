// sendgrid-cli/src/commands/setup.rs
use crate::output::{print_error, print_success, ExitCode};
use anyhow::Result;
use dialoguer::Password;
use sendgrid_client::{Config, SendGridClient};

/// Run the interactive setup command
pub async fn run_setup() -> Result<ExitCode> {
    println!("SendGrid CLI Setup");
    println!();

    let api_key = Password::new()
        .with_prompt("Enter your SendGrid API key")
        .interact()?;

    if api_key.trim().is_empty() {
        print_error("API key cannot be empty");
        return Ok(ExitCode::PermanentError);
    }

    println!();
    println!("Validating credentials...");

    let mut config = Config::load_stored()?;
    config.api_key = api_key.trim().to_string();

    // Validate the key with an authenticated call
    let client = SendGridClient::from_config(&config)?;
    match client.api().teammates().scopes(None).await {
        Ok(scopes) => {
            if let Err(e) = config.save() {
                print_error(&format!("Couldn't write config file: {}", e));
                return Ok(ExitCode::PermanentError);
            }

            print_success(&format!("Credentials saved ({} scopes granted)", scopes.len()));
            println!();
            println!("Try: sendgrid teammates list");
            Ok(ExitCode::Success)
        }
        Err(e) => {
            print_error(&e.to_string());
            eprintln!();
            eprintln!("Visit https://app.sendgrid.com/settings/api_keys");
            eprintln!("to create an API key.");
            Ok(ExitCode::PermanentError)
        }
    }
}
