mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
    ConfigCommands, ContactsCommands, FieldsCommands, ListsCommands, TeammatesCommands,
};
use output::{print_response, ErrorResponse, ExitCode, Response};
use sendgrid_client::{Config, SendGridClient, SendGridError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sendgrid")]
#[command(
    about = "A command-line interface for SendGrid contacts and teammates",
    long_about = None
)]
struct Cli {
    /// Act as this subuser (overrides the configured default)
    #[arg(long, global = true)]
    on_behalf_of: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store and validate an API key
    Setup,
    /// Contact DB recipients
    #[command(subcommand)]
    Contacts(ContactsCommands),
    /// Contact lists
    #[command(subcommand)]
    Lists(ListsCommands),
    /// Custom fields
    #[command(subcommand)]
    Fields(FieldsCommands),
    /// Teammates, invitations and access requests
    #[command(subcommand)]
    Teammates(TeammatesCommands),
    /// Configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn init_tracing() {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => report_error(&e),
    };
    std::process::exit(code.code());
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let on_behalf_of = cli.on_behalf_of.as_deref();

    match cli.command {
        Commands::Setup => commands::run_setup().await,
        Commands::Config(cmd) => commands::handle_config(cmd),
        Commands::Contacts(cmd) => {
            let client = connect()?;
            commands::handle_contacts(&client, on_behalf_of, cmd).await
        }
        Commands::Lists(cmd) => {
            let client = connect()?;
            commands::handle_lists(&client, on_behalf_of, cmd).await
        }
        Commands::Fields(cmd) => {
            let client = connect()?;
            commands::handle_fields(&client, on_behalf_of, cmd).await
        }
        Commands::Teammates(cmd) => {
            let client = connect()?;
            commands::handle_teammates(&client, on_behalf_of, cmd).await
        }
    }
}

fn connect() -> Result<SendGridClient> {
    let config = Config::load()?;
    SendGridClient::from_config(&config)
}

/// Print the error envelope and pick the exit code
fn report_error(err: &anyhow::Error) -> ExitCode {
    let message = format!("{:#}", err);
    let api_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<SendGridError>());

    let (resp, code) = match api_error {
        Some(api_error) => ErrorResponse::from_api_error(api_error, message),
        None => (ErrorResponse::internal(message), ExitCode::PermanentError),
    };

    tracing::debug!(exit_code = %code, "command failed");
    if let Err(e) = print_response(&Response::<()>::error(resp)) {
        output::print_error(&e.to_string());
    }
    code
}
