use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitebook_cli::cli::Cli;
use sitebook_cli::commands::{self, Output};
use sitebook_client::{get_error_message, ApiClient, ApiError, ClientConfig};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitebook=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            // API failures get the same wording the screens would show.
            match err.downcast_ref::<ApiError>() {
                Some(api) => eprintln!("Error: {}", get_error_message(api)),
                None => eprintln!("Error: {err:#}"),
            }
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // --- Configuration ---
    let config = ClientConfig::from_env()?;
    tracing::debug!(base_url = %config.base_url, "Loaded client configuration");

    let client = ApiClient::new(&config)?;
    commands::run(client, cli.command, Output { json: cli.json }).await
}
