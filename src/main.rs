use clap::Parser;
use tracing_subscriber::EnvFilter;

/// A read-only analytics and reporting API over the users/transactions dataset.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Override the port the HTTP server binds to.
    #[arg(long)]
    port: Option<u16>,
}

/// The main entry point for the Ledgerview API server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from the .env file, if present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = configuration::load_settings()?;
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    tracing::info!(port = settings.server.port, "Starting the Ledgerview API server.");
    web_server::run_server(settings).await
}
