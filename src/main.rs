use clap::Parser;
use tracing_subscriber::EnvFilter;

use octodeco::cli::{self, Cli, CliError, ClientContext, Command};
use octodeco::config::{CartConfig, ServerConfig};
use octodeco::{routes, state};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => serve().await,
        Command::Client(command) => {
            let ctx = ClientContext { base_url: cli.base_url, store_dir: cli.store_dir, cart: CartConfig::from_env() };
            let output = cli::run(&ctx, command).await?;
            print!("{output}");
            Ok(())
        }
    }
}

async fn serve() -> Result<(), CliError> {
    let config = ServerConfig::from_env();
    let port = config.port;
    tracing::info!(products_path = %config.products_path.display(), "catalog configured");

    let app = routes::app(state::AppState::new(config));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "octodeco listening");
    axum::serve(listener, app).await?;
    Ok(())
}
