//! onedrive_cli - Log in to OneDrive and list the root folder.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use onedrive_cli::config::DEFAULT_SCOPE;
use onedrive_cli::{
    Authenticator, Config, Credentials, DriveClient, Endpoints, RefreshPolicy, Session, Stage,
    TokenManager,
};

/// Minimal OAuth2 client for OneDrive.
#[derive(Parser)]
#[command(name = "onedrive_cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Application (client) ID registered with Microsoft.
    #[arg(long, env = "CLIENT_ID")]
    client_id: String,

    /// Application client secret.
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Deployment stage; selects the default redirect URI.
    #[arg(long, env = "ONEDRIVE_STAGE", value_enum, default_value_t = Stage::Dev)]
    stage: Stage,

    /// Redirect URI; required for the prod stage.
    #[arg(long, env = "REDIRECT_URI")]
    redirect_uri: Option<String>,

    /// Permissions to request (repeat or comma-separate).
    #[arg(long, value_delimiter = ',', default_values = DEFAULT_SCOPE)]
    scope: Vec<String>,

    /// Azure AD tenant (common, consumers, organizations or a tenant ID).
    #[arg(long, env = "ONEDRIVE_TENANT", default_value = "common")]
    tenant: String,

    /// Refresh only once the token is older than this many seconds
    /// (default: refresh before every call).
    #[arg(long)]
    max_token_age: Option<u64>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let redirect_uri = cli
        .stage
        .redirect_uri(cli.redirect_uri)
        .context("Failed to resolve redirect URI")?;

    let refresh_policy = cli
        .max_token_age
        .map(|secs| RefreshPolicy::MaxAge(Duration::from_secs(secs)))
        .unwrap_or_default();

    let credentials = Credentials::new(cli.client_id, cli.client_secret).with_scope(cli.scope);
    let config = Config::new(credentials, redirect_uri)
        .with_endpoints(Endpoints::for_tenant(&cli.tenant))
        .with_refresh_policy(refresh_policy);

    let code = Authenticator::new(&config)
        .authenticate()
        .context("Failed to obtain authorization code")?;

    let mut tokens = TokenManager::new(&config);
    tokens
        .exchange(&code)
        .await
        .context("Failed to exchange authorization code")?;

    let mut session = Session::new(tokens, DriveClient::new(&config.endpoints.api_base));
    let items = session
        .list_root_items()
        .await
        .context("Failed to list root folder")?;

    info!(count = items.len(), "Listed root folder");
    if items.is_empty() {
        println!("No items found.");
    } else {
        for item in items {
            println!("{}", item);
        }
    }

    Ok(())
}
