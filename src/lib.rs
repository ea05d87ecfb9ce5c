//! onedrive_cli - A minimal OAuth2 command-line client for OneDrive.
//!
//! This library provides functionality to:
//! - Build the Microsoft identity platform authorization URL and capture the
//!   code from the pasted redirect URL
//! - Exchange the code for access/refresh tokens and refresh them when stale
//! - List the items in the drive's root folder through Microsoft Graph
//!
//! # Example
//!
//! ```no_run
//! use onedrive_cli::{Authenticator, Config, Credentials, DriveClient, Session, TokenManager};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new(Credentials::new("client-id", "secret"), "http://localhost:5050/");
//!
//!     let code = Authenticator::new(&config).authenticate()?;
//!     let mut tokens = TokenManager::new(&config);
//!     tokens.exchange(&code).await?;
//!
//!     let mut session = Session::new(tokens, DriveClient::new(&config.endpoints.api_base));
//!     for item in session.list_root_items().await? {
//!         println!("{}", item);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod token;
pub mod url_parser;

// Re-exports for convenience
pub use auth::Authenticator;
pub use client::{DriveClient, Session};
pub use config::{Config, Credentials, Endpoints, RefreshPolicy, Stage};
pub use error::{DriveError, Result};
pub use models::{DriveItem, TokenSet};
pub use token::TokenManager;
pub use url_parser::extract_code;
