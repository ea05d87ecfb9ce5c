//! Configuration built once at startup and passed to each component.

use std::time::Duration;

use clap::ValueEnum;

use crate::error::{DriveError, Result};

/// Microsoft identity platform host.
const LOGIN_BASE: &str = "https://login.microsoftonline.com";

/// Microsoft Graph v1.0 root. The trailing slash is significant.
pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0/";

/// Redirect URI registered for local development.
pub const DEV_REDIRECT_URI: &str = "http://localhost:5050/";

/// Permissions requested when none are given.
pub const DEFAULT_SCOPE: [&str; 3] = ["offline_access", "files.readwrite", "User.Read"];

/// Application credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub scope: Vec<String>,
}

impl Credentials {
    /// Credentials with the default permission set.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: DEFAULT_SCOPE.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the requested permissions.
    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }
}

/// OAuth2 and Graph endpoint URLs.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub authorize_url: String,
    pub token_url: String,
    /// Graph root, ending in `/`.
    pub api_base: String,
}

impl Endpoints {
    /// Endpoints for the given Azure AD tenant (`common`, `consumers`, a GUID...).
    pub fn for_tenant(tenant: &str) -> Self {
        Self {
            authorize_url: format!("{}/{}/oauth2/v2.0/authorize", LOGIN_BASE, tenant),
            token_url: format!("{}/{}/oauth2/v2.0/token", LOGIN_BASE, tenant),
            api_base: GRAPH_API_BASE.to_string(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::for_tenant("common")
    }
}

/// Deployment stage, which picks the default redirect URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Stage {
    #[default]
    Dev,
    Prod,
}

impl Stage {
    /// Resolve the redirect URI for this stage, preferring an explicit override.
    pub fn redirect_uri(self, explicit: Option<String>) -> Result<String> {
        match (explicit, self) {
            (Some(uri), _) => Ok(uri),
            (None, Stage::Dev) => Ok(DEV_REDIRECT_URI.to_string()),
            (None, Stage::Prod) => Err(DriveError::MissingRedirectUri("prod".to_string())),
        }
    }
}

/// When a held token is considered stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Refresh before every protected call.
    #[default]
    EveryCall,
    /// Refresh once the token is older than the given age.
    MaxAge(Duration),
}

/// Everything the login and listing flow needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub redirect_uri: String,
    pub endpoints: Endpoints,
    pub refresh_policy: RefreshPolicy,
}

impl Config {
    pub fn new(credentials: Credentials, redirect_uri: impl Into<String>) -> Self {
        Self {
            credentials,
            redirect_uri: redirect_uri.into(),
            endpoints: Endpoints::default(),
            refresh_policy: RefreshPolicy::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }
}
