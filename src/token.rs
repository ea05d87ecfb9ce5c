//! OAuth2 token lifecycle: code exchange and refresh.

use std::time::SystemTime;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::{Config, Credentials, RefreshPolicy};
use crate::error::{DriveError, Result};
use crate::models::{TokenResponse, TokenSet};

/// Holds the current token pair and keeps it fresh.
pub struct TokenManager {
    credentials: Credentials,
    token_url: String,
    redirect_uri: String,
    policy: RefreshPolicy,
    http: Client,
    tokens: Option<TokenSet>,
}

impl TokenManager {
    /// Create a token manager with no tokens held yet.
    pub fn new(config: &Config) -> Self {
        Self {
            credentials: config.credentials.clone(),
            token_url: config.endpoints.token_url.clone(),
            redirect_uri: config.redirect_uri.clone(),
            policy: config.refresh_policy,
            http: Client::new(),
            tokens: None,
        }
    }

    /// The held token set, if any.
    pub fn tokens(&self) -> Option<&TokenSet> {
        self.tokens.as_ref()
    }

    /// Exchange a single-use authorization code for a token pair.
    ///
    /// Never retried: the code is consumed by the first attempt.
    pub async fn exchange(&mut self, code: &str) -> Result<&TokenSet> {
        let scope = self.scope();
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("scope", scope.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        let (response, reason) = self
            .request_tokens(&params)
            .await
            .map_err(DriveError::AuthExchange)?;
        let tokens =
            TokenSet::from_response(response).ok_or(DriveError::AuthExchange(reason))?;

        info!("Authorization code exchanged for tokens");
        Ok(&*self.tokens.insert(tokens))
    }

    /// Refresh the token pair if it is stale. No-op otherwise.
    pub async fn refresh(&mut self) -> Result<()> {
        let refresh_token = match &self.tokens {
            Some(tokens) if self.is_stale(tokens) => tokens.refresh_token.clone(),
            Some(_) => return Ok(()),
            None => return Err(DriveError::NotAuthenticated),
        };

        let scope = self.scope();
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("scope", scope.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        let (response, reason) = self
            .request_tokens(&params)
            .await
            .map_err(DriveError::Refresh)?;
        let tokens = TokenSet::from_response(response).ok_or(DriveError::Refresh(reason))?;

        debug!("Access token refreshed");
        self.tokens = Some(tokens);
        Ok(())
    }

    /// Precondition for every protected call.
    pub async fn ensure_fresh_token(&mut self) -> Result<()> {
        self.refresh().await
    }

    /// The current access token, refreshed first if stale.
    ///
    /// The returned copy is invalid once a later refresh completes.
    pub async fn current_access_token(&mut self) -> Result<String> {
        self.ensure_fresh_token().await?;
        self.tokens
            .as_ref()
            .map(|tokens| tokens.access_token.clone())
            .ok_or(DriveError::NotAuthenticated)
    }

    /// Whether `tokens` must be refreshed before use.
    ///
    /// `EveryCall` compares `obtained_at <= now`, which holds for any token
    /// already minted, so every protected call refreshes.
    pub fn is_stale(&self, tokens: &TokenSet) -> bool {
        let now = SystemTime::now();
        match self.policy {
            RefreshPolicy::EveryCall => tokens.obtained_at <= now,
            RefreshPolicy::MaxAge(max_age) => tokens
                .obtained_at
                .checked_add(max_age)
                .is_some_and(|deadline| deadline <= now),
        }
    }

    fn scope(&self) -> String {
        self.credentials.scope.join(" ")
    }

    /// POST a form to the token endpoint.
    ///
    /// On success returns the parsed body together with the reason it would
    /// be rejected if it lacks tokens. Transport, status and parse failures
    /// come back as a message for the caller to wrap.
    async fn request_tokens(
        &self,
        params: &[(&str, &str)],
    ) -> std::result::Result<(TokenResponse, String), String> {
        debug!(url = %self.token_url, "Requesting tokens");

        let response = self
            .http
            .post(&self.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| format!("Status {}: malformed token response: {}", status, e))?;

        if !status.is_success() {
            return Err(format!("Status {}: {}", status, parsed.failure_reason()));
        }

        let reason = parsed.failure_reason();
        Ok((parsed, reason))
    }
}
