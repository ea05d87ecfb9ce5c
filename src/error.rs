//! Error types for the onedrive_cli crate.

use thiserror::Error;

/// Errors that can occur while logging in to or listing OneDrive.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Invalid redirect URL: {0}")]
    AuthCodeParse(String),

    #[error("Authorization code exchange failed: {0}")]
    AuthExchange(String),

    #[error("Token refresh failed: {0}")]
    Refresh(String),

    /// `status` is 0 when no HTTP response was received.
    #[error("API error ({status}): {message}")]
    ApiRequest { status: u16, message: String },

    #[error("No tokens held, exchange an authorization code first")]
    NotAuthenticated,

    #[error("Stage '{0}' requires an explicit redirect URI")]
    MissingRedirectUri(String),

    #[error("Failed to read input: {0}")]
    InputError(#[from] std::io::Error),
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
