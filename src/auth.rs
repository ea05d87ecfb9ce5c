//! Interactive authorization-code acquisition.

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::url_parser::{authorization_url, extract_code};

const PASTE_PROMPT: &str = "Paste the URL here: ";

/// Drives the operator through the browser login and captures the code.
pub struct Authenticator {
    authorize_url: String,
    client_id: String,
    scope: Vec<String>,
    redirect_uri: String,
}

impl Authenticator {
    /// Create a new authenticator from the startup configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            authorize_url: config.endpoints.authorize_url.clone(),
            client_id: config.credentials.client_id.clone(),
            scope: config.credentials.scope.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    /// The URL the operator must open in a browser.
    pub fn authorization_url(&self) -> String {
        authorization_url(
            &self.authorize_url,
            &self.client_id,
            &self.scope,
            &self.redirect_uri,
        )
    }

    /// Print the login link and read the redirected URL from the terminal
    /// without echoing it. Blocks until the operator answers.
    pub fn authenticate(&self) -> Result<String> {
        self.authenticate_with(|prompt| rpassword::prompt_password(prompt))
    }

    /// Same as [`Authenticator::authenticate`] with a caller-supplied reader.
    pub fn authenticate_with<F>(&self, read_redirect: F) -> Result<String>
    where
        F: FnOnce(&str) -> std::io::Result<String>,
    {
        println!("Click over this link: {}", self.authorization_url());
        println!("Sign in to your account and copy the whole redirected URL.");

        let pasted = read_redirect(PASTE_PROMPT)?;
        println!();

        let code = extract_code(&pasted)?;
        debug!(code_len = code.len(), "Authorization code captured");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::error::DriveError;

    fn config() -> Config {
        Config::new(
            Credentials::new("abc", "secret").with_scope(["a", "b"]),
            "http://localhost:5050/",
        )
    }

    #[test]
    fn test_authenticate_with_pasted_url() {
        let auth = Authenticator::new(&config());
        let code = auth
            .authenticate_with(|prompt| {
                assert_eq!(prompt, PASTE_PROMPT);
                Ok("http://localhost:5050/?code=XYZ123&state=1\n".to_string())
            })
            .unwrap();
        assert_eq!(code, "XYZ123");
    }

    #[test]
    fn test_authenticate_rejects_url_without_code() {
        let auth = Authenticator::new(&config());
        let result = auth.authenticate_with(|_| {
            Ok("http://localhost:5050/?error=access_denied".to_string())
        });
        assert!(matches!(result, Err(DriveError::AuthCodeParse(_))));
    }

    #[test]
    fn test_authenticate_propagates_read_failure() {
        let auth = Authenticator::new(&config());
        let result = auth.authenticate_with(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "closed"))
        });
        assert!(matches!(result, Err(DriveError::InputError(_))));
    }

    #[test]
    fn test_authorization_url_uses_config() {
        let url = Authenticator::new(&config()).authorization_url();
        assert!(url.starts_with("https://login.microsoftonline.com/common/oauth2/v2.0/authorize?"));
        assert!(url.contains("client_id=abc"));
        assert!(url.contains("scope=a+b"));
    }
}
