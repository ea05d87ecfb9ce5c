//! Authorization URL construction and redirect URL parsing.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{DriveError, Result};

/// `?code=` followed by the value, which ends at the next `&` or `#`.
static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?code=([^&#\s]*)").expect("Invalid code regex"));

// Errors describe the problem only; the pasted text holds a live code.
const MISSING_CODE: &str = "expected a non-empty ?code= parameter";
const UNDECODABLE_CODE: &str = "code is not valid percent-encoded UTF-8";

/// Build the browser-facing authorization URL.
///
/// Each permission is percent-encoded and the list is joined with a literal
/// `+`.
///
/// # Examples
///
/// ```
/// use onedrive_cli::url_parser::authorization_url;
///
/// let url = authorization_url(
///     "https://login.example.com/authorize",
///     "abc",
///     &["a".to_string(), "b".to_string()],
///     "http://localhost:5050/",
/// );
/// assert!(url.contains("scope=a+b"));
/// assert!(url.ends_with("redirect_uri=http%3A%2F%2Flocalhost%3A5050%2F"));
/// ```
pub fn authorization_url(
    authorize_url: &str,
    client_id: &str,
    scope: &[String],
    redirect_uri: &str,
) -> String {
    let scope = scope
        .iter()
        .map(|permission| urlencoding::encode(permission).into_owned())
        .collect::<Vec<_>>()
        .join("+");

    format!(
        "{}?client_id={}&scope={}&response_type=code&redirect_uri={}",
        authorize_url,
        urlencoding::encode(client_id),
        scope,
        urlencoding::encode(redirect_uri),
    )
}

/// Extract the authorization code from a pasted redirect URL.
///
/// # Examples
///
/// ```
/// use onedrive_cli::url_parser::extract_code;
///
/// let code = extract_code("http://x/?code=XYZ123&state=1").unwrap();
/// assert_eq!(code, "XYZ123");
/// ```
pub fn extract_code(pasted: &str) -> Result<String> {
    let trimmed = pasted.trim();

    let raw = CODE_REGEX
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .filter(|code| !code.is_empty())
        .ok_or_else(|| DriveError::AuthCodeParse(MISSING_CODE.to_string()))?;

    urlencoding::decode(raw)
        .map(|code| code.into_owned())
        .map_err(|_| DriveError::AuthCodeParse(UNDECODABLE_CODE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_code() {
        let url = "http://localhost:5050/?code=M.C507_BAY.2.U.abc";
        assert_eq!(extract_code(url).unwrap(), "M.C507_BAY.2.U.abc");
    }

    #[test]
    fn test_extract_code_stops_at_next_param() {
        assert_eq!(extract_code("http://x/?code=XYZ123&state=1").unwrap(), "XYZ123");
        assert_eq!(extract_code("http://x/?code=XYZ123#frag").unwrap(), "XYZ123");
    }

    #[test]
    fn test_extract_code_percent_decodes() {
        assert_eq!(extract_code("http://x/?code=a%2Bb").unwrap(), "a+b");
    }

    #[test]
    fn test_missing_code() {
        assert!(extract_code("http://x/?state=1").is_err());
        assert!(extract_code("http://x/?code=").is_err());
        assert!(extract_code("http://x/?codex=1").is_err());
        assert!(extract_code("").is_err());
    }

    #[test]
    fn test_error_does_not_echo_pasted_text() {
        let err = extract_code("http://x/?state=1&code=SECRET").unwrap_err();
        assert!(!err.to_string().contains("SECRET"));

        let err = extract_code("http://x/?code=%FF%FE").unwrap_err();
        assert!(matches!(err, DriveError::AuthCodeParse(_)));
        assert!(!err.to_string().contains("%FF"));
    }

    #[test]
    fn test_authorization_url() {
        let url = authorization_url(
            "https://login.example.com/authorize",
            "abc",
            &["a".to_string(), "b".to_string()],
            "http://localhost:5050/",
        );
        assert!(url.starts_with("https://login.example.com/authorize?"));
        assert!(url.contains("client_id=abc"));
        assert!(url.contains("scope=a+b"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A5050%2F"));
    }
}
