//! Data models for Microsoft identity platform and Graph responses.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An item in a OneDrive folder.
///
/// Only `id` and `name` are typed; every other field the server sends is
/// kept as-is in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DriveItem {
    /// Size in bytes, when the server reported one.
    pub fn size(&self) -> Option<u64> {
        self.extra.get("size").and_then(Value::as_u64)
    }

    /// Whether the item is a folder (Graph marks folders with a `folder` facet).
    pub fn is_folder(&self) -> bool {
        self.extra.contains_key("folder")
    }
}

impl std::fmt::Display for DriveItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_folder() {
            "<dir>".to_string()
        } else {
            self.size()
                .map(format_size)
                .unwrap_or_else(|| "-".to_string())
        };
        write!(f, "{:>10}  {} | item-id > {}", kind, self.name, self.id)
    }
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Response from the `children` listing endpoint.
#[derive(Debug, Deserialize)]
pub struct DriveItemList {
    pub value: Vec<DriveItem>,
    #[serde(default, rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Graph API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

/// Token endpoint response.
///
/// Fields are optional so a missing token surfaces as a typed error rather
/// than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl TokenResponse {
    /// Best description of why the response carries no tokens.
    pub fn failure_reason(&self) -> String {
        match (&self.error, &self.error_description) {
            (_, Some(description)) => description.clone(),
            (Some(error), None) => error.clone(),
            (None, None) => match (&self.access_token, &self.refresh_token) {
                (None, _) => "response has no access_token".to_string(),
                (_, None) => "response has no refresh_token".to_string(),
                _ => "unknown error".to_string(),
            },
        }
    }
}

/// The token pair held by the token manager.
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub obtained_at: SystemTime,
}

impl TokenSet {
    /// Build a token set from a response, stamping it with the current time.
    ///
    /// Returns `None` when either token is missing.
    pub fn from_response(response: TokenResponse) -> Option<Self> {
        Some(Self {
            access_token: response.access_token?,
            refresh_token: response.refresh_token?,
            obtained_at: SystemTime::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_drive_item_keeps_unknown_fields() {
        let json = r#"{
            "id": "01ABC",
            "name": "notes.txt",
            "size": 2048,
            "webUrl": "https://onedrive.live.com/?id=01ABC",
            "file": {"mimeType": "text/plain"}
        }"#;

        let item: DriveItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "01ABC");
        assert_eq!(item.name, "notes.txt");
        assert_eq!(item.size(), Some(2048));
        assert!(!item.is_folder());
        assert!(item.extra.contains_key("webUrl"));
        assert!(!item.extra.contains_key("id"));
    }

    #[test]
    fn test_drive_item_display() {
        let item: DriveItem =
            serde_json::from_str(r#"{"id": "9", "name": "Photos", "folder": {"childCount": 3}}"#)
                .unwrap();

        let display = format!("{}", item);
        assert!(display.contains("<dir>"));
        assert!(display.contains("Photos | item-id > 9"));
    }

    #[test]
    fn test_token_set_requires_both_tokens() {
        let response = TokenResponse {
            access_token: Some("A".to_string()),
            ..Default::default()
        };
        assert_eq!(response.failure_reason(), "response has no refresh_token");
        assert!(TokenSet::from_response(response).is_none());
    }

    #[test]
    fn test_failure_reason_prefers_description() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"error": "invalid_grant", "error_description": "AADSTS70000: code expired"}"#,
        )
        .unwrap();
        assert_eq!(response.failure_reason(), "AADSTS70000: code expired");
    }
}
