//! Microsoft Graph client for OneDrive listing.

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, DriveItem, DriveItemList};
use crate::token::TokenManager;

/// Path of the root folder's children, relative to the Graph root.
const ROOT_CHILDREN_PATH: &str = "me/drive/root/children";

/// Status reported when the request never got an HTTP response.
pub const NO_RESPONSE: u16 = 0;

/// Client for the OneDrive endpoints of Microsoft Graph.
pub struct DriveClient {
    api_base: String,
    http: Client,
}

impl DriveClient {
    /// Create a new DriveClient.
    ///
    /// # Arguments
    /// * `api_base` - Graph root URL, ending in `/`
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            http: Client::new(),
        }
    }

    /// List the items in the drive's root folder.
    ///
    /// Only the first page is returned.
    pub async fn list_root_items(&self, access_token: &str) -> Result<Vec<DriveItem>> {
        let url = format!("{}{}", self.api_base, ROOT_CHILDREN_PATH);
        debug!(%url, "Listing root folder");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| DriveError::ApiRequest {
                status: NO_RESPONSE,
                message: e.to_string(),
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| DriveError::ApiRequest {
            status: status.as_u16(),
            message: format!("failed to read listing response: {}", e),
        })?;

        if !status.is_success() {
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(DriveError::ApiRequest {
                    status: status.as_u16(),
                    message: format!("{}: {}", api_error.error.code, api_error.error.message),
                });
            }
            return Err(DriveError::ApiRequest {
                status: status.as_u16(),
                message: body,
            });
        }

        let list: DriveItemList =
            serde_json::from_str(&body).map_err(|e| DriveError::ApiRequest {
                status: status.as_u16(),
                message: format!("malformed listing response: {}", e),
            })?;

        if list.next_link.is_some() {
            warn!(
                fetched = list.value.len(),
                "Root folder has more items than one page; only the first page is listed"
            );
        }

        Ok(list.value)
    }
}

/// Token manager and drive client bound together, so every protected call
/// refreshes the token first.
pub struct Session {
    tokens: TokenManager,
    drive: DriveClient,
}

impl Session {
    pub fn new(tokens: TokenManager, drive: DriveClient) -> Self {
        Self { tokens, drive }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// List the root folder with a freshly checked access token.
    pub async fn list_root_items(&mut self) -> Result<Vec<DriveItem>> {
        let access_token = self.tokens.current_access_token().await?;
        self.drive.list_root_items(&access_token).await
    }
}

#[cfg(test)]
mod tests {
    // Tests are in tests/client_test.rs
}
