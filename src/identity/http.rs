use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::CredentialIssuer;
use crate::models::User;

/// Asks an external identity service to mint the credential.
pub struct HttpIdentityIssuer {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct IssueResponse {
    credential: String,
}

impl HttpIdentityIssuer {
    pub fn new(url: String, api_key: String) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            url,
            api_key,
        })
    }
}

#[async_trait]
impl CredentialIssuer for HttpIdentityIssuer {
    async fn issue(&self, user: &User) -> Result<String, String> {
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "uid": user.id, "email": user.email }))
            .send()
            .await
            .map_err(|e| format!("Identity service request failed: {e}"))?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(format!("No identity account for {}", user.email)),
            status if !status.is_success() => {
                let body = resp.text().await.unwrap_or_default();
                Err(format!("Identity service error {status}: {body}"))
            }
            _ => resp
                .json::<IssueResponse>()
                .await
                .map(|r| r.credential)
                .map_err(|e| format!("Invalid identity service response: {e}")),
        }
    }
}
