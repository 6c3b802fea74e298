use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{OutgoingEmail, Transport, TransportError};
use crate::config::EmailJsConfig;

/// EmailJS transactional-email API. See [`crate::config::EMAILJS_DEFAULT_URL`]
/// for the template parameters it sends.
pub struct EmailJsTransport {
    client: reqwest::Client,
    config: EmailJsConfig,
}

impl EmailJsTransport {
    pub fn new(config: &EmailJsConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl Transport for EmailJsTransport {
    fn name(&self) -> &str {
        "emailjs"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
        let payload = json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.user_id,
            "template_params": {
                "to_email": email.to,
                "subject": email.subject,
                "reset_link": email.reset_link,
                "deep_link": email.deep_link,
                "message_html": email.html_body,
                "message_text": email.text_body,
            },
        });

        let resp = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| format!("EmailJS request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError(format!("EmailJS error {status}: {body}")));
        }

        Ok(())
    }
}
