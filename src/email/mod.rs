pub mod emailjs;
pub mod smtp;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;

pub use emailjs::EmailJsTransport;
pub use smtp::SmtpMailer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

impl From<String> for TransportError {
    fn from(msg: String) -> Self {
        TransportError(msg)
    }
}

/// A rendered PIN reset message. The raw links travel alongside the bodies
/// for transports that render their own template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub reset_link: String,
    pub deep_link: String,
}

/// Anything that can put an email in front of the user.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError>;
}

/// Result of walking the transport chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent { transport: String },
    NoTransport,
    Failed { errors: Vec<String> },
}

/// Transports in priority order. Delivery stops at the first success.
#[derive(Clone, Default)]
pub struct TransportChain {
    transports: Vec<Arc<dyn Transport>>,
}

impl TransportChain {
    pub fn new(transports: Vec<Arc<dyn Transport>>) -> Self {
        Self { transports }
    }

    /// Transactional-email API first, SMTP relay second.
    pub fn from_config(config: &Config) -> Self {
        let mut transports: Vec<Arc<dyn Transport>> = Vec::new();

        if let Some(emailjs) = &config.emailjs {
            match EmailJsTransport::new(emailjs) {
                Ok(transport) => {
                    tracing::info!("EmailJS transport configured");
                    transports.push(Arc::new(transport));
                }
                Err(e) => tracing::warn!("EmailJS transport not available: {e}"),
            }
        }

        if let Some(smtp) = &config.smtp {
            match SmtpMailer::new(smtp) {
                Ok(mailer) => {
                    tracing::info!("SMTP transport configured");
                    transports.push(Arc::new(mailer));
                }
                Err(e) => tracing::warn!("SMTP transport not available: {e}"),
            }
        }

        Self { transports }
    }

    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    pub async fn deliver(&self, email: &OutgoingEmail) -> Delivery {
        if self.transports.is_empty() {
            return Delivery::NoTransport;
        }

        let mut errors = Vec::new();
        for transport in &self.transports {
            match transport.send(email).await {
                Ok(()) => {
                    return Delivery::Sent {
                        transport: transport.name().to_string(),
                    };
                }
                Err(e) => {
                    tracing::warn!("{} failed: {e}", transport.name());
                    errors.push(format!("{}: {e}", transport.name()));
                }
            }
        }

        Delivery::Failed { errors }
    }
}
