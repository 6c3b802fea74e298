pub mod http;
pub mod jwt;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::IdentityConfig;
use crate::models::User;

pub use http::HttpIdentityIssuer;
pub use jwt::JwtIssuer;

pub type DynCredentialIssuer = Arc<dyn CredentialIssuer>;

/// Mints the short-lived credential handed back after a successful reset.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn issue(&self, user: &User) -> Result<String, String>;
}

pub fn from_config(config: &IdentityConfig) -> Result<Option<DynCredentialIssuer>, String> {
    let issuer: DynCredentialIssuer = match config {
        IdentityConfig::Disabled => return Ok(None),
        IdentityConfig::Jwt { secret } => Arc::new(JwtIssuer::new(secret.clone())),
        IdentityConfig::Http { url, api_key } => {
            Arc::new(HttpIdentityIssuer::new(url.clone(), api_key.clone())?)
        }
    };
    Ok(Some(issuer))
}
