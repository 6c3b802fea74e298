#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use pinreset::config::{Config, Environment, IdentityConfig};
use pinreset::email::{OutgoingEmail, Transport, TransportChain, TransportError};
use pinreset::identity::{CredentialIssuer, DynCredentialIssuer};
use pinreset::models::User;
use pinreset::state::{AppState, SharedState};
use pinreset::store::{DynResetStore, MemoryResetStore};

pub const PUBLIC_HOST: &str = "https://wallet.example.com";
pub const APP_SCHEME: &str = "appwallet";

pub fn test_config(environment: Environment) -> Config {
    Config {
        database_url: None,
        environment,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        public_host: PUBLIC_HOST.to_string(),
        app_scheme: APP_SCHEME.to_string(),
        return_debug_link: false,
        log_level: "warn".to_string(),
        sweep_interval: None,
        emailjs: None,
        smtp: None,
        identity: IdentityConfig::Disabled,
    }
}

/// Captures every message instead of delivering it.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub name: String,
    pub outbox: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl RecordingTransport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outbox: Arc::default(),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox.lock().unwrap().clone()
    }

    /// Raw token from the most recent web link.
    pub fn last_token(&self) -> Option<String> {
        self.sent().last().and_then(|m| token_from_text(&m.text_body))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
        self.outbox.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    fn name(&self) -> &str {
        "failing"
    }

    async fn send(&self, _: &OutgoingEmail) -> Result<(), TransportError> {
        Err(TransportError("relay unavailable".to_string()))
    }
}

pub struct StaticIssuer;

#[async_trait]
impl CredentialIssuer for StaticIssuer {
    async fn issue(&self, user: &User) -> Result<String, String> {
        Ok(format!("credential-for-{}", user.email))
    }
}

pub struct FailingIssuer;

#[async_trait]
impl CredentialIssuer for FailingIssuer {
    async fn issue(&self, user: &User) -> Result<String, String> {
        Err(format!("no identity account for {}", user.email))
    }
}

/// Pull `token=<hex>` out of the first link in a message body.
pub fn token_from_text(text: &str) -> Option<String> {
    let start = text.find("token=")? + "token=".len();
    let token: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect();
    (!token.is_empty()).then_some(token)
}

pub struct TestSetup {
    pub config: Config,
    pub store: Arc<MemoryResetStore>,
    pub transports: Vec<Arc<dyn Transport>>,
    pub issuer: Option<DynCredentialIssuer>,
}

impl TestSetup {
    pub fn new(environment: Environment) -> Self {
        Self {
            config: test_config(environment),
            store: Arc::new(MemoryResetStore::new()),
            transports: Vec::new(),
            issuer: None,
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transports.push(transport);
        self
    }

    pub fn with_issuer(mut self, issuer: DynCredentialIssuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn with_user(self, email: &str) -> Self {
        self.store.add_user(email).unwrap();
        self
    }

    pub fn state(&self) -> SharedState {
        let store: DynResetStore = self.store.clone();
        Arc::new(AppState {
            config: self.config.clone(),
            store,
            transports: TransportChain::new(self.transports.clone()),
            issuer: self.issuer.clone(),
        })
    }
}

/// A running test server backed by the in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
    pub store: Arc<MemoryResetStore>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get_query(&self, path: &str, query: &[(&str, &str)]) -> (Value, StatusCode) {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish();
        let resp = self
            .client
            .get(self.url(&format!("{path}?{query}")))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn issue(&self, email: &str) -> (Value, StatusCode) {
        self.post_json("/api/issue-reset", &json!({ "email": email }))
            .await
    }

    pub async fn validate(&self, token: &str) -> (Value, StatusCode) {
        self.post_json("/api/validate-reset", &json!({ "token": token }))
            .await
    }

    pub async fn consume(&self, token: &str) -> (Value, StatusCode) {
        self.post_json("/api/consume-reset", &json!({ "token": token }))
            .await
    }
}

pub async fn spawn_app(setup: TestSetup) -> TestApp {
    let state = setup.state();
    let app = pinreset::router(state.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        state,
        store: setup.store,
    }
}
