pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod identity;
pub mod models;
pub mod reset;
pub mod routes;
pub mod state;
pub mod store;
pub mod token;
pub mod worker;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::TransportChain;
use crate::state::{AppState, SharedState};
use crate::store::DynResetStore;

/// Wire transports and the credential issuer from config around `store`.
pub fn build_app(config: Config, store: DynResetStore) -> Result<(Router, SharedState), String> {
    let transports = TransportChain::from_config(&config);
    if transports.is_empty() {
        if config.is_production() {
            tracing::error!("No email transport configured; issue-reset will refuse requests");
        } else {
            tracing::warn!("No email transport configured; reset links will be returned inline");
        }
    }

    if config.return_debug_link && config.is_production() {
        tracing::warn!("PINRESET_RETURN_DEBUG_LINK is set in production; reset links leak into responses");
    }

    let issuer = identity::from_config(&config.identity)?;
    if issuer.is_none() {
        tracing::info!("No credential issuer configured; consume-reset will not return credentials");
    }

    let state: SharedState = Arc::new(AppState {
        config,
        store,
        transports,
        issuer,
    });

    Ok((router(state.clone()), state))
}

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
