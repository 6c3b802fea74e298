use std::convert::Infallible;

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use bytes::Bytes;
use serde::Deserialize;

/// Endpoint input, read from the query string and, for non-GET requests,
/// from a JSON or form-urlencoded body. Body fields win over query fields.
/// Unparseable bodies are treated as empty.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetParams {
    pub email: Option<String>,
    pub token: Option<String>,
}

impl ResetParams {
    fn merge(&mut self, other: ResetParams) {
        if other.email.is_some() {
            self.email = other.email;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
    }

    fn from_pairs(raw: &[u8]) -> Self {
        let mut params = ResetParams::default();
        for (key, value) in form_urlencoded::parse(raw) {
            match key.as_ref() {
                "email" => params.email = Some(value.into_owned()),
                "token" => params.token = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

impl<S: Send + Sync> FromRequest<S> for ResetParams {
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut params = req
            .uri()
            .query()
            .map(|q| ResetParams::from_pairs(q.as_bytes()))
            .unwrap_or_default();

        if req.method() == Method::GET {
            return Ok(params);
        }

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = Bytes::from_request(req, state).await.unwrap_or_default();
        if !body.is_empty() {
            params.merge(parse_body(content_type.as_deref(), &body));
        }

        Ok(params)
    }
}

fn parse_body(content_type: Option<&str>, body: &[u8]) -> ResetParams {
    match content_type {
        Some(ct) if ct.contains("application/json") => {
            serde_json::from_slice(body).unwrap_or_default()
        }
        Some(ct) if ct.contains("application/x-www-form-urlencoded") => {
            ResetParams::from_pairs(body)
        }
        // Try JSON first, then form-urlencoded
        _ => serde_json::from_slice(body).unwrap_or_else(|_| ResetParams::from_pairs(body)),
    }
}
