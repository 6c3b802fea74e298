pub mod params;
pub mod reset;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/api/issue-reset",
            get(reset::issue_reset)
                .post(reset::issue_reset)
                .options(reset::preflight),
        )
        .route(
            "/api/validate-reset",
            get(reset::validate_reset)
                .post(reset::validate_reset)
                .options(reset::preflight),
        )
        .route(
            "/api/consume-reset",
            get(reset::consume_reset)
                .post(reset::consume_reset)
                .options(reset::preflight),
        )
}
