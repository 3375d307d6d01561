mod errors;
mod handlers;
mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub use errors::HttpError;
pub use state::HttpState;

pub fn router(state: HttpState) -> Router<()> {
    Router::new()
        .route("/analytics", get(handlers::analytics))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
