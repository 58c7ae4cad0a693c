//! HTTP adapter exposing `POST /search`
//!
//! Handlers only translate between JSON and `KeywordSearch`; all remote
//! access lives behind `ContentSource`.

pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{routing::post, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::search::KeywordSearch;

pub use handlers::*;

/// Build the application router
///
/// Panics raised while handling a request are turned into the generic
/// 500 response; every request, including those, is logged.
pub fn router(search: Arc<KeywordSearch>) -> Router {
    Router::new()
        .route("/search", post(handlers::search_handler))
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(axum::middleware::from_fn(middleware::log_request))
        .with_state(search)
}
