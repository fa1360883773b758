//! API routes configuration module

use crate::api::handlers::{generate, health};
use crate::app::App;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

/// Creates the API router, sharing `app` with every handler
pub fn app(app: Arc<App>) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/health", get(health))
        .layer(Extension(app))
}
