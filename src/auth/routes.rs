//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /api/me` - Get current user information
pub fn auth_routes() -> Router {
    Router::new().route("/api/me", get(handlers::me_handler))
}
