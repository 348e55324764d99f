use super::handlers;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates the import/export router
pub fn transfer_routes() -> Router {
    Router::new()
        .route("/api/budgets/import", post(handlers::import_budgets))
        .route("/api/budgets/import/csv", post(handlers::import_budgets_csv))
        .route("/api/budgets/export", get(handlers::export_budgets))
        .route("/api/budgets/template", get(handlers::download_template))
}
