use super::handlers;
use axum::{
    routing::{delete, get, put},
    Router,
};

/// Creates the budgets router with all budget and expense routes
pub fn budgets_routes() -> Router {
    Router::new()
        .route(
            "/api/budgets",
            get(handlers::get_budgets).post(handlers::create_budget),
        )
        .route(
            "/api/budgets/:id",
            put(handlers::update_budget).delete(handlers::delete_budget),
        )
        .route(
            "/api/budgets/:id/expenses",
            get(handlers::get_expenses).post(handlers::create_expense),
        )
        .route(
            "/api/budgets/:id/expenses/:expense_id",
            delete(handlers::delete_expense),
        )
}
