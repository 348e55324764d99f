use super::models::{
    BudgetResponse, BudgetsResponse, CreateBudgetRequest, CreateExpenseRequest, ExpenseResponse,
    ExpensesResponse, MessageResponse, UpdateBudgetRequest,
};
use super::services::BudgetsService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, ApiJson, AppState};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

// ============================================================================
// Budget CRUD Handlers
// ============================================================================

/// GET /api/budgets - List the caller's budgets with their current amounts
pub async fn get_budgets(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let budgets_service = BudgetsService::new(state.db.clone());

    let budgets = budgets_service.list_budgets(&user.id).await?;

    Ok(Json(BudgetsResponse { budgets }))
}

/// POST /api/budgets - Create a new budget
pub async fn create_budget(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    ApiJson(request): ApiJson<CreateBudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let budgets_service = BudgetsService::new(state.db.clone());

    let budget = budgets_service
        .create_budget(&user.id, user.plan, request)
        .await?;

    Ok(Json(BudgetResponse { budget }))
}

/// PUT /api/budgets/:id - Update name, goal or the manual current amount
pub async fn update_budget(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(budget_id): Path<String>,
    ApiJson(request): ApiJson<UpdateBudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let budgets_service = BudgetsService::new(state.db.clone());

    let budget = budgets_service
        .update_budget(&user.id, &budget_id, request)
        .await?;

    Ok(Json(BudgetResponse { budget }))
}

/// DELETE /api/budgets/:id - Delete a budget and its expenses
pub async fn delete_budget(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(budget_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let budgets_service = BudgetsService::new(state.db.clone());

    budgets_service.delete_budget(&user.id, &budget_id).await?;

    Ok(Json(MessageResponse {
        message: "Budget deleted successfully".to_string(),
    }))
}

// ============================================================================
// Expense Handlers
// ============================================================================

/// GET /api/budgets/:id/expenses
pub async fn get_expenses(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(budget_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let budgets_service = BudgetsService::new(state.db.clone());

    let expenses = budgets_service.list_expenses(&user.id, &budget_id).await?;

    Ok(Json(ExpensesResponse { expenses }))
}

/// POST /api/budgets/:id/expenses
pub async fn create_expense(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(budget_id): Path<String>,
    ApiJson(request): ApiJson<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let budgets_service = BudgetsService::new(state.db.clone());

    let expense = budgets_service
        .add_expense(&user.id, &budget_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(ExpenseResponse { expense })))
}

/// DELETE /api/budgets/:id/expenses/:expense_id
pub async fn delete_expense(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path((budget_id, expense_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let budgets_service = BudgetsService::new(state.db.clone());

    budgets_service
        .delete_expense(&user.id, &budget_id, &expense_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Expense deleted successfully".to_string(),
    }))
}
