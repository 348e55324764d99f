use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::{deserialize_lenient_f64, deserialize_lenient_string};

/// Description of the synthetic expense written by a `currentAmount` override
pub const MANUAL_UPDATE_DESCRIPTION: &str = "Manual Update";
/// Description of the expense carrying an imported row's current amount
pub const IMPORTED_AMOUNT_DESCRIPTION: &str = "Imported Amount";
pub const DEFAULT_CATEGORY: &str = "General";

/// A budget as returned to callers. `current_amount` is computed in SQL from the
/// budget's expenses on every read and has no backing column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub goal: f64,
    pub current_amount: f64,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub budget_id: String,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: String,
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateBudgetRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub goal: Option<f64>,
}

/// Partial update. Absent, empty or zero values leave the field untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub goal: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub current_amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateExpenseRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// Validated input for a budget insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub name: String,
    pub goal: f64,
}

/// Validated input for an expense insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    pub budget: Budget,
}

#[derive(Debug, Serialize)]
pub struct BudgetsResponse {
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub expense: Expense,
}

#[derive(Debug, Serialize)]
pub struct ExpensesResponse {
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
