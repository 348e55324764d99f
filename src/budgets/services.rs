use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{
    Budget, CreateBudgetRequest, CreateExpenseRequest, Expense, NewBudget, NewExpense,
    UpdateBudgetRequest, DEFAULT_CATEGORY, MANUAL_UPDATE_DESCRIPTION,
};
use crate::auth::Plan;
use crate::common::helpers::now_timestamp;
use crate::common::validation::is_valid_goal;
use crate::common::{generate_budget_id, generate_expense_id, ApiError};

/// Budget columns with the derived current amount
const BUDGET_SELECT: &str = r#"
    SELECT b.id, b.name, b.goal,
           COALESCE((SELECT SUM(e.amount) FROM expenses e WHERE e.budget_id = b.id), 0.0) AS current_amount,
           b.user_id, b.created_at, b.updated_at
    FROM budgets b
"#;

const EXPENSE_SELECT: &str = r#"
    SELECT id, budget_id, amount, description, category, date, created_at
    FROM expenses
"#;

fn budget_not_found() -> ApiError {
    ApiError::NotFound("Budget not found".to_string())
}

pub struct BudgetsService {
    db: SqlitePool,
}

impl BudgetsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Budget Reads
    // ============================================================================

    /// All budgets owned by the user, newest first
    pub async fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>, ApiError> {
        let query = format!(
            "{} WHERE b.user_id = ? ORDER BY b.created_at DESC, b.rowid DESC",
            BUDGET_SELECT
        );

        let budgets = sqlx::query_as::<_, Budget>(&query)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;

        Ok(budgets)
    }

    /// A single budget owned by the user. Missing and foreign budgets are
    /// reported identically.
    pub async fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget, ApiError> {
        let query = format!("{} WHERE b.id = ? AND b.user_id = ?", BUDGET_SELECT);

        sqlx::query_as::<_, Budget>(&query)
            .bind(budget_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(budget_not_found)
    }

    pub async fn count_budgets(&self, user_id: &str) -> Result<i64, ApiError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM budgets WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }

    // ============================================================================
    // Budget Writes
    // ============================================================================

    /// Validates, checks the plan quota, then inserts. The quota is a read-then-write
    /// check, so concurrent creates may overshoot it slightly.
    pub async fn create_budget(
        &self,
        user_id: &str,
        plan: Plan,
        request: CreateBudgetRequest,
    ) -> Result<Budget, ApiError> {
        let new_budget = request.into_new_budget()?;

        let existing = self.count_budgets(user_id).await?;
        if !plan.allows(existing, 1) {
            warn!(
                user_id = %user_id,
                existing = existing,
                "Budget creation rejected: plan limit reached"
            );
            return Err(ApiError::QuotaExceeded(
                "Budget limit reached. Upgrade to premium for unlimited budgets.".to_string(),
            ));
        }

        let budget_id = self.insert_budget(user_id, &new_budget).await?;

        info!(user_id = %user_id, budget_id = %budget_id, "Created budget");

        self.get_budget(user_id, &budget_id).await
    }

    /// Inserts a budget without quota checks and returns its id
    pub async fn insert_budget(
        &self,
        user_id: &str,
        new_budget: &NewBudget,
    ) -> Result<String, ApiError> {
        let budget_id = generate_budget_id();
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO budgets (id, name, goal, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&budget_id)
        .bind(&new_budget.name)
        .bind(new_budget.goal)
        .bind(user_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await?;

        Ok(budget_id)
    }

    /// Applies the supplied name and goal when they are usable and records a
    /// `current_amount` override as the budget's single "Manual Update" expense.
    /// An empty name or a zero goal is ignored rather than rejected.
    pub async fn update_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        request: UpdateBudgetRequest,
    ) -> Result<Budget, ApiError> {
        self.get_budget(user_id, budget_id).await?;

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let goal = request.goal.filter(|g| is_valid_goal(Some(*g)));
        let current_amount = request.current_amount;

        if name.is_none() && goal.is_none() && current_amount.is_none() {
            return self.get_budget(user_id, budget_id).await;
        }

        let now = now_timestamp();
        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            UPDATE budgets
            SET name = COALESCE(?, name), goal = COALESCE(?, goal), updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(name.as_deref())
        .bind(goal)
        .bind(&now)
        .bind(budget_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if let Some(amount) = current_amount {
            sqlx::query(
                r#"
                INSERT INTO expenses (id, budget_id, amount, description, category, date, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(budget_id, description) WHERE description = 'Manual Update'
                DO UPDATE SET amount = excluded.amount, date = excluded.date
                "#,
            )
            .bind(generate_expense_id())
            .bind(budget_id)
            .bind(amount)
            .bind(MANUAL_UPDATE_DESCRIPTION)
            .bind(DEFAULT_CATEGORY)
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            user_id = %user_id,
            budget_id = %budget_id,
            manual_amount = current_amount.is_some(),
            "Updated budget"
        );

        self.get_budget(user_id, budget_id).await
    }

    /// Deletes the budget and all of its expenses in one transaction
    pub async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<(), ApiError> {
        let mut tx = self.db.begin().await?;

        let owned: Option<(String,)> =
            sqlx::query_as("SELECT id FROM budgets WHERE id = ? AND user_id = ?")
                .bind(budget_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        if owned.is_none() {
            return Err(budget_not_found());
        }

        let expenses = sqlx::query("DELETE FROM expenses WHERE budget_id = ?")
            .bind(budget_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM budgets WHERE id = ? AND user_id = ?")
            .bind(budget_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            user_id = %user_id,
            budget_id = %budget_id,
            expenses_deleted = expenses.rows_affected(),
            "Deleted budget"
        );

        Ok(())
    }

    // ============================================================================
    // Expenses
    // ============================================================================

    pub async fn list_expenses(
        &self,
        user_id: &str,
        budget_id: &str,
    ) -> Result<Vec<Expense>, ApiError> {
        self.get_budget(user_id, budget_id).await?;

        let query = format!(
            "{} WHERE budget_id = ? ORDER BY date DESC, created_at DESC",
            EXPENSE_SELECT
        );

        let expenses = sqlx::query_as::<_, Expense>(&query)
            .bind(budget_id)
            .fetch_all(&self.db)
            .await?;

        Ok(expenses)
    }

    pub async fn add_expense(
        &self,
        user_id: &str,
        budget_id: &str,
        request: CreateExpenseRequest,
    ) -> Result<Expense, ApiError> {
        self.get_budget(user_id, budget_id).await?;

        let new_expense = request.into_new_expense()?;
        let expense_id = self.insert_expense(budget_id, &new_expense).await?;

        info!(
            user_id = %user_id,
            budget_id = %budget_id,
            expense_id = %expense_id,
            "Recorded expense"
        );

        let query = format!("{} WHERE id = ?", EXPENSE_SELECT);
        let expense = sqlx::query_as::<_, Expense>(&query)
            .bind(&expense_id)
            .fetch_one(&self.db)
            .await?;

        Ok(expense)
    }

    /// Inserts an expense for a budget whose ownership was already checked
    pub async fn insert_expense(
        &self,
        budget_id: &str,
        new_expense: &NewExpense,
    ) -> Result<String, ApiError> {
        let expense_id = generate_expense_id();

        sqlx::query(
            r#"
            INSERT INTO expenses (id, budget_id, amount, description, category, date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense_id)
        .bind(budget_id)
        .bind(new_expense.amount)
        .bind(&new_expense.description)
        .bind(&new_expense.category)
        .bind(&new_expense.date)
        .bind(now_timestamp())
        .execute(&self.db)
        .await?;

        Ok(expense_id)
    }

    pub async fn delete_expense(
        &self,
        user_id: &str,
        budget_id: &str,
        expense_id: &str,
    ) -> Result<(), ApiError> {
        self.get_budget(user_id, budget_id).await?;

        let result = sqlx::query("DELETE FROM expenses WHERE id = ? AND budget_id = ?")
            .bind(expense_id)
            .bind(budget_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Expense not found".to_string()));
        }

        info!(
            user_id = %user_id,
            budget_id = %budget_id,
            expense_id = %expense_id,
            "Deleted expense"
        );

        Ok(())
    }
}
