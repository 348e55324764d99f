use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{BudgetRow, ImportSummary};
use crate::auth::Plan;
use crate::budgets::models::NewBudget;
use crate::budgets::BudgetsService;
use crate::common::ApiError;

pub struct TransferService {
    budgets: BudgetsService,
}

impl TransferService {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            budgets: BudgetsService::new(db),
        }
    }

    pub async fn import_budgets(
        &self,
        user_id: &str,
        plan: Plan,
        rows: Vec<BudgetRow>,
    ) -> Result<ImportSummary, ApiError> {
        self.import_entries(user_id, plan, rows.into_iter().map(Some).collect())
            .await
    }

    /// Imports entries independently. The plan quota is checked once for the whole
    /// batch up front; after that a bad entry is recorded and the next one is
    /// processed. Rows already written stay committed. `None` marks an entry
    /// that could not be read as a row at all.
    pub async fn import_entries(
        &self,
        user_id: &str,
        plan: Plan,
        entries: Vec<Option<BudgetRow>>,
    ) -> Result<ImportSummary, ApiError> {
        if entries.is_empty() {
            return Err(ApiError::BadRequest("Invalid budgets data".to_string()));
        }

        let existing = self.budgets.count_budgets(user_id).await?;
        if !plan.allows(existing, entries.len()) {
            warn!(
                user_id = %user_id,
                existing = existing,
                incoming = entries.len(),
                "Budget import rejected: plan limit would be exceeded"
            );
            return Err(ApiError::QuotaExceeded(
                "Budget limit would be exceeded. Upgrade to premium for unlimited budgets."
                    .to_string(),
            ));
        }

        let mut summary = ImportSummary::default();

        for entry in &entries {
            let Some(row) = entry else {
                summary.record_failure("Invalid data for budget: Unknown".to_string());
                continue;
            };

            let Some(new_budget) = row.to_new_budget() else {
                summary.record_failure(format!("Invalid data for budget: {}", row.display_name()));
                continue;
            };

            match self.import_row(user_id, row, &new_budget).await {
                Ok(()) => summary.record_success(),
                Err(e) => {
                    warn!(
                        user_id = %user_id,
                        error = %e,
                        "Failed to import budget row"
                    );
                    summary.record_failure(format!(
                        "Failed to import budget: {}",
                        row.display_name()
                    ));
                }
            }
        }

        info!(
            user_id = %user_id,
            successful = summary.successful,
            failed = summary.failed,
            "Budget import finished"
        );

        Ok(summary)
    }

    async fn import_row(
        &self,
        user_id: &str,
        row: &BudgetRow,
        new_budget: &NewBudget,
    ) -> Result<(), ApiError> {
        let budget_id = self.budgets.insert_budget(user_id, new_budget).await?;

        if let Some(expense) = row.opening_expense() {
            self.budgets.insert_expense(&budget_id, &expense).await?;
        }

        Ok(())
    }

    /// The caller's budgets as rows, newest first
    pub async fn export_rows(&self, user_id: &str) -> Result<Vec<BudgetRow>, ApiError> {
        let budgets = self.budgets.list_budgets(user_id).await?;

        if budgets.is_empty() {
            return Err(ApiError::NotFound("No budgets to export".to_string()));
        }

        Ok(budgets.iter().map(BudgetRow::from).collect())
    }
}
