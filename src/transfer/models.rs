use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::budgets::models::{
    Budget, NewBudget, NewExpense, DEFAULT_CATEGORY, IMPORTED_AMOUNT_DESCRIPTION,
};
use crate::common::helpers::{deserialize_lenient_f64, deserialize_lenient_string, now_timestamp};
use crate::common::validation::{is_valid_goal, is_valid_name};

/// One spreadsheet row: `[name, goal, currentAmount, category?, targetDate?]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRow {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub goal: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub current_amount: Option<f64>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_date: Option<String>,
}

impl BudgetRow {
    /// Reads one entry of an import batch. Only JSON objects are rows; anything
    /// else yields `None` and is reported as an invalid row.
    pub fn from_entry(entry: Value) -> Option<Self> {
        if !entry.is_object() {
            return None;
        }
        serde_json::from_value(entry).ok()
    }

    /// Name used in error messages
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown")
    }

    /// The budget this row creates, if the row is valid
    pub fn to_new_budget(&self) -> Option<NewBudget> {
        if !is_valid_name(self.name.as_deref()) || !is_valid_goal(self.goal) {
            return None;
        }
        Some(NewBudget {
            name: self.name.as_deref()?.trim().to_string(),
            goal: self.goal?,
        })
    }

    /// The opening expense carrying the row's current amount, when positive
    pub fn opening_expense(&self) -> Option<NewExpense> {
        let amount = self.current_amount.filter(|a| a.is_finite() && *a > 0.0)?;
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        Some(NewExpense {
            amount,
            description: IMPORTED_AMOUNT_DESCRIPTION.to_string(),
            category: category.to_string(),
            date: now_timestamp(),
        })
    }

    pub fn is_blank(&self) -> bool {
        self.name.as_deref().map(str::trim).unwrap_or("").is_empty()
            && self.goal.is_none()
            && self.current_amount.is_none()
            && self.category.is_none()
            && self.target_date.is_none()
    }
}

impl From<&Budget> for BudgetRow {
    fn from(budget: &Budget) -> Self {
        Self {
            name: Some(budget.name.clone()),
            goal: Some(budget.goal),
            current_amount: Some(budget.current_amount),
            category: None,
            target_date: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub budgets: Option<Vec<Value>>,
}

/// Per-row outcome of an import batch
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ImportSummary {
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn record_success(&mut self) {
        self.successful += 1;
    }

    pub fn record_failure(&mut self, message: String) {
        self.failed += 1;
        self.errors.push(message);
    }
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub budgets: Vec<BudgetRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    pub locale: Option<String>,
}
