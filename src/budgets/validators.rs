use chrono::{DateTime, NaiveDate, Utc};

use super::models::{
    CreateBudgetRequest, CreateExpenseRequest, NewBudget, NewExpense, DEFAULT_CATEGORY,
    MANUAL_UPDATE_DESCRIPTION,
};
use crate::common::helpers::now_timestamp;
use crate::common::validation::{is_valid_goal, is_valid_name};
use crate::common::{ApiError, ValidationResult, Validator};

impl Validator<CreateBudgetRequest> for CreateBudgetRequest {
    fn validate(&self, data: &CreateBudgetRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !is_valid_name(data.name.as_deref()) {
            result.add_error("name", "Budget name is required");
        }

        if !is_valid_goal(data.goal) {
            result.add_error("goal", "Goal must be a positive number");
        }

        result
    }
}

impl CreateBudgetRequest {
    pub fn into_new_budget(self) -> Result<NewBudget, ApiError> {
        self.validate(&self).into_result()?;

        match (self.name, self.goal) {
            (Some(name), Some(goal)) => Ok(NewBudget {
                name: name.trim().to_string(),
                goal,
            }),
            _ => Err(ApiError::ValidationError("Invalid budget data".to_string())),
        }
    }
}

impl Validator<CreateExpenseRequest> for CreateExpenseRequest {
    fn validate(&self, data: &CreateExpenseRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        match data.amount {
            Some(amount) if amount.is_finite() && amount >= 0.0 => {}
            _ => result.add_error("amount", "Amount must be a non-negative number"),
        }

        if data.description.as_deref().map(str::trim) == Some(MANUAL_UPDATE_DESCRIPTION) {
            result.add_error("description", "This description is reserved for manual updates");
        }

        if let Some(date) = &data.date {
            if normalize_date(date).is_none() {
                result.add_error("date", "Date must be YYYY-MM-DD or RFC 3339");
            }
        }

        result
    }
}

impl CreateExpenseRequest {
    pub fn into_new_expense(self) -> Result<NewExpense, ApiError> {
        self.validate(&self).into_result()?;

        let date = match self.date.as_deref() {
            Some(raw) => normalize_date(raw)
                .ok_or_else(|| ApiError::ValidationError("date: invalid date".to_string()))?,
            None => now_timestamp(),
        };

        Ok(NewExpense {
            amount: self.amount.unwrap_or_default(),
            description: self.description.unwrap_or_default().trim().to_string(),
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            date,
        })
    }
}

/// Accepts a calendar date or a full timestamp and stores it as a UTC timestamp
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(
            ts.with_timezone(&Utc)
                .to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        );
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| {
            dt.and_utc()
                .to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
        })
}
