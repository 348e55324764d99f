//! # Budgets Module
//!
//! This module handles the budget aggregate:
//! - Budget CRUD with ownership checks and plan quotas
//! - Current amounts derived from expenses on every read
//! - Per-budget expense records

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::budgets_routes;
pub use services::BudgetsService;
