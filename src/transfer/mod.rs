//! # Transfer Module
//!
//! Spreadsheet import and export of budgets:
//! - Batch import with per-row validation and partial success
//! - CSV and JSON export of budgets with their current amounts
//! - Localized import template

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod sheet;


pub use routes::transfer_routes;
