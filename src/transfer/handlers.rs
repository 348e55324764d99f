use axum::{
    extract::{Extension, Query},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::models::{BudgetRow, ExportQuery, ExportResponse, ImportRequest, TemplateQuery};
use super::services::TransferService;
use super::sheet::{self, Locale};
use crate::auth::AuthedUser;
use crate::common::{ApiError, ApiJson, AppState};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn csv_attachment(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

fn accept_language(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|h| h.to_str().ok())
}

/// POST /api/budgets/import - Import rows given as JSON
pub async fn import_budgets(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    payload: Result<ApiJson<ImportRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = match payload {
        Ok(ApiJson(ImportRequest {
            budgets: Some(entries),
        })) => entries,
        _ => return Err(ApiError::BadRequest("Invalid budgets data".to_string())),
    };

    let entries = entries.into_iter().map(BudgetRow::from_entry).collect();

    let transfer_service = TransferService::new(state.db.clone());
    let summary = transfer_service
        .import_entries(&user.id, user.plan, entries)
        .await?;

    Ok(Json(summary))
}

/// POST /api/budgets/import/csv - Import rows from a CSV document in the request body
pub async fn import_budgets_csv(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let rows = sheet::parse_rows(&body)?;

    info!(
        user_id = %user.id,
        rows = rows.len(),
        "Parsed CSV import"
    );

    let transfer_service = TransferService::new(state.db.clone());
    let summary = transfer_service
        .import_budgets(&user.id, user.plan, rows)
        .await?;

    Ok(Json(summary))
}

/// GET /api/budgets/export - Export the caller's budgets as CSV (default) or JSON
pub async fn export_budgets(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    headers: HeaderMap,
    Query(params): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = params.format.as_deref().unwrap_or("csv");
    if format != "csv" && format != "json" {
        warn!(user_id = %user.id, format = format, "Invalid export format requested");
        return Err(ApiError::BadRequest(
            "Invalid format. Use 'csv' or 'json'".to_string(),
        ));
    }

    let transfer_service = TransferService::new(state.db.clone());
    let rows = transfer_service.export_rows(&user.id).await?;

    info!(
        user_id = %user.id,
        record_count = rows.len(),
        format = format,
        "Budgets exported"
    );

    if format == "json" {
        return Ok(Json(ExportResponse { budgets: rows }).into_response());
    }

    let locale = Locale::resolve(params.locale.as_deref(), accept_language(&headers));
    let body = sheet::write_rows(locale, &rows)?;
    Ok(csv_attachment("budgets_export.csv", body))
}

/// GET /api/budgets/template - Example CSV for imports; needs no caller
pub async fn download_template(
    headers: HeaderMap,
    Query(params): Query<TemplateQuery>,
) -> Result<Response, ApiError> {
    let locale = Locale::resolve(params.locale.as_deref(), accept_language(&headers));
    let body = sheet::template(locale)?;
    Ok(csv_attachment("budget_import_template.csv", body))
}
