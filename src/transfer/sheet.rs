//! CSV codec for budget rows and the localized import template

use csv::{ReaderBuilder, Trim, WriterBuilder};

use super::models::BudgetRow;
use crate::common::helpers::parse_number_cell;
use crate::common::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Failed to read CSV: {0}")]
    Read(#[from] csv::Error),

    #[error("Failed to write CSV: {0}")]
    Write(String),

    #[error("CSV output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl From<SheetError> for ApiError {
    fn from(e: SheetError) -> Self {
        match e {
            SheetError::Read(err) => ApiError::BadRequest(format!("Invalid CSV file: {}", err)),
            other => ApiError::ExportError(other.to_string()),
        }
    }
}

/// Language of column headers and example rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    He,
}

impl Locale {
    /// Reads a language tag such as `he`, `he-IL` or `en-US`; unknown tags fall back to English
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        match primary.as_str() {
            "he" | "iw" => Locale::He,
            _ => Locale::En,
        }
    }

    /// Explicit locale first, then the first `Accept-Language` entry, then English
    pub fn resolve(explicit: Option<&str>, accept_language: Option<&str>) -> Self {
        if let Some(tag) = explicit.filter(|t| !t.trim().is_empty()) {
            return Locale::from_tag(tag);
        }
        accept_language
            .and_then(|header| header.split(',').next())
            .map(|entry| entry.split(';').next().unwrap_or(entry))
            .map(Locale::from_tag)
            .unwrap_or_default()
    }

    pub fn headers(&self) -> [&'static str; 5] {
        match self {
            Locale::En => ["Budget Name", "Goal", "Current Amount", "Category", "Target Date"],
            Locale::He => ["שם תקציב", "סכום יעד", "סכום נוכחי", "קטגוריה", "תאריך יעד"],
        }
    }

    fn example_rows(&self) -> Vec<BudgetRow> {
        let examples: [(&str, f64, f64, &str, &str); 2] = match self {
            Locale::En => [
                ("Emergency Fund", 5000.0, 1200.0, "Savings", "2026-12-31"),
                ("Summer Vacation", 3000.0, 450.0, "Travel", "2026-07-01"),
            ],
            Locale::He => [
                ("קרן חירום", 5000.0, 1200.0, "חיסכון", "2026-12-31"),
                ("חופשת קיץ", 3000.0, 450.0, "טיולים", "2026-07-01"),
            ],
        };

        examples
            .iter()
            .map(|(name, goal, current, category, target)| BudgetRow {
                name: Some(name.to_string()),
                goal: Some(*goal),
                current_amount: Some(*current),
                category: Some(category.to_string()),
                target_date: Some(target.to_string()),
            })
            .collect()
    }
}

/// Parses CSV text into rows. The first record is always treated as the header
/// and skipped; blank records are dropped.
pub fn parse_rows(text: &str) -> Result<Vec<BudgetRow>, SheetError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records().skip(1) {
        let record = record?;
        let cell = |idx: usize| {
            record
                .get(idx)
                .map(unescape_text_cell)
                .filter(|value| !value.is_empty())
        };

        let row = BudgetRow {
            name: cell(0),
            goal: record.get(1).and_then(parse_number_cell),
            current_amount: record.get(2).and_then(parse_number_cell),
            category: cell(3),
            target_date: cell(4),
        };

        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Writes rows under the locale's header row
pub fn write_rows(locale: Locale, rows: &[BudgetRow]) -> Result<String, SheetError> {
    let write_failed = |e: csv::Error| SheetError::Write(e.to_string());
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(locale.headers())
        .map_err(write_failed)?;

    for row in rows {
        writer
            .write_record([
                escape_text_cell(row.name.as_deref()),
                format_number(row.goal),
                format_number(row.current_amount),
                escape_text_cell(row.category.as_deref()),
                row.target_date.clone().unwrap_or_default(),
            ])
            .map_err(write_failed)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SheetError::Write(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Example document guiding future imports: header, example rows, one blank row
pub fn template(locale: Locale) -> Result<String, SheetError> {
    let mut rows = locale.example_rows();
    rows.push(BudgetRow::default());
    write_rows(locale, &rows)
}

const FORMULA_PREFIXES: [char; 4] = ['=', '+', '-', '@'];

/// Text cells starting like a formula are written behind a `'` so spreadsheet
/// tools show them as text
fn escape_text_cell(value: Option<&str>) -> String {
    match value {
        Some(text) if text.starts_with(FORMULA_PREFIXES) => format!("'{}", text),
        Some(text) => text.to_string(),
        None => String::new(),
    }
}

fn unescape_text_cell(value: &str) -> String {
    match value.strip_prefix('\'') {
        Some(rest) if rest.starts_with(FORMULA_PREFIXES) => rest.to_string(),
        _ => value.to_string(),
    }
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
