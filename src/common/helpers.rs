// Helper functions for safe logging and lenient deserialization

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Current UTC time as a fixed-width RFC 3339 string, so stored timestamps
/// order correctly as text
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Masks principal ids for safe logging
/// Shows only the first and last 4 characters
///
/// # Example
/// ```
/// let masked = safe_principal_log("user_2abcDEF1234567890");
/// // Returns: "user...7890"
/// ```
pub fn safe_principal_log(principal_id: &str) -> String {
    if principal_id.len() > 8 && principal_id.is_ascii() {
        format!(
            "{}...{}",
            &principal_id[..4],
            &principal_id[principal_id.len() - 4..]
        )
    } else {
        "***".to_string()
    }
}

/// Deserializes a number that may arrive as a JSON number, a numeric string or null.
/// Anything that does not read as a number becomes `None`.
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

/// Deserializes text that may arrive as a JSON string, a number or null.
/// Spreadsheet cells holding a purely numeric name come through as numbers.
pub fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Reads a numeric cell the way spreadsheet tooling does: empty means absent
pub fn parse_number_cell(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', "").parse::<f64>().ok().filter(|n| n.is_finite())
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number_cell(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Cells {
        #[serde(default, deserialize_with = "deserialize_lenient_string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "deserialize_lenient_f64")]
        goal: Option<f64>,
    }

    #[test]
    fn test_safe_principal_log() {
        assert_eq!(safe_principal_log("user_2abcDEF1234567890"), "user...7890");
        assert_eq!(safe_principal_log("short"), "***");
    }

    #[test]
    fn test_lenient_values() {
        let cells: Cells = serde_json::from_str(r#"{"name": 2025, "goal": "1,500.50"}"#).unwrap();
        assert_eq!(cells.name.as_deref(), Some("2025"));
        assert_eq!(cells.goal, Some(1500.5));

        let cells: Cells = serde_json::from_str(r#"{"name": null, "goal": "abc"}"#).unwrap();
        assert_eq!(cells.name, None);
        assert_eq!(cells.goal, None);

        let cells: Cells = serde_json::from_str("{}").unwrap();
        assert_eq!(cells.name, None);
        assert_eq!(cells.goal, None);
    }

    #[test]
    fn test_parse_number_cell() {
        assert_eq!(parse_number_cell(" 42 "), Some(42.0));
        assert_eq!(parse_number_cell(""), None);
        assert_eq!(parse_number_cell("n/a"), None);
        assert_eq!(parse_number_cell("inf"), None);
    }
}
