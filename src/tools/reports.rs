use chrono::NaiveDate;
use serde_json::{json, Value};

use super::{ToolError, ToolKind};

const DAILY_SUMMARIES: &[(&str, &str)] = &[
    ("2023-09-27", "Total Sales Amount: 2000, Total Units Sold: 75"),
    ("2023-09-28", "Total Sales Amount: 5000, Total Units Sold: 100"),
    ("2023-09-29", "Total Sales Amount: 10000, Total Units Sold: 250"),
];

/// Look up the summary report recorded for `day`
pub fn query_daily_summary(day: &str) -> Result<Value, ToolError> {
    let tool = ToolKind::QueryDailySummary.name();
    let date = NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d").map_err(|e| {
        ToolError::InvalidParameter {
            tool,
            parameter: "day".to_string(),
            reason: format!("'{}' is not a YYYY-MM-DD date: {}", day, e),
        }
    })?;
    let key = date.format("%Y-%m-%d").to_string();

    DAILY_SUMMARIES
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, summary)| json!({ "day": key, "summary": summary }))
        .ok_or_else(|| ToolError::Invocation {
            tool,
            message: format!("No summary recorded for {}", key),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_day() {
        let output = query_daily_summary("2023-09-29").unwrap();
        assert_eq!(output["day"], "2023-09-29");
        assert_eq!(output["summary"], "Total Sales Amount: 10000, Total Units Sold: 250");
    }

    #[test]
    fn test_unknown_day() {
        let err = query_daily_summary("2024-01-01").unwrap_err();
        assert!(matches!(err, ToolError::Invocation { .. }));
    }

    #[test]
    fn test_malformed_day() {
        let err = query_daily_summary("yesterday").unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameter { .. }));
    }
}
