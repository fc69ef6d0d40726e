use std::io;

use serde_json::Value;

use super::format::{self, Column};

pub fn render_rfm(data: &Value) -> io::Result<String> {
    let report = data
        .get("report")
        .ok_or_else(|| io::Error::other("rfm output requires a report"))?;
    let records = data
        .get("records")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("rfm output requires records"))?;

    let mut lines = vec![
        format!("Scored {} customers.", records.len()),
        String::new(),
        "Run:".to_string(),
    ];
    lines.extend(format::key_value_rows(
        &[
            ("Run ID:", text(report, "run_id")),
            ("Data directory:", text(report, "data_dir")),
            ("Reference date:", text(report, "reference_date")),
            ("Latest sale:", text(report, "max_transaction_date")),
            ("Trend:", trend_summary(report.get("trend"))),
        ],
        2,
    ));

    if let Some(cleaning) = report.get("cleaning") {
        lines.push(String::new());
        lines.push("Cleaning:".to_string());
        lines.extend(format::key_value_rows(
            &[
                ("Customer rows read:", count(cleaning, "customer_rows_read")),
                ("Sales rows read:", count(cleaning, "sales_rows_read")),
                ("Sales rows kept:", count(cleaning, "sales_rows_retained")),
                ("Negative amounts:", count(cleaning, "negative_amounts_removed")),
                ("Missing amounts:", count(cleaning, "missing_amounts_removed")),
                ("Unknown customers:", count(cleaning, "unmatched_customer_removed")),
                ("Unparsable dates:", count(cleaning, "sales_unparsable_dates")),
            ],
            2,
        ));
    }

    if let Some(scoring) = report.get("scoring") {
        lines.push(String::new());
        lines.push("Scoring:".to_string());
        let entries = ["recency", "frequency", "monetary"]
            .iter()
            .map(|metric| (*metric, scoring_summary(scoring.get(*metric))))
            .collect::<Vec<(&str, String)>>();
        lines.extend(format::key_value_rows(&entries, 2));
    }

    if records.is_empty() {
        return Ok(lines.join("\n"));
    }

    lines.push(String::new());
    lines.push("Customers:".to_string());
    let columns = [
        Column::left("Customer"),
        Column::left("Name"),
        Column::right("Recency"),
        Column::right("Orders"),
        Column::right("Spend"),
        Column::left("RFM"),
        Column::left("Segment"),
        Column::left("Trend"),
    ];
    let rows = records
        .iter()
        .map(|record| {
            vec![
                text(record, "customer_code"),
                text(record, "customer_name"),
                text(record, "recency_formatted"),
                count(record, "frequency"),
                money(record.get("monetary")),
                text(record, "rfm_score"),
                text(record, "segment"),
                text(record, "trend_direction"),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table(
        &columns,
        &rows,
        format::terminal_width(),
        "Customer",
    ));

    Ok(lines.join("\n"))
}

fn trend_summary(trend: Option<&Value>) -> String {
    let Some(trend) = trend else {
        return "-".to_string();
    };
    let status = text(trend, "status");
    if status != "computed" {
        return format!("{status} ({})", text(trend, "reason"));
    }
    format!(
        "{} months, {} to {}",
        count(trend, "window_months"),
        text(trend, "window_start"),
        text(trend, "window_end")
    )
}

fn scoring_summary(scoring: Option<&Value>) -> String {
    let Some(scoring) = scoring else {
        return "-".to_string();
    };
    format!(
        "{} tier, {} bins",
        text(scoring, "tier"),
        count(scoring, "bins")
    )
}

pub(super) fn text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => "-".to_string(),
    }
}

pub(super) fn count(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_i64)
        .map(|number| number.to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub(super) fn money(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_f64)
        .map(|amount| format!("{amount:.2}"))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_rfm;

    #[test]
    fn renders_report_and_customer_table() {
        let data = json!({
            "report": {
                "run_id": "run_01J0000000000000000000000",
                "data_dir": "/srv/data",
                "reference_date": "2024-06-30",
                "max_transaction_date": "2024-06-30",
                "customers_scored": 1,
                "cleaning": {
                    "customer_rows_read": 2,
                    "sales_rows_read": 5,
                    "sales_rows_retained": 4,
                    "negative_amounts_removed": 1,
                    "missing_amounts_removed": 0,
                    "unmatched_customer_removed": 0,
                    "sales_unparsable_dates": 0
                },
                "scoring": {
                    "recency": {"metric": "recency", "tier": "quintile", "bins": 5, "cut_points": []},
                    "frequency": {"metric": "frequency", "tier": "neutral", "bins": 1, "cut_points": []},
                    "monetary": {"metric": "monetary", "tier": "reduced", "bins": 3, "cut_points": []}
                },
                "trend": {
                    "status": "computed",
                    "reason": null,
                    "window_months": 12,
                    "window_start": "2023-07-01",
                    "window_end": "2024-06-30",
                    "month_labels": []
                }
            },
            "records": [{
                "customer_code": "C1",
                "customer_name": null,
                "recency_formatted": "2 weeks",
                "frequency": 4,
                "monetary": 1250.5,
                "rfm_score": "545",
                "segment": "Champions",
                "trend_direction": "increasing"
            }]
        });

        let rendered = render_rfm(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Scored 1 customers."));
            assert!(text.contains("Reference date:  2024-06-30"));
            assert!(text.contains("12 months, 2023-07-01 to 2024-06-30"));
            assert!(text.contains("frequency  neutral tier, 1 bins"));
            assert!(text.contains("Negative amounts:    1"));
            assert!(text.contains("1250.50"));
            assert!(text.contains("Champions"));
        }
    }

    #[test]
    fn degraded_trend_shows_reason() {
        let data = json!({
            "report": {
                "trend": {"status": "degraded", "reason": "no_usable_dates"}
            },
            "records": []
        });

        let rendered = render_rfm(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("degraded (no_usable_dates)"));
            assert!(!text.contains("Customers:"));
        }
    }

    #[test]
    fn missing_records_is_an_error() {
        assert!(render_rfm(&json!({ "report": {} })).is_err());
    }
}
