use std::io;

use serde_json::Value;

use super::format::{self, Column};
use super::rfm_text::{count, money, text};

pub fn render_segments(data: &Value) -> io::Result<String> {
    let statistics = data
        .get("segment_statistics")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("segments output requires segment_statistics"))?;
    let insights = data
        .get("key_insights")
        .ok_or_else(|| io::Error::other("segments output requires key_insights"))?;

    if statistics.is_empty() {
        return Ok("No customers were scored, so there are no segments to summarize.".to_string());
    }

    let mut lines = vec![
        format!(
            "{} customers across {} segments.",
            count(insights, "total_customers"),
            count(insights, "segments_count")
        ),
        String::new(),
        "Key insights:".to_string(),
    ];
    lines.extend(format::key_value_rows(
        &[
            ("Reference date:", text(data, "reference_date")),
            ("Total revenue:", money(insights.get("total_revenue"))),
            (
                "High priority:",
                format!(
                    "{} customers, {} revenue",
                    count(insights, "high_priority_customers"),
                    money(insights.get("high_priority_revenue"))
                ),
            ),
            ("High risk:", count(insights, "high_risk_customers")),
            ("Largest segment:", text(insights, "top_segment")),
            ("Most valuable:", text(insights, "most_valuable_segment")),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Segments:".to_string());
    let columns = [
        Column::left("Segment"),
        Column::right("Customers"),
        Column::right("Cust %"),
        Column::right("Revenue"),
        Column::right("Rev %"),
        Column::right("Avg orders"),
        Column::left("Priority"),
        Column::left("Risk"),
        Column::left("Action"),
    ];
    let rows = statistics
        .iter()
        .map(|row| {
            vec![
                text(row, "segment"),
                count(row, "customer_count"),
                percent(row.get("customer_percentage")),
                money(row.get("total_revenue")),
                percent(row.get("revenue_percentage")),
                money(row.get("avg_frequency")),
                text(row, "priority"),
                text(row, "risk_level"),
                text(row, "recommended_action"),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table(
        &columns,
        &rows,
        format::terminal_width(),
        "Segment",
    ));

    Ok(lines.join("\n"))
}

fn percent(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_f64)
        .map(|share| format!("{share:.1}%"))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_segments;

    #[test]
    fn renders_insights_and_segment_rows() {
        let data = json!({
            "run_id": "run_01J0000000000000000000000",
            "reference_date": "2024-06-10",
            "segment_statistics": [{
                "segment": "Champions",
                "customer_count": 2,
                "total_revenue": 400.0,
                "avg_revenue": 200.0,
                "avg_frequency": 5.0,
                "avg_recency_days": 3.5,
                "customer_percentage": 66.7,
                "revenue_percentage": 80.0,
                "priority": "High",
                "risk_level": "Low",
                "recommended_action": "Retain & Upsell"
            }],
            "key_insights": {
                "total_customers": 3,
                "total_revenue": 500.0,
                "segments_count": 2,
                "high_priority_customers": 2,
                "high_priority_revenue": 400.0,
                "high_risk_customers": 0,
                "top_segment": "Champions",
                "most_valuable_segment": null
            }
        });

        let rendered = render_segments(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("3 customers across 2 segments."));
            assert!(text.contains("2 customers, 400.00 revenue"));
            assert!(text.contains("Most valuable:    -"));
            assert!(text.contains("66.7%"));
            assert!(text.contains("Retain & Upsell"));
        }
    }

    #[test]
    fn empty_statistics_render_a_notice() {
        let data = json!({
            "segment_statistics": [],
            "key_insights": {"total_customers": 0}
        });
        let rendered = render_segments(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("no segments"));
        }
    }
}
