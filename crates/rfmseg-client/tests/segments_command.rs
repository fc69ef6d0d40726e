mod support;

use support::rfm_testkit::{filters_payload, ladder_fixture, segments_payload, temp_data_dir};

#[test]
fn segment_analysis_summarizes_the_ladder() {
    let temp = temp_data_dir("rfmseg-segments");
    assert!(temp.is_ok());
    if let Ok((_dir, data)) = temp {
        ladder_fixture(&data);
        let payload = segments_payload(&data);
        assert_eq!(payload["command"], "segments");

        let stats = payload["data"]["segment_statistics"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        let labels = stats
            .iter()
            .filter_map(|row| row["segment"].as_str().map(str::to_string))
            .collect::<Vec<String>>();
        assert_eq!(
            labels,
            vec!["Champions", "Hibernating", "Loyal Customers", "Other"]
        );

        let hibernating = &stats[1];
        assert_eq!(hibernating["customer_count"], 2);
        assert_eq!(hibernating["total_revenue"], 50.0);
        assert_eq!(hibernating["customer_percentage"], 40.0);
        assert_eq!(hibernating["recommended_action"], "Low-cost Automation");

        let insights = &payload["data"]["key_insights"];
        assert_eq!(insights["total_customers"], 5);
        assert_eq!(insights["total_revenue"], 550.0);
        assert_eq!(insights["segments_count"], 4);
        assert_eq!(insights["high_priority_customers"], 2);
        assert_eq!(insights["high_priority_revenue"], 410.0);
        assert_eq!(insights["high_risk_customers"], 0);
        assert_eq!(insights["top_segment"], "Hibernating");
        assert_eq!(insights["most_valuable_segment"], "Champions");
    }
}

#[test]
fn filter_options_list_distinct_values_after_all() {
    let temp = temp_data_dir("rfmseg-filters");
    assert!(temp.is_ok());
    if let Ok((_dir, data)) = temp {
        ladder_fixture(&data);
        let payload = filters_payload(&data);
        assert_eq!(payload["command"], "filters");

        let filters = &payload["data"];
        assert_eq!(filters["customer_type"], serde_json::json!(["All", "Retail"]));
        assert_eq!(filters["salesperson"], serde_json::json!(["All", "Alice"]));
        assert_eq!(
            filters["segment"],
            serde_json::json!(["All", "Champions", "Hibernating", "Loyal Customers", "Other"])
        );
    }
}
