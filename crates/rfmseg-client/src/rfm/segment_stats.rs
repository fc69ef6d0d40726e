use std::collections::BTreeMap;

use crate::contracts::types::{RfmRecord, SegmentInsights, SegmentStatistic};
use crate::rfm::segment::Segment;

#[derive(Debug, Default)]
struct SegmentTotals {
    customers: i64,
    revenue: f64,
    frequency: i64,
    recency_days_sum: i64,
    recency_days_count: i64,
}

/// Per-segment statistics, ordered by segment label.
pub fn segment_statistics(records: &[RfmRecord]) -> Vec<SegmentStatistic> {
    let mut groups: BTreeMap<&str, SegmentTotals> = BTreeMap::new();
    for record in records {
        let totals = groups.entry(record.segment.as_str()).or_default();
        totals.customers += 1;
        totals.revenue += record.monetary.unwrap_or(0.0);
        totals.frequency += record.frequency;
        if let Some(days) = record.recency_days {
            totals.recency_days_sum += days;
            totals.recency_days_count += 1;
        }
    }

    let total_customers = records.len() as f64;
    let total_revenue = records
        .iter()
        .filter_map(|record| record.monetary)
        .sum::<f64>();

    groups
        .into_iter()
        .map(|(label, totals)| {
            let segment = Segment::from_label(label).unwrap_or(Segment::Other);
            let count = totals.customers as f64;
            let avg_recency_days = (totals.recency_days_count > 0).then(|| {
                round_to(
                    totals.recency_days_sum as f64 / totals.recency_days_count as f64,
                    2,
                )
            });

            SegmentStatistic {
                segment: label.to_string(),
                customer_count: totals.customers,
                total_revenue: round_to(totals.revenue, 2),
                avg_revenue: round_to(totals.revenue / count, 2),
                avg_frequency: round_to(totals.frequency as f64 / count, 2),
                avg_recency_days,
                customer_percentage: percentage(count, total_customers),
                revenue_percentage: percentage(totals.revenue, total_revenue),
                priority: segment.priority().to_string(),
                risk_level: segment.risk_level().to_string(),
                recommended_action: segment.recommended_action().to_string(),
            }
        })
        .collect()
}

pub fn segment_insights(
    records: &[RfmRecord],
    statistics: &[SegmentStatistic],
) -> SegmentInsights {
    let high_priority = statistics
        .iter()
        .filter(|row| segment_of(row).is_high_priority());
    let high_priority_customers = high_priority
        .clone()
        .map(|row| row.customer_count)
        .sum::<i64>();
    let high_priority_revenue = high_priority.map(|row| row.total_revenue).sum::<f64>();
    let high_risk_customers = statistics
        .iter()
        .filter(|row| segment_of(row).is_high_risk())
        .map(|row| row.customer_count)
        .sum::<i64>();

    SegmentInsights {
        total_customers: records.len() as i64,
        total_revenue: round_to(
            records
                .iter()
                .filter_map(|record| record.monetary)
                .sum::<f64>(),
            2,
        ),
        segments_count: statistics.len() as i64,
        high_priority_customers,
        high_priority_revenue: round_to(high_priority_revenue, 2),
        high_risk_customers,
        top_segment: first_max_by(statistics, |row| row.customer_count as f64),
        most_valuable_segment: first_max_by(statistics, |row| row.total_revenue),
    }
}

fn segment_of(row: &SegmentStatistic) -> Segment {
    Segment::from_label(&row.segment).unwrap_or(Segment::Other)
}

/// Label of the first row holding the maximum; earlier rows win ties.
fn first_max_by(
    statistics: &[SegmentStatistic],
    key: impl Fn(&SegmentStatistic) -> f64,
) -> Option<String> {
    let mut best: Option<(&SegmentStatistic, f64)> = None;
    for row in statistics {
        let value = key(row);
        if best.is_none_or(|(_, current)| value > current) {
            best = Some((row, value));
        }
    }
    best.map(|(row, _)| row.segment.clone())
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    round_to(part / whole * 100.0, 1)
}

/// Halves go to the even neighbour.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use crate::contracts::types::RfmRecord;

    use super::{percentage, round_to, segment_insights, segment_statistics};

    fn record(code: &str, segment: &str, monetary: f64, frequency: i64, days: i64) -> RfmRecord {
        RfmRecord {
            customer_code: code.to_string(),
            recency: Some(-days),
            frequency,
            monetary: Some(monetary),
            average_spend: Some(monetary / frequency as f64),
            last_sale_date: None,
            recency_days: Some(days),
            recency_formatted: String::new(),
            recency_category: String::new(),
            recency_score: 3,
            frequency_score: 3,
            monetary_score: 3,
            rfm_score: "333".to_string(),
            segment: segment.to_string(),
            trend_values: Vec::new(),
            trend_direction: "stable".to_string(),
            trend_peak: Some(0.0),
            trend_average: Some(0.0),
            trend_status: "computed".to_string(),
            customer_name: None,
            customer_type: None,
            customer_ranking: None,
            salesperson: None,
            postcode: None,
        }
    }

    #[test]
    fn statistics_group_by_segment_label() {
        let records = vec![
            record("A", "Champions", 300.0, 6, 2),
            record("B", "Champions", 100.0, 4, 5),
            record("C", "Hibernating", 100.0, 1, 400),
        ];

        let stats = segment_statistics(&records);
        assert_eq!(stats.len(), 2);

        let champions = &stats[0];
        assert_eq!(champions.segment, "Champions");
        assert_eq!(champions.customer_count, 2);
        assert_eq!(champions.total_revenue, 400.0);
        assert_eq!(champions.avg_revenue, 200.0);
        assert_eq!(champions.avg_frequency, 5.0);
        assert_eq!(champions.avg_recency_days, Some(3.5));
        assert_eq!(champions.customer_percentage, 66.7);
        assert_eq!(champions.revenue_percentage, 80.0);
        assert_eq!(champions.priority, "High");
        assert_eq!(champions.recommended_action, "Retain & Upsell");

        assert_eq!(stats[1].risk_level, "Low");
    }

    #[test]
    fn insights_sum_high_priority_and_high_risk_segments() {
        let records = vec![
            record("A", "Champions", 50.0, 6, 2),
            record("B", "Cannot Lose Them", 500.0, 9, 300),
            record("C", "About to Sleep", 20.0, 1, 100),
            record("D", "About to Sleep", 25.0, 1, 120),
        ];

        let stats = segment_statistics(&records);
        let insights = segment_insights(&records, &stats);
        assert_eq!(insights.total_customers, 4);
        assert_eq!(insights.total_revenue, 595.0);
        assert_eq!(insights.segments_count, 3);
        assert_eq!(insights.high_priority_customers, 2);
        assert_eq!(insights.high_priority_revenue, 550.0);
        assert_eq!(insights.high_risk_customers, 3);
        assert_eq!(insights.top_segment.as_deref(), Some("About to Sleep"));
        assert_eq!(insights.most_valuable_segment.as_deref(), Some("Cannot Lose Them"));
    }

    #[test]
    fn empty_record_set_has_no_top_segment() {
        let stats = segment_statistics(&[]);
        let insights = segment_insights(&[], &stats);
        assert!(stats.is_empty());
        assert_eq!(insights.top_segment, None);
        assert_eq!(insights.total_revenue, 0.0);
    }

    #[test]
    fn rounding_sends_halves_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(percentage(1.0, 16.0), 6.2);
        assert_eq!(percentage(3.0, 16.0), 18.8);
    }

    #[test]
    fn revenue_share_ties_round_to_even() {
        let mut records = vec![record("A", "Champions", 1.0, 1, 2)];
        records.extend((0..15).map(|index| record(&format!("B{index}"), "Other", 1.0, 1, 2)));

        let stats = segment_statistics(&records);
        assert_eq!(stats[0].segment, "Champions");
        assert_eq!(stats[0].customer_percentage, 6.2);
        assert_eq!(stats[0].revenue_percentage, 6.2);
        assert_eq!(stats[1].customer_percentage, 93.8);
    }
}
