use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::info;

use crate::rfm::date::{format_iso_date, next_day};
use crate::rfm::types::{CustomerMetrics, TransactionRecord};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Latest valid sale date plus one day; `None` when no sale has a date.
    pub reference_date: Option<NaiveDate>,
    pub max_transaction_date: Option<NaiveDate>,
    pub metrics: Vec<CustomerMetrics>,
}

#[derive(Debug, Default)]
struct Accumulator {
    last_sale: Option<NaiveDate>,
    count: i64,
    total: f64,
}

/// Collapses cleaned sales into one metric row per customer, ordered by code.
pub fn aggregate_metrics(transactions: &[TransactionRecord]) -> ClientResult<Aggregation> {
    if transactions.is_empty() {
        return Err(ClientError::no_transactions());
    }

    let max_transaction_date = transactions.iter().filter_map(|row| row.date).max();
    let reference_date = max_transaction_date.map(next_day);
    info!(
        reference_date = reference_date
            .as_ref()
            .map(format_iso_date)
            .unwrap_or_else(|| "none".to_string()),
        "reference date for recency"
    );

    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for row in transactions {
        let entry = groups.entry(row.customer_code.as_str()).or_default();
        entry.count += 1;
        entry.total += row.amount;
        if let Some(date) = row.date
            && entry.last_sale.is_none_or(|current| date > current)
        {
            entry.last_sale = Some(date);
        }
    }

    let metrics = groups
        .into_iter()
        .map(|(customer_code, group)| {
            let recency = match (group.last_sale, reference_date) {
                (Some(last), Some(reference)) => Some((last - reference).num_days()),
                _ => None,
            };
            CustomerMetrics {
                customer_code: customer_code.to_string(),
                recency,
                frequency: group.count,
                monetary: group.total,
                average_spend: group.total / group.count as f64,
                last_sale_date: group.last_sale,
            }
        })
        .collect::<Vec<CustomerMetrics>>();

    info!(customers = metrics.len(), "calculated raw RFM metrics");

    Ok(Aggregation {
        reference_date,
        max_transaction_date,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use crate::rfm::types::TransactionRecord;

    use super::aggregate_metrics;

    fn sale(customer_code: &str, date: Option<NaiveDate>, amount: f64) -> TransactionRecord {
        TransactionRecord {
            transaction_number: None,
            customer_code: customer_code.to_string(),
            date,
            amount,
            cost: None,
            profit: None,
            branch: None,
            delivery_suburb: None,
            postcode: None,
        }
    }

    fn day(offset: i64) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 6, 30).map(|base| base + Duration::days(offset))
    }

    #[test]
    fn reference_date_is_global_max_plus_one_day() {
        let rows = vec![
            sale("C1", day(-10), 100.0),
            sale("C1", day(-5), 200.0),
            sale("C2", day(0), 50.0),
        ];

        let aggregated = aggregate_metrics(&rows);
        assert!(aggregated.is_ok());
        if let Ok(result) = aggregated {
            assert_eq!(result.reference_date, day(1));
            assert_eq!(result.max_transaction_date, day(0));

            let c1 = &result.metrics[0];
            assert_eq!(c1.customer_code, "C1");
            // Last purchase at -5 against a reference of +1.
            assert_eq!(c1.recency, Some(-6));
            assert_eq!(c1.frequency, 2);
            assert!((c1.monetary - 300.0).abs() < f64::EPSILON);
            assert!((c1.average_spend - 150.0).abs() < f64::EPSILON);
            assert_eq!(c1.last_sale_date, day(-5));

            let c2 = &result.metrics[1];
            assert_eq!(c2.recency, Some(-1));
        }
    }

    #[test]
    fn reference_date_is_shared_across_customers() {
        let rows = vec![sale("A", day(-30), 10.0), sale("B", day(-2), 10.0)];

        let aggregated = aggregate_metrics(&rows);
        assert!(aggregated.is_ok());
        if let Ok(result) = aggregated {
            assert_eq!(result.metrics[0].recency, Some(-29));
            assert_eq!(result.metrics[1].recency, Some(-1));
        }
    }

    #[test]
    fn undated_sales_count_but_leave_recency_empty() {
        let rows = vec![
            sale("A", None, 10.0),
            sale("A", None, 15.0),
            sale("B", day(0), 5.0),
        ];

        let aggregated = aggregate_metrics(&rows);
        assert!(aggregated.is_ok());
        if let Ok(result) = aggregated {
            let a = &result.metrics[0];
            assert_eq!(a.recency, None);
            assert_eq!(a.last_sale_date, None);
            assert_eq!(a.frequency, 2);
            assert!((a.monetary - 25.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn no_dates_anywhere_leaves_reference_empty() {
        let aggregated = aggregate_metrics(&[sale("A", None, 1.0)]);
        assert!(aggregated.is_ok());
        if let Ok(result) = aggregated {
            assert_eq!(result.reference_date, None);
            assert_eq!(result.metrics[0].recency, None);
        }
    }

    #[test]
    fn empty_input_is_fatal() {
        let aggregated = aggregate_metrics(&[]);
        assert!(aggregated.is_err());
        if let Err(error) = aggregated {
            assert_eq!(error.code, "no_transactions");
        }
    }
}
