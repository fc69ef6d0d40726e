use std::collections::HashSet;

use tracing::info;

use crate::contracts::types::CleaningReport;
use crate::ingest::parse::{RawCustomerRow, RawSaleRow};
use crate::rfm::date::parse_transaction_date;
use crate::rfm::policy::{RFM_POLICY_V1, RfmPolicy};
use crate::rfm::types::{CustomerRecord, TransactionRecord};

#[derive(Debug, Clone)]
pub struct CleanedTables {
    pub customers: Vec<CustomerRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub report: CleaningReport,
}

/// Normalizes both tables and drops sales that cannot take part in scoring.
///
/// Data-quality problems are counted, never raised.
pub fn clean_tables(customers: &[RawCustomerRow], sales: &[RawSaleRow]) -> CleanedTables {
    clean_tables_with_policy(customers, sales, RFM_POLICY_V1)
}

fn clean_tables_with_policy(
    customers: &[RawCustomerRow],
    sales: &[RawSaleRow],
    policy: RfmPolicy,
) -> CleanedTables {
    let mut report = CleaningReport {
        customer_rows_read: customers.len() as i64,
        sales_rows_read: sales.len() as i64,
        ..CleaningReport::default()
    };

    let customers = clean_customers(customers, policy, &mut report);
    let known_codes = customers
        .iter()
        .map(|customer| customer.customer_code.as_str())
        .collect::<HashSet<&str>>();

    let mut transactions = Vec::with_capacity(sales.len());
    for raw in sales {
        let (postcode, flagged) = normalize_postcode(raw.postcode.as_deref(), policy);
        if flagged {
            report.sales_invalid_postcodes += 1;
        }
        if raw.branch.is_none() {
            report.sales_missing_branch += 1;
        }
        if raw.delivery_suburb.is_none() {
            report.sales_missing_delivery_suburb += 1;
        }

        let date = raw.date.as_deref().and_then(parse_transaction_date);
        if date.is_none() {
            report.sales_unparsable_dates += 1;
        }

        let Some(amount) = parse_number(raw.amount.as_deref()) else {
            report.missing_amounts_removed += 1;
            continue;
        };
        if amount < 0.0 {
            report.negative_amounts_removed += 1;
            continue;
        }

        let customer_code = raw
            .customer_code
            .as_deref()
            .and_then(normalize_customer_code);
        let Some(customer_code) = customer_code.filter(|code| known_codes.contains(code.as_str()))
        else {
            report.unmatched_customer_removed += 1;
            continue;
        };

        transactions.push(TransactionRecord {
            transaction_number: raw.transaction_number.clone(),
            customer_code,
            date,
            amount,
            cost: parse_number(raw.cost.as_deref()),
            profit: parse_number(raw.profit.as_deref()),
            branch: raw.branch.clone(),
            delivery_suburb: raw.delivery_suburb.clone(),
            postcode,
        });
    }
    report.sales_rows_retained = transactions.len() as i64;

    info!(
        invalid_postcodes = report.customer_invalid_postcodes,
        duplicate_codes = report.duplicate_customer_codes,
        "cleaned customer table"
    );
    info!(
        invalid_postcodes = report.sales_invalid_postcodes,
        missing_branch = report.sales_missing_branch,
        missing_delivery_suburb = report.sales_missing_delivery_suburb,
        unparsable_dates = report.sales_unparsable_dates,
        "flagged sales data-quality issues"
    );
    info!(
        negative = report.negative_amounts_removed,
        missing_amount = report.missing_amounts_removed,
        unmatched_customer = report.unmatched_customer_removed,
        retained = report.sales_rows_retained,
        "excluded sales rows from scoring"
    );

    CleanedTables {
        customers,
        transactions,
        report,
    }
}

fn clean_customers(
    rows: &[RawCustomerRow],
    policy: RfmPolicy,
    report: &mut CleaningReport,
) -> Vec<CustomerRecord> {
    let mut seen = HashSet::new();
    let mut customers = Vec::with_capacity(rows.len());

    for raw in rows {
        let (postcode, flagged) = normalize_postcode(raw.postcode.as_deref(), policy);
        if flagged {
            report.customer_invalid_postcodes += 1;
        }

        let Some(customer_code) = raw.customer_code.as_deref().and_then(normalize_customer_code)
        else {
            report.customers_missing_code += 1;
            continue;
        };
        if !seen.insert(customer_code.clone()) {
            report.duplicate_customer_codes += 1;
            continue;
        }

        customers.push(CustomerRecord {
            customer_code,
            customer_name: raw.customer_name.clone(),
            customer_type: raw.customer_type.clone(),
            customer_ranking: raw.customer_ranking.clone(),
            salesperson: raw.salesperson.clone(),
            postcode,
        });
    }

    customers
}

/// Trims the code and collapses integral float renderings (`1001.0` to `1001`).
pub fn normalize_customer_code(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some((whole, fraction)) = trimmed.split_once('.')
        && !whole.is_empty()
        && whole.chars().all(|character| character.is_ascii_digit())
        && !fraction.is_empty()
        && fraction.chars().all(|character| character == '0')
    {
        return Some(whole.to_string());
    }

    Some(trimmed.to_string())
}

/// Rewrites a literal zero postcode to the invalid marker.
///
/// Returns the normalized value and whether it was flagged.
pub fn normalize_postcode(value: Option<&str>, policy: RfmPolicy) -> (Option<String>, bool) {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return (None, false);
    };

    if raw.parse::<f64>().is_ok_and(|number| number == 0.0) {
        return (Some(policy.invalid_postcode_marker.to_string()), true);
    }
    (Some(raw.to_string()), false)
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    let parsed = value?.trim().parse::<f64>().ok()?;
    parsed.is_finite().then_some(parsed)
}
