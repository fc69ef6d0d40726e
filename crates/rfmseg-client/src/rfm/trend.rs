use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::info;

use crate::rfm::date::{MonthKey, format_iso_date, trailing_months};
use crate::rfm::policy::{RFM_POLICY_V1, RfmPolicy};
use crate::rfm::types::{TransactionRecord, TrendDirection, TrendRecord, TrendStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendError {
    NoUsableDates,
    NoActivityInWindow,
}

impl TrendError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoUsableDates => "no_usable_dates",
            Self::NoActivityInWindow => "no_activity_in_window",
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::NoUsableDates => "no sale carries a usable date",
            Self::NoActivityInWindow => "no sale falls inside the trailing window",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendWindow {
    pub months: Vec<MonthKey>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct TrendTable {
    pub window: TrendWindow,
    pub trends: BTreeMap<String, TrendRecord>,
}

/// Monthly spend series for every listed customer over the trailing window
/// ending at the latest sale date.
pub fn calculate_trends(
    transactions: &[TransactionRecord],
    customer_codes: &[String],
) -> Result<TrendTable, TrendError> {
    calculate_trends_with_policy(transactions, customer_codes, RFM_POLICY_V1)
}

fn calculate_trends_with_policy(
    transactions: &[TransactionRecord],
    customer_codes: &[String],
    policy: RfmPolicy,
) -> Result<TrendTable, TrendError> {
    let end = transactions
        .iter()
        .filter_map(|row| row.date)
        .max()
        .ok_or(TrendError::NoUsableDates)?;
    let months = trailing_months(end, policy.trend_window_months);
    // Unreachable with a non-empty window: the latest sale always falls in it.
    let start = months
        .first()
        .and_then(|month| month.first_day())
        .ok_or(TrendError::NoActivityInWindow)?;

    let mut monthly: HashMap<&str, HashMap<MonthKey, f64>> = HashMap::new();
    let mut in_window = 0_usize;
    for row in transactions {
        let Some(date) = row.date else {
            continue;
        };
        if date < start || date > end {
            continue;
        }
        in_window += 1;
        *monthly
            .entry(row.customer_code.as_str())
            .or_default()
            .entry(MonthKey::of(date))
            .or_insert(0.0) += row.amount;
    }

    if in_window == 0 {
        return Err(TrendError::NoActivityInWindow);
    }

    let empty = HashMap::new();
    let trends = customer_codes
        .par_iter()
        .map(|code| {
            let sums = monthly.get(code.as_str()).unwrap_or(&empty);
            let series = months
                .iter()
                .map(|month| round_to(sums.get(month).copied().unwrap_or(0.0), 2))
                .collect::<Vec<f64>>();
            (code.clone(), build_trend(series, policy))
        })
        .collect::<BTreeMap<String, TrendRecord>>();

    info!(
        window_start = %format_iso_date(&start),
        window_end = %format_iso_date(&end),
        sales_in_window = in_window,
        customers = trends.len(),
        "calculated spend trends"
    );

    Ok(TrendTable {
        window: TrendWindow { months, start, end },
        trends,
    })
}

fn build_trend(series: Vec<f64>, policy: RfmPolicy) -> TrendRecord {
    let values = fit_series_length(series, policy.trend_window_months);
    TrendRecord {
        direction: trend_direction(&values, policy),
        peak: round_to(series_peak(&values), 2),
        average: round_to(series_average(&values), 2),
        values,
        status: TrendStatus::Computed,
    }
}

/// Pads with zeros at the oldest end, or keeps the most recent `len` points.
pub fn fit_series_length(mut series: Vec<f64>, len: usize) -> Vec<f64> {
    if series.len() > len {
        return series.split_off(series.len() - len);
    }
    if series.len() < len {
        let mut padded = vec![0.0; len - series.len()];
        padded.append(&mut series);
        return padded;
    }
    series
}

pub fn trend_direction(series: &[f64], policy: RfmPolicy) -> TrendDirection {
    if series.len() < policy.trend_min_points {
        return TrendDirection::Stable;
    }

    let (first, second) = series.split_at(series.len() / 2);
    let first_sum = first.iter().sum::<f64>();
    let second_sum = second.iter().sum::<f64>();

    if second_sum > policy.trend_up_threshold(first_sum) {
        TrendDirection::Up
    } else if second_sum < policy.trend_down_threshold(first_sum) {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    }
}

pub fn series_peak(series: &[f64]) -> f64 {
    series
        .iter()
        .copied()
        .reduce(f64::max)
        .unwrap_or(0.0)
}

pub fn series_average(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let exponent = i32::try_from(decimals).unwrap_or(2);
    let factor = 10_f64.powi(exponent);
    (value * factor).round() / factor
}
