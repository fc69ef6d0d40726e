use std::collections::HashMap;
use std::path::Path;

use tracing::{info, info_span, warn};
use ulid::Ulid;

use crate::ClientResult;
use crate::contracts::types::{
    MetricScoring, PipelineReport, RfmRecord, ScoringReport, TrendReport,
};
use crate::ingest::{SourceTables, clean_tables, load_sources};
use crate::rfm::aggregate::aggregate_metrics;
use crate::rfm::date::{format_iso_date, format_sale_date};
use crate::rfm::policy::{RFM_POLICY_V1, RFM_POLICY_VERSION, RfmPolicy};
use crate::rfm::recency::{format_recency, recency_category};
use crate::rfm::score::{ScoredColumn, score_column};
use crate::rfm::segment::classify;
use crate::rfm::trend::{TrendError, TrendTable, calculate_trends};
use crate::rfm::types::{
    CustomerMetrics, CustomerRecord, RfmScores, TransactionRecord, TrendRecord, TrendStatus,
};

/// Scored records plus the audit trail of the run that produced them.
#[derive(Debug, Clone)]
pub struct RfmRun {
    pub records: Vec<RfmRecord>,
    pub report: PipelineReport,
}

/// Result of the trend stage: either a computed table or the reason it
/// could not be built.
#[derive(Debug, Clone)]
pub enum TrendOutcome {
    Computed(TrendTable),
    Degraded(TrendError),
}

impl TrendOutcome {
    pub fn trend_for(&self, customer_code: &str, policy: RfmPolicy) -> TrendRecord {
        match self {
            Self::Computed(table) => table
                .trends
                .get(customer_code)
                .cloned()
                .unwrap_or_else(|| TrendRecord::degraded(policy.trend_window_months)),
            Self::Degraded(_) => TrendRecord::degraded(policy.trend_window_months),
        }
    }

    fn report(&self, policy: RfmPolicy) -> TrendReport {
        match self {
            Self::Computed(table) => TrendReport {
                status: TrendStatus::Computed.as_str().to_string(),
                reason: None,
                window_months: policy.trend_window_months as i64,
                window_start: Some(format_iso_date(&table.window.start)),
                window_end: Some(format_iso_date(&table.window.end)),
                month_labels: table.window.months.iter().map(|month| month.label()).collect(),
            },
            Self::Degraded(reason) => TrendReport {
                status: TrendStatus::Degraded.as_str().to_string(),
                reason: Some(reason.as_str().to_string()),
                window_months: policy.trend_window_months as i64,
                window_start: None,
                window_end: None,
                month_labels: Vec::new(),
            },
        }
    }
}

struct ScoredMetrics {
    recency: ScoredColumn,
    frequency: ScoredColumn,
    monetary: ScoredColumn,
}

impl ScoredMetrics {
    fn scores_at(&self, index: usize, policy: RfmPolicy) -> RfmScores {
        let pick = |column: &ScoredColumn| {
            column
                .scores
                .get(index)
                .copied()
                .unwrap_or(policy.neutral_score)
        };
        RfmScores::new(
            pick(&self.recency),
            pick(&self.frequency),
            pick(&self.monetary),
        )
    }

    fn report(&self) -> ScoringReport {
        ScoringReport {
            recency: metric_scoring("recency", &self.recency),
            frequency: metric_scoring("frequency", &self.frequency),
            monetary: metric_scoring("monetary", &self.monetary),
        }
    }
}

/// Loads both source tables from the resolved data directory and runs the
/// full pipeline over them.
pub fn run_from_dir(dir_override: Option<&Path>) -> ClientResult<RfmRun> {
    let tables = load_sources(dir_override)?;
    get_rfm_data(&tables)
}

/// Clean, aggregate, score, classify, attach trends, then merge customer
/// attributes. One record per customer with at least one surviving sale,
/// ordered by customer code.
pub fn get_rfm_data(tables: &SourceTables) -> ClientResult<RfmRun> {
    get_rfm_data_with_policy(tables, RFM_POLICY_V1)
}

fn get_rfm_data_with_policy(tables: &SourceTables, policy: RfmPolicy) -> ClientResult<RfmRun> {
    let run_id = format!("run_{}", Ulid::new());
    let span = info_span!("rfm_pipeline", run_id = %run_id);
    let _entered = span.enter();

    let cleaned = clean_tables(&tables.customers, &tables.sales);
    let aggregation = aggregate_metrics(&cleaned.transactions)?;
    let scored = score_metrics(&aggregation.metrics);

    let customer_codes = aggregation
        .metrics
        .iter()
        .map(|metrics| metrics.customer_code.clone())
        .collect::<Vec<String>>();
    let trends = resolve_trends(&cleaned.transactions, &customer_codes);

    let attributes = cleaned
        .customers
        .iter()
        .map(|customer| (customer.customer_code.as_str(), customer))
        .collect::<HashMap<&str, &CustomerRecord>>();

    let records = aggregation
        .metrics
        .iter()
        .enumerate()
        .map(|(index, metrics)| {
            let scores = scored.scores_at(index, policy);
            let trend = trends.trend_for(&metrics.customer_code, policy);
            let customer = attributes.get(metrics.customer_code.as_str()).copied();
            build_record(metrics, scores, trend, customer)
        })
        .collect::<Vec<RfmRecord>>();

    info!(customers = records.len(), "assigned customer segments");

    let report = PipelineReport {
        run_id,
        policy_version: RFM_POLICY_VERSION.to_string(),
        data_dir: tables
            .data_dir
            .as_ref()
            .map(|path| path.display().to_string()),
        reference_date: aggregation.reference_date.as_ref().map(format_iso_date),
        max_transaction_date: aggregation.max_transaction_date.as_ref().map(format_iso_date),
        customers_scored: records.len() as i64,
        cleaning: cleaned.report,
        scoring: scored.report(),
        trend: trends.report(policy),
    };

    Ok(RfmRun { records, report })
}

fn score_metrics(metrics: &[CustomerMetrics]) -> ScoredMetrics {
    let recency = metrics
        .iter()
        .map(|row| row.recency.map(|days| days as f64))
        .collect::<Vec<Option<f64>>>();
    let frequency = metrics
        .iter()
        .map(|row| Some(row.frequency as f64))
        .collect::<Vec<Option<f64>>>();
    let monetary = metrics
        .iter()
        .map(|row| Some(row.monetary))
        .collect::<Vec<Option<f64>>>();

    ScoredMetrics {
        recency: score_column("recency", &recency),
        frequency: score_column("frequency", &frequency),
        monetary: score_column("monetary", &monetary),
    }
}

/// Trend failures never abort the run; every customer gets the degraded
/// series instead.
pub fn resolve_trends(
    transactions: &[TransactionRecord],
    customer_codes: &[String],
) -> TrendOutcome {
    match calculate_trends(transactions, customer_codes) {
        Ok(table) => TrendOutcome::Computed(table),
        Err(reason) => {
            warn!(
                reason = reason.as_str(),
                detail = reason.describe(),
                "trend calculation failed; using zero-filled trends"
            );
            TrendOutcome::Degraded(reason)
        }
    }
}

fn build_record(
    metrics: &CustomerMetrics,
    scores: RfmScores,
    trend: TrendRecord,
    customer: Option<&CustomerRecord>,
) -> RfmRecord {
    let recency_days = metrics.recency.map(i64::abs);
    let segment = classify(scores);

    RfmRecord {
        customer_code: metrics.customer_code.clone(),
        recency: metrics.recency,
        frequency: metrics.frequency,
        monetary: finite(metrics.monetary),
        average_spend: finite(metrics.average_spend),
        last_sale_date: metrics.last_sale_date.as_ref().map(format_sale_date),
        recency_days,
        recency_formatted: format_recency(recency_days),
        recency_category: recency_category(recency_days).as_str().to_string(),
        recency_score: scores.recency,
        frequency_score: scores.frequency,
        monetary_score: scores.monetary,
        rfm_score: scores.code(),
        segment: segment.as_str().to_string(),
        trend_direction: trend.direction.as_str().to_string(),
        trend_peak: finite(trend.peak),
        trend_average: finite(trend.average),
        trend_status: trend.status.as_str().to_string(),
        trend_values: trend.values,
        customer_name: customer.and_then(|row| row.customer_name.clone()),
        customer_type: customer.and_then(|row| row.customer_type.clone()),
        customer_ranking: customer.and_then(|row| row.customer_ranking.clone()),
        salesperson: customer.and_then(|row| row.salesperson.clone()),
        postcode: customer.and_then(|row| row.postcode.clone()),
    }
}

fn metric_scoring(metric: &str, column: &ScoredColumn) -> MetricScoring {
    MetricScoring {
        metric: metric.to_string(),
        tier: column.tier.as_str().to_string(),
        bins: column.bins as i64,
        cut_points: column.cut_points.clone(),
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
