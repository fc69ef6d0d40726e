use serde::Serialize;

/// One scored customer as exposed to callers.
///
/// Every optional field serializes as an explicit `null`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RfmRecord {
    pub customer_code: String,
    pub recency: Option<i64>,
    pub frequency: i64,
    pub monetary: Option<f64>,
    pub average_spend: Option<f64>,
    pub last_sale_date: Option<String>,
    pub recency_days: Option<i64>,
    pub recency_formatted: String,
    pub recency_category: String,
    pub recency_score: u8,
    pub frequency_score: u8,
    pub monetary_score: u8,
    pub rfm_score: String,
    pub segment: String,
    pub trend_values: Vec<f64>,
    pub trend_direction: String,
    pub trend_peak: Option<f64>,
    pub trend_average: Option<f64>,
    pub trend_status: String,
    pub customer_name: Option<String>,
    pub customer_type: Option<String>,
    pub customer_ranking: Option<String>,
    pub salesperson: Option<String>,
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CleaningReport {
    pub customer_rows_read: i64,
    pub customers_missing_code: i64,
    pub duplicate_customer_codes: i64,
    pub customer_invalid_postcodes: i64,
    pub sales_rows_read: i64,
    pub sales_invalid_postcodes: i64,
    pub sales_missing_branch: i64,
    pub sales_missing_delivery_suburb: i64,
    pub sales_unparsable_dates: i64,
    pub negative_amounts_removed: i64,
    pub missing_amounts_removed: i64,
    pub unmatched_customer_removed: i64,
    pub sales_rows_retained: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricScoring {
    pub metric: String,
    pub tier: String,
    pub bins: i64,
    pub cut_points: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoringReport {
    pub recency: MetricScoring,
    pub frequency: MetricScoring,
    pub monetary: MetricScoring,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendReport {
    pub status: String,
    pub reason: Option<String>,
    pub window_months: i64,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub month_labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PipelineReport {
    pub run_id: String,
    pub policy_version: String,
    pub data_dir: Option<String>,
    pub reference_date: Option<String>,
    pub max_transaction_date: Option<String>,
    pub customers_scored: i64,
    pub cleaning: CleaningReport,
    pub scoring: ScoringReport,
    pub trend: TrendReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct RfmData {
    pub report: PipelineReport,
    pub records: Vec<RfmRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SegmentStatistic {
    pub segment: String,
    pub customer_count: i64,
    pub total_revenue: f64,
    pub avg_revenue: f64,
    pub avg_frequency: f64,
    pub avg_recency_days: Option<f64>,
    pub customer_percentage: f64,
    pub revenue_percentage: f64,
    pub priority: String,
    pub risk_level: String,
    pub recommended_action: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SegmentInsights {
    pub total_customers: i64,
    pub total_revenue: f64,
    pub segments_count: i64,
    pub high_priority_customers: i64,
    pub high_priority_revenue: f64,
    pub high_risk_customers: i64,
    pub top_segment: Option<String>,
    pub most_valuable_segment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentAnalysisData {
    pub run_id: String,
    pub reference_date: Option<String>,
    pub segment_statistics: Vec<SegmentStatistic>,
    pub key_insights: SegmentInsights,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilterOptionsData {
    pub customer_type: Vec<String>,
    pub salesperson: Vec<String>,
    pub segment: Vec<String>,
}
