/// Deterministic RFM scoring policy identifier.
///
/// Emitted with every pipeline report so threshold changes stay auditable
/// across runs.
pub const RFM_POLICY_VERSION: &str = "rfm/v1";

/// v1 RFM pipeline policy.
///
/// Notes:
/// - Scores are ordinal in `1..=score_bins`; higher is always more favourable.
/// - `neutral_score` is used whenever a metric cannot be binned at all.
/// - Trend thresholds compare the second half of the window to the first.
#[derive(Debug, Clone, Copy)]
pub struct RfmPolicy {
    pub score_bins: usize,
    pub neutral_score: u8,
    pub trend_window_months: usize,
    pub trend_change_ratio: f64,
    pub trend_min_points: usize,
    pub invalid_postcode_marker: &'static str,
    pub recent_max_days: i64,
    pub active_max_days: i64,
    pub moderate_max_days: i64,
    pub distant_max_days: i64,
    pub days_per_month: f64,
    pub days_per_year: f64,
}

impl RfmPolicy {
    pub fn trend_up_threshold(self, first_half: f64) -> f64 {
        first_half * (1.0 + self.trend_change_ratio)
    }

    pub fn trend_down_threshold(self, first_half: f64) -> f64 {
        first_half * (1.0 - self.trend_change_ratio)
    }

    pub fn clamp_score(self, score: u8) -> u8 {
        let max = u8::try_from(self.score_bins).unwrap_or(5);
        score.clamp(1, max)
    }
}

pub const RFM_POLICY_V1: RfmPolicy = RfmPolicy {
    score_bins: 5,
    neutral_score: 3,
    trend_window_months: 12,
    trend_change_ratio: 0.10,
    trend_min_points: 6,
    invalid_postcode_marker: "INVALID",
    recent_max_days: 30,
    active_max_days: 90,
    moderate_max_days: 180,
    distant_max_days: 365,
    days_per_month: 30.44,
    days_per_year: 365.25,
};
