use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub customer_code: String,
    pub customer_name: Option<String>,
    pub customer_type: Option<String>,
    pub customer_ranking: Option<String>,
    pub salesperson: Option<String>,
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub transaction_number: Option<String>,
    pub customer_code: String,
    pub date: Option<NaiveDate>,
    pub amount: f64,
    pub cost: Option<f64>,
    pub profit: Option<f64>,
    pub branch: Option<String>,
    pub delivery_suburb: Option<String>,
    pub postcode: Option<String>,
}

/// Raw behavioural metrics for one customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerMetrics {
    pub customer_code: String,
    /// Last purchase minus the reference date, in days. Always negative.
    pub recency: Option<i64>,
    pub frequency: i64,
    pub monetary: f64,
    pub average_spend: f64,
    pub last_sale_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RfmScores {
    pub recency: u8,
    pub frequency: u8,
    pub monetary: u8,
}

impl RfmScores {
    pub const fn new(recency: u8, frequency: u8, monetary: u8) -> Self {
        Self {
            recency,
            frequency,
            monetary,
        }
    }

    pub fn code(self) -> String {
        format!("{}{}{}", self.recency, self.frequency, self.monetary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendStatus {
    Computed,
    Degraded,
}

impl TrendStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Computed => "computed",
            Self::Degraded => "degraded",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendRecord {
    pub values: Vec<f64>,
    pub direction: TrendDirection,
    pub peak: f64,
    pub average: f64,
    pub status: TrendStatus,
}

impl TrendRecord {
    pub fn degraded(window_months: usize) -> Self {
        Self {
            values: vec![0.0; window_months],
            direction: TrendDirection::Stable,
            peak: 0.0,
            average: 0.0,
            status: TrendStatus::Degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RfmScores, TrendDirection, TrendRecord, TrendStatus};

    #[test]
    fn score_code_concatenates_digits_in_rfm_order() {
        assert_eq!(RfmScores::new(4, 3, 2).code(), "432");
    }

    #[test]
    fn degraded_trend_is_zero_filled_and_flagged() {
        let trend = TrendRecord::degraded(12);
        assert_eq!(trend.values.len(), 12);
        assert!(trend.values.iter().all(|value| *value == 0.0));
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.status, TrendStatus::Degraded);
    }
}
