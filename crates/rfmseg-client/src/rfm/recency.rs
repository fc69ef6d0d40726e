use crate::rfm::policy::{RFM_POLICY_V1, RfmPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyCategory {
    Recent,
    Active,
    Moderate,
    Distant,
    Inactive,
    Unknown,
}

impl RecencyCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "Recent",
            Self::Active => "Active",
            Self::Moderate => "Moderate",
            Self::Distant => "Distant",
            Self::Inactive => "Inactive",
            Self::Unknown => "Unknown",
        }
    }
}

pub fn recency_category(days: Option<i64>) -> RecencyCategory {
    recency_category_with_policy(days, RFM_POLICY_V1)
}

fn recency_category_with_policy(days: Option<i64>, policy: RfmPolicy) -> RecencyCategory {
    let Some(days) = days else {
        return RecencyCategory::Unknown;
    };
    if days < 0 {
        return RecencyCategory::Unknown;
    }

    if days <= policy.recent_max_days {
        RecencyCategory::Recent
    } else if days <= policy.active_max_days {
        RecencyCategory::Active
    } else if days <= policy.moderate_max_days {
        RecencyCategory::Moderate
    } else if days <= policy.distant_max_days {
        RecencyCategory::Distant
    } else {
        RecencyCategory::Inactive
    }
}

/// Human-readable "time since last purchase".
pub fn format_recency(days: Option<i64>) -> String {
    format_recency_with_policy(days, RFM_POLICY_V1)
}

fn format_recency_with_policy(days: Option<i64>, policy: RfmPolicy) -> String {
    let Some(days) = days else {
        return "Unknown".to_string();
    };
    if days < 0 {
        return "Unknown".to_string();
    }

    match days {
        0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        2..=29 => format!("{days} days ago"),
        30..=364 => {
            let months = round_to_tenth(days as f64 / policy.days_per_month);
            if months == 1.0 {
                "1 month ago".to_string()
            } else {
                format!("{months:.1} months ago")
            }
        }
        _ => {
            let years = round_to_tenth(days as f64 / policy.days_per_year);
            if years == 1.0 {
                "1 year ago".to_string()
            } else {
                format!("{years:.1} years ago")
            }
        }
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
