use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::rfm::policy::{RFM_POLICY_V1, RfmPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringTier {
    /// Full quantile binning at the policy bin count.
    Quintile,
    /// One bin per distinct value when there are fewer distinct values than bins.
    Reduced,
    /// Constant neutral score for every row.
    Neutral,
}

impl ScoringTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quintile => "quintile",
            Self::Reduced => "reduced",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredColumn {
    pub scores: Vec<u8>,
    pub tier: ScoringTier,
    pub bins: usize,
    pub cut_points: Vec<f64>,
}

/// Scores one metric column where larger raw values are more favourable.
///
/// Undefined values never participate in binning and receive the neutral
/// score.
pub fn score_column(metric: &str, values: &[Option<f64>]) -> ScoredColumn {
    score_column_with_policy(metric, values, RFM_POLICY_V1)
}

fn score_column_with_policy(
    metric: &str,
    values: &[Option<f64>],
    policy: RfmPolicy,
) -> ScoredColumn {
    if let Some(scored) = try_quantile_tier(values, policy) {
        info!(
            metric,
            cut_points = ?scored.cut_points,
            "assigned quintile scores"
        );
        return scored;
    }

    let distinct = distinct_count(values);
    warn!(
        metric,
        distinct,
        "quintile binning failed; falling back to reduced binning"
    );

    if let Some(scored) = try_reduced_tier(values, policy) {
        info!(
            metric,
            bins = scored.bins,
            cut_points = ?scored.cut_points,
            "assigned reduced-cardinality scores"
        );
        return scored;
    }

    warn!(
        metric,
        neutral_score = policy.neutral_score,
        "reduced binning failed; every row receives the neutral score"
    );
    neutral_tier(values, policy)
}

pub fn try_quantile_tier(values: &[Option<f64>], policy: RfmPolicy) -> Option<ScoredColumn> {
    bin_with(values, policy.score_bins, ScoringTier::Quintile, policy)
}

pub fn try_reduced_tier(values: &[Option<f64>], policy: RfmPolicy) -> Option<ScoredColumn> {
    let distinct = distinct_count(values);
    if distinct == 0 || distinct >= policy.score_bins {
        return None;
    }
    bin_with(values, distinct, ScoringTier::Reduced, policy)
}

pub fn neutral_tier(values: &[Option<f64>], policy: RfmPolicy) -> ScoredColumn {
    ScoredColumn {
        scores: vec![policy.neutral_score; values.len()],
        tier: ScoringTier::Neutral,
        bins: 0,
        cut_points: Vec::new(),
    }
}

fn bin_with(
    values: &[Option<f64>],
    bins: usize,
    tier: ScoringTier,
    policy: RfmPolicy,
) -> Option<ScoredColumn> {
    let sorted = sorted_defined(values);
    let edges = quantile_edges(&sorted, bins)?;

    let scores = values
        .iter()
        .map(|value| match value {
            Some(current) if current.is_finite() => {
                policy.clamp_score(bin_label(*current, &edges))
            }
            _ => policy.neutral_score,
        })
        .collect::<Vec<u8>>();

    Some(ScoredColumn {
        scores,
        tier,
        bins,
        cut_points: edges,
    })
}

/// Linear-interpolated quantile edges with duplicates dropped.
///
/// Returns `None` when dropping duplicates leaves fewer than `bins` bins.
pub(crate) fn quantile_edges(sorted: &[f64], bins: usize) -> Option<Vec<f64>> {
    if sorted.is_empty() || bins == 0 {
        return None;
    }

    let mut edges: Vec<f64> = Vec::with_capacity(bins + 1);
    for step in 0..=bins {
        let edge = quantile(sorted, step as f64 / bins as f64);
        if edges.last().is_none_or(|last| *last != edge) {
            edges.push(edge);
        }
    }

    if edges.len() != bins + 1 {
        return None;
    }
    Some(edges)
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let last_index = sorted.len() - 1;
    let position = q * last_index as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last_index);
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Right-closed bins `(e[i-1], e[i]]`; the first bin also holds `e[0]`.
fn bin_label(value: f64, edges: &[f64]) -> u8 {
    let bins = edges.len().saturating_sub(1);
    let index = edges
        .iter()
        .skip(1)
        .position(|edge| value <= *edge)
        .map_or(bins, |position| position + 1);
    u8::try_from(index).unwrap_or(u8::MAX)
}

fn sorted_defined(values: &[Option<f64>]) -> Vec<f64> {
    let mut sorted = values
        .iter()
        .filter_map(|value| *value)
        .filter(|value| value.is_finite())
        .collect::<Vec<f64>>();
    sorted.sort_by(|left, right| left.total_cmp(right));
    sorted
}

fn distinct_count(values: &[Option<f64>]) -> usize {
    values
        .iter()
        .filter_map(|value| *value)
        .filter(|value| value.is_finite())
        .map(f64::to_bits)
        .collect::<BTreeSet<u64>>()
        .len()
}
