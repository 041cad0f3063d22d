//! Batch-relative metric normalization.
//!
//! Maps each group's raw metrics onto comparable `[0, 1]` scales with
//! polarity correction: cheaper and faster normalize toward 1. The scales
//! are always relative to the batch, never absolute.

use costwise_core::AggregatedGroup;

/// Normalized (cost, latency, quality) triple for one group.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedTriple {
    pub cost_score: f64,
    pub latency_score: f64,
    pub quality_score: f64,
}

/// Invert a raw value onto `[0, 1]` against the batch min/max.
///
/// A degenerate range (single group or uniform values) normalizes to 1.0:
/// there is no information to discriminate on, so all groups are treated as
/// equally good rather than erroring.
fn invert(raw: f64, min: f64, max: f64) -> f64 {
    if max == min {
        1.0
    } else {
        (max - raw) / (max - min)
    }
}

/// Quality score substituted for groups without quality: the minimum
/// quality present in the batch (the conservative assumption), or
/// `neutral_quality` when no group has quality at all. Shared with the
/// raw-passthrough scoring path so both apply the same policy.
pub fn quality_fallback(groups: &[AggregatedGroup], neutral_quality: f64) -> f64 {
    let floor = groups
        .iter()
        .filter_map(|g| g.avg_quality)
        .fold(f64::INFINITY, f64::min);
    if floor.is_finite() {
        floor
    } else {
        neutral_quality
    }
}

/// Normalize all groups relative to the batch.
///
/// Quality policy: a group without quality takes the minimum quality
/// present in the batch (the conservative assumption); when no group has
/// quality at all, every group gets `neutral_quality` (0.5 by default
/// configuration). Both are deliberate documented defaults, configurable
/// through the policy block.
pub fn normalize(groups: &[AggregatedGroup], neutral_quality: f64) -> Vec<NormalizedTriple> {
    let cost_min = groups
        .iter()
        .map(|g| g.avg_cost_per_request_usd)
        .fold(f64::INFINITY, f64::min);
    let cost_max = groups
        .iter()
        .map(|g| g.avg_cost_per_request_usd)
        .fold(f64::NEG_INFINITY, f64::max);
    let latency_min = groups
        .iter()
        .map(|g| g.avg_latency_p95_ms)
        .fold(f64::INFINITY, f64::min);
    let latency_max = groups
        .iter()
        .map(|g| g.avg_latency_p95_ms)
        .fold(f64::NEG_INFINITY, f64::max);

    let quality_default = quality_fallback(groups, neutral_quality);

    groups
        .iter()
        .map(|g| NormalizedTriple {
            cost_score: invert(g.avg_cost_per_request_usd, cost_min, cost_max),
            latency_score: invert(g.avg_latency_p95_ms, latency_min, latency_max),
            quality_score: g.avg_quality.unwrap_or(quality_default),
        })
        .collect()
}
