//! Pareto frontier over the raw (cost, latency, quality) objectives.

use costwise_core::{AggregatedGroup, ParetoPoint};

/// Quality used for dominance when a group reports none.
///
/// The normalizer's fallback does not apply here: dominance works on raw
/// objectives, and an unscored group should neither dominate nor escape
/// domination on quality, so it sits at the floor.
const UNSCORED_QUALITY: f64 = 0.0;

fn objectives(group: &AggregatedGroup) -> (f64, f64, f64) {
    (
        group.avg_cost_per_request_usd,
        group.avg_latency_p95_ms,
        group.avg_quality.unwrap_or(UNSCORED_QUALITY),
    )
}

/// Whether group `a` dominates group `b`.
///
/// `a` dominates `b` when it is no worse on every objective (≤ cost,
/// ≤ latency, ≥ quality) and strictly better on at least one.
fn dominates(a: &AggregatedGroup, b: &AggregatedGroup) -> bool {
    let (a_cost, a_latency, a_quality) = objectives(a);
    let (b_cost, b_latency, b_quality) = objectives(b);

    let no_worse = a_cost <= b_cost && a_latency <= b_latency && a_quality >= b_quality;
    let strictly_better = a_cost < b_cost || a_latency < b_latency || a_quality > b_quality;

    no_worse && strictly_better
}

/// Compute one Pareto point per group, ordered by ascending cost.
///
/// Pairwise O(n²) dominance check; n is the number of distinct scope
/// values, not raw records, so no sweep-line is warranted.
pub fn build(groups: &[AggregatedGroup]) -> Vec<ParetoPoint> {
    let mut points: Vec<ParetoPoint> = groups
        .iter()
        .map(|candidate| {
            let is_optimal = !groups
                .iter()
                .any(|other| other.id != candidate.id && dominates(other, candidate));
            let (cost_usd, latency_ms, quality) = objectives(candidate);
            ParetoPoint {
                id: candidate.id.clone(),
                cost_usd,
                latency_ms,
                quality,
                is_optimal,
            }
        })
        .collect();

    points.sort_by(|a, b| a.cost_usd.total_cmp(&b.cost_usd).then_with(|| a.id.cmp(&b.id)));

    let optimal = points.iter().filter(|p| p.is_optimal).count();
    tracing::debug!(groups = points.len(), optimal, "Computed Pareto frontier");
    points
}
