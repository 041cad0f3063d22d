//! Weighted tradeoff scoring.

use std::cmp::Ordering;

use costwise_core::{AggregatedGroup, ScoredGroup, TradeoffScore, Weights};

use crate::normalizer::NormalizedTriple;

/// Combine a normalized triple into a tradeoff score.
///
/// The efficiency ratio divides raw quality by raw cost per request; a
/// zero-cost group gets ratio 0 rather than infinity so nothing downstream
/// has to guard against non-finite values.
pub fn score(group: &AggregatedGroup, triple: &NormalizedTriple, weights: &Weights) -> TradeoffScore {
    let overall_score = weights.cost * triple.cost_score
        + weights.latency * triple.latency_score
        + weights.quality * triple.quality_score;

    let raw_cost = group.avg_cost_per_request_usd;
    let efficiency_ratio = if raw_cost > 0.0 {
        triple.quality_score / raw_cost
    } else {
        0.0
    };

    TradeoffScore {
        overall_score,
        cost_score: triple.cost_score,
        latency_score: triple.latency_score,
        quality_score: triple.quality_score,
        efficiency_ratio,
    }
}

/// Score every group and return them ranked best first.
pub fn score_all(
    groups: Vec<AggregatedGroup>,
    triples: &[NormalizedTriple],
    weights: &Weights,
) -> Vec<ScoredGroup> {
    let mut scored: Vec<ScoredGroup> = groups
        .into_iter()
        .zip(triples)
        .map(|(group, triple)| {
            let score = score(&group, triple, weights);
            ScoredGroup { group, score }
        })
        .collect();

    scored.sort_by(rank_order);
    scored
}

/// Total, reproducible ranking order for scored groups.
///
/// Higher overall score first; ties broken by higher efficiency ratio,
/// then by higher record count (more evidence), then by lexical group
/// identifier so that equal inputs always rank identically.
pub fn rank_order(a: &ScoredGroup, b: &ScoredGroup) -> Ordering {
    b.score
        .overall_score
        .total_cmp(&a.score.overall_score)
        .then_with(|| b.score.efficiency_ratio.total_cmp(&a.score.efficiency_ratio))
        .then_with(|| b.group.record_count.cmp(&a.group.record_count))
        .then_with(|| a.group.id.cmp(&b.group.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str, cost: f64, records: u64) -> AggregatedGroup {
        AggregatedGroup {
            id: id.into(),
            provider: "openai".into(),
            model: id.into(),
            tier: None,
            avg_cost_per_request_usd: cost,
            avg_cost_per_1k_tokens_usd: cost * 2.0,
            avg_total_cost_usd: cost,
            avg_token_count: 500.0,
            avg_latency_p50_ms: 250.0,
            avg_latency_p95_ms: 400.0,
            avg_latency_p99_ms: 450.0,
            avg_latency_ms: 300.0,
            avg_latency_min_ms: 200.0,
            avg_latency_max_ms: 500.0,
            avg_quality: Some(0.8),
            record_count: records,
        }
    }

    fn triple(cost: f64, latency: f64, quality: f64) -> NormalizedTriple {
        NormalizedTriple {
            cost_score: cost,
            latency_score: latency,
            quality_score: quality,
        }
    }

    #[test]
    fn overall_is_weighted_dot_product() {
        let weights = Weights {
            cost: 0.33,
            latency: 0.33,
            quality: 0.34,
        };
        let g = group("g", 0.02, 5);
        let t = triple(1.0, 0.5, 0.8);
        let s = score(&g, &t, &weights);

        let expected = 0.33 * 1.0 + 0.33 * 0.5 + 0.34 * 0.8;
        assert!((s.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_cost_yields_zero_efficiency() {
        let g = group("free", 0.0, 5);
        let s = score(&g, &triple(1.0, 1.0, 0.9), &Weights::default());
        assert_eq!(s.efficiency_ratio, 0.0);
        assert!(s.efficiency_ratio.is_finite());
    }

    #[test]
    fn efficiency_ratio_breaks_score_ties() {
        let weights = Weights::default();
        // Same normalized triple, different raw cost: equal overall score,
        // the cheaper group has the higher efficiency ratio.
        let cheap = group("cheap", 0.01, 5);
        let pricey = group("pricey", 0.05, 5);
        let t = triple(0.5, 0.5, 0.8);

        let scored = score_all(vec![pricey, cheap], &[t, t], &weights);
        assert_eq!(scored[0].group.id, "cheap");
    }

    #[test]
    fn record_count_breaks_remaining_ties() {
        let weights = Weights::default();
        let few = group("few", 0.02, 3);
        let many = group("many", 0.02, 30);
        let t = triple(0.5, 0.5, 0.8);

        let scored = score_all(vec![few, many], &[t, t], &weights);
        assert_eq!(scored[0].group.id, "many");
    }

    #[test]
    fn identifier_is_the_final_tie_break() {
        let weights = Weights::default();
        let b = group("bravo", 0.02, 5);
        let a = group("alpha", 0.02, 5);
        let t = triple(0.5, 0.5, 0.8);

        let scored = score_all(vec![b, a], &[t, t], &weights);
        assert_eq!(scored[0].group.id, "alpha");
    }
}
