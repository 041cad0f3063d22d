//! Diminishing-returns detection.
//!
//! Walks quality-bearing groups in ascending cost order and looks for the
//! point where marginal quality gain per extra dollar collapses relative to
//! the first step. This is a heuristic marginal-utility check, not a
//! statistical significance test, and its drop fraction is a configurable
//! policy value.

use costwise_core::{AggregatedGroup, DiminishingReturnsAnalysis, PolicyConfig};

/// Internal detail of a detected drop, consumed by the recommender.
#[derive(Debug, Clone)]
pub struct DetectedDrop {
    /// Identifier of the group just below the threshold (the last cost
    /// level that still paid off).
    pub group_below_threshold: String,
    /// How hard the marginal ratio collapsed, in `[0, 1]`; 1 means the
    /// extra spend bought nothing.
    pub strength: f64,
}

/// Outcome of the walk: the reportable analysis plus recommender detail.
#[derive(Debug, Clone)]
pub struct DiminishingOutcome {
    pub analysis: DiminishingReturnsAnalysis,
    pub drop: Option<DetectedDrop>,
}

fn not_detected(reason: &str) -> DiminishingOutcome {
    DiminishingOutcome {
        analysis: DiminishingReturnsAnalysis {
            detected: false,
            threshold_cost_usd: None,
            marginal_quality_gain: None,
            recommendation: reason.to_string(),
        },
        drop: None,
    }
}

/// Detect the cost level beyond which additional spend yields negligible
/// quality gain.
///
/// Needs at least `policy.min_quality_groups` quality-bearing groups and a
/// positive first-step marginal ratio to establish a baseline; otherwise
/// the result is `detected = false` with the optional fields omitted
/// (insufficiency is not an error at this stage).
pub fn detect(groups: &[AggregatedGroup], policy: &PolicyConfig) -> DiminishingOutcome {
    let mut scored: Vec<(&AggregatedGroup, f64)> = groups
        .iter()
        .filter_map(|g| g.avg_quality.map(|q| (g, q)))
        .collect();

    if scored.len() < policy.min_quality_groups {
        return not_detected(
            "not enough quality-scored groups to assess diminishing returns",
        );
    }

    scored.sort_by(|a, b| {
        a.0.avg_cost_per_request_usd
            .total_cmp(&b.0.avg_cost_per_request_usd)
            .then_with(|| a.0.id.cmp(&b.0.id))
    });

    // Marginal quality gain per unit cost for each consecutive step.
    // Steps with no cost increase carry no marginal information and are
    // skipped.
    let mut steps: Vec<(usize, f64)> = Vec::new();
    for i in 1..scored.len() {
        let delta_cost =
            scored[i].0.avg_cost_per_request_usd - scored[i - 1].0.avg_cost_per_request_usd;
        if delta_cost <= 0.0 {
            continue;
        }
        let delta_quality = scored[i].1 - scored[i - 1].1;
        steps.push((i, delta_quality / delta_cost));
    }

    let Some(&(_, first_ratio)) = steps.first() else {
        return not_detected("no cost separation between quality-scored groups");
    };
    if first_ratio <= 0.0 {
        return not_detected("no positive marginal quality gain to establish a baseline");
    }

    let cutoff = first_ratio * policy.diminishing_drop_fraction;
    for &(idx, ratio) in steps.iter().skip(1) {
        if ratio < cutoff {
            let threshold_group = scored[idx].0;
            let below = scored[idx - 1].0;
            let threshold_cost = threshold_group.avg_cost_per_request_usd;

            let strength = (1.0 - (ratio / cutoff).max(0.0)).clamp(0.0, 1.0);
            tracing::debug!(
                threshold_group = %threshold_group.id,
                threshold_cost_usd = threshold_cost,
                marginal_ratio = ratio,
                "Diminishing returns detected"
            );

            return DiminishingOutcome {
                analysis: DiminishingReturnsAnalysis {
                    detected: true,
                    threshold_cost_usd: Some(threshold_cost),
                    marginal_quality_gain: Some(ratio),
                    recommendation: format!(
                        "Quality gains flatten above ${:.4} per request ('{}'); \
                         '{}' captures most of the quality at lower cost",
                        threshold_cost, threshold_group.id, below.id
                    ),
                },
                drop: Some(DetectedDrop {
                    group_below_threshold: below.id.clone(),
                    strength,
                }),
            };
        }
    }

    not_detected("marginal quality gain holds up across the observed cost range")
}
