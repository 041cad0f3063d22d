//! Batch-level constraint evaluation.
//!
//! Each caller-supplied limit is checked against every group. The result
//! is a satisfaction report, not a filter: violating groups stay in the
//! output and surface through the `constraint_violation` recommendation.

use costwise_core::{AggregatedGroup, AnalysisConstraints, ConstraintCheck, ConstraintsApplied};

/// Check an upper limit: worst offender is the group with the highest
/// value. Utilization is the worst value as a percentage of the limit.
fn check_max(
    groups: &[AggregatedGroup],
    limit: f64,
    value: impl Fn(&AggregatedGroup) -> f64,
) -> ConstraintCheck {
    let Some(worst) = groups.iter().max_by(|a, b| value(a).total_cmp(&value(b))) else {
        return ConstraintCheck {
            limit,
            satisfied: true,
            worst_offender: None,
            utilization_percent: 0.0,
        };
    };
    let worst_value = value(worst);
    let satisfied = worst_value <= limit;

    ConstraintCheck {
        limit,
        satisfied,
        worst_offender: (!satisfied).then(|| worst.id.clone()),
        utilization_percent: if limit > 0.0 {
            (worst_value / limit) * 100.0
        } else {
            0.0
        },
    }
}

/// Check a lower limit on quality: worst offender is the lowest-quality
/// group, and a group without quality cannot satisfy a quality floor.
fn check_min_quality(groups: &[AggregatedGroup], limit: f64) -> ConstraintCheck {
    let quality_of = |g: &AggregatedGroup| g.avg_quality.unwrap_or(0.0);
    let Some(worst) = groups
        .iter()
        .min_by(|a, b| quality_of(a).total_cmp(&quality_of(b)))
    else {
        return ConstraintCheck {
            limit,
            satisfied: true,
            worst_offender: None,
            utilization_percent: 100.0,
        };
    };
    let worst_value = quality_of(worst);
    let satisfied = worst_value >= limit;

    ConstraintCheck {
        limit,
        satisfied,
        worst_offender: (!satisfied).then(|| worst.id.clone()),
        utilization_percent: if limit > 0.0 {
            (worst_value / limit) * 100.0
        } else {
            100.0
        },
    }
}

/// Evaluate every present limit against every group.
pub fn evaluate(groups: &[AggregatedGroup], constraints: &AnalysisConstraints) -> ConstraintsApplied {
    let max_cost_per_request = constraints
        .max_cost_per_request
        .map(|limit| check_max(groups, limit, |g| g.avg_cost_per_request_usd));
    let max_latency_p95_ms = constraints
        .max_latency_p95_ms
        .map(|limit| check_max(groups, limit, |g| g.avg_latency_p95_ms));
    let min_quality_score = constraints
        .min_quality_score
        .map(|limit| check_min_quality(groups, limit));

    let satisfied = [
        max_cost_per_request.as_ref(),
        max_latency_p95_ms.as_ref(),
        min_quality_score.as_ref(),
    ]
    .into_iter()
    .flatten()
    .all(|check| check.satisfied);

    let applied = ConstraintsApplied {
        max_cost_per_request,
        max_latency_p95_ms,
        min_quality_score,
        satisfied,
    };

    if !applied.satisfied {
        tracing::debug!(
            violated = applied.checks().filter(|(_, c)| !c.satisfied).count(),
            "Constraint evaluation found violations"
        );
    }
    applied
}
