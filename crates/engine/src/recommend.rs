//! Recommendation synthesis.
//!
//! Applies the priority rules over the scored groups, the Pareto frontier,
//! the diminishing-returns outcome, and the constraint evaluation. At most
//! one recommendation is emitted per category; output is ordered by
//! confidence descending.

use costwise_core::{
    ConstraintsApplied, EstimatedImpact, ModelCatalog, ParetoPoint, Recommendation,
    RecommendationKind, ScoredGroup,
};

use crate::diminishing::DiminishingOutcome;

/// Rule-2 confidence band: the diminishing-returns heuristic never claims
/// more than 0.95 or less than 0.5.
const DIMINISHING_CONFIDENCE_MIN: f64 = 0.5;
const DIMINISHING_CONFIDENCE_MAX: f64 = 0.95;

/// Everything the rules consume.
pub struct RecommendationInputs<'a> {
    /// Scored groups, ranked best first.
    pub ranked: &'a [ScoredGroup],
    /// Pareto points for all groups.
    pub pareto: &'a [ParetoPoint],
    /// Diminishing-returns outcome, when that stage ran.
    pub diminishing: Option<&'a DiminishingOutcome>,
    /// Constraint evaluation, when constraints were supplied.
    pub constraints: Option<&'a ConstraintsApplied>,
    /// Injected model reference table, for rationale enrichment.
    pub catalog: Option<&'a ModelCatalog>,
}

/// Percent deltas of `candidate` relative to `baseline` on the raw metrics.
fn impact_versus(baseline: &ScoredGroup, candidate: &ScoredGroup) -> EstimatedImpact {
    fn delta_percent(base: f64, alt: f64) -> f64 {
        if base != 0.0 {
            (alt - base) / base * 100.0
        } else {
            0.0
        }
    }

    EstimatedImpact {
        cost_delta_percent: delta_percent(
            baseline.group.avg_cost_per_request_usd,
            candidate.group.avg_cost_per_request_usd,
        ),
        latency_delta_percent: delta_percent(
            baseline.group.avg_latency_p95_ms,
            candidate.group.avg_latency_p95_ms,
        ),
        quality_delta_percent: delta_percent(
            baseline.group.avg_quality.unwrap_or(0.0),
            candidate.group.avg_quality.unwrap_or(0.0),
        ),
    }
}

/// Append catalog reference data to a rationale when the table knows the
/// model.
fn enrich_rationale(rationale: String, group: &ScoredGroup, catalog: Option<&ModelCatalog>) -> String {
    let Some(catalog) = catalog else {
        return rationale;
    };
    let key = format!("{}:{}", group.group.provider, group.group.model);
    let entry = catalog.get(&key).or_else(|| catalog.get(&group.group.model));
    match entry {
        Some(entry) => format!(
            "{} (catalog {}: reference cost ${:.4}/1k tokens, reference quality {:.2})",
            rationale,
            catalog.version,
            entry.combined_cost_per_1k(),
            entry.quality_score
        ),
        None => rationale,
    }
}

fn build(
    kind: RecommendationKind,
    target: &ScoredGroup,
    baseline: &ScoredGroup,
    rationale: String,
    confidence: f64,
    catalog: Option<&ModelCatalog>,
) -> Recommendation {
    Recommendation {
        kind,
        target_model: target.group.model.clone(),
        target_provider: target.group.provider.clone(),
        rationale: enrich_rationale(rationale, target, catalog),
        estimated_impact: impact_versus(baseline, target),
        confidence,
    }
}

/// Apply the priority rules and rank the result by confidence.
pub fn generate(inputs: &RecommendationInputs<'_>) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let find = |id: &str| inputs.ranked.iter().find(|g| g.group.id == id);

    // The balanced pick anchors every impact estimate: the Pareto-optimal
    // group with the highest overall score (ranked order is already the
    // deterministic tie-broken one).
    let optimal_ids: Vec<&str> = inputs
        .pareto
        .iter()
        .filter(|p| p.is_optimal)
        .map(|p| p.id.as_str())
        .collect();
    let Some(balanced) = inputs
        .ranked
        .iter()
        .find(|g| optimal_ids.contains(&g.group.id.as_str()))
    else {
        return recommendations;
    };

    // Rule 1: an unsatisfied constraint is a hard fact, confidence 1.0.
    if let Some(applied) = inputs.constraints {
        if !applied.satisfied {
            if let Some((name, check, offender)) = applied
                .checks()
                .filter(|(_, c)| !c.satisfied)
                .find_map(|(name, check)| {
                    let offender = check.worst_offender.as_deref().and_then(find)?;
                    Some((name, check, offender))
                })
            {
                recommendations.push(build(
                    RecommendationKind::ConstraintViolation,
                    offender,
                    balanced,
                    format!(
                        "'{}' violates {} (limit {}, observed {:.1}% of limit); \
                         replace it or relax the constraint",
                        offender.group.id, name, check.limit, check.utilization_percent
                    ),
                    1.0,
                    inputs.catalog,
                ));
            }
        }
    }

    // Rule 2: diminishing returns names the last cost level that paid off.
    // Confidence scales with the strength of the marginal-ratio collapse.
    let diminishing_fired = if let Some(outcome) = inputs.diminishing {
        match (&outcome.drop, outcome.analysis.threshold_cost_usd) {
            (Some(drop), Some(threshold)) => {
                if let Some(target) = find(&drop.group_below_threshold) {
                    let confidence = (DIMINISHING_CONFIDENCE_MIN
                        + drop.strength
                            * (DIMINISHING_CONFIDENCE_MAX - DIMINISHING_CONFIDENCE_MIN))
                        .clamp(DIMINISHING_CONFIDENCE_MIN, DIMINISHING_CONFIDENCE_MAX);
                    recommendations.push(build(
                        RecommendationKind::CostOptimization,
                        target,
                        balanced,
                        format!(
                            "quality gains flatten above ${:.4} per request; \
                             '{}' sits just below that threshold",
                            threshold, target.group.id
                        ),
                        confidence,
                        inputs.catalog,
                    ));
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    } else {
        false
    };

    // Rule 3: the balanced pick itself, confidence = its overall score.
    recommendations.push(build(
        RecommendationKind::Balanced,
        balanced,
        balanced,
        format!(
            "'{}' has the best weighted cost/latency/quality tradeoff on the Pareto frontier",
            balanced.group.id
        ),
        balanced.score.overall_score,
        inputs.catalog,
    ));

    // Rule 4: cheapest Pareto-optimal group, unless rule 2 already claimed
    // the cost_optimization category.
    if !diminishing_fired {
        let cheapest_optimal = inputs
            .pareto
            .iter()
            .filter(|p| p.is_optimal)
            .min_by(|a, b| a.cost_usd.total_cmp(&b.cost_usd).then_with(|| a.id.cmp(&b.id)));
        if let Some(target) = cheapest_optimal.and_then(|p| find(&p.id)) {
            let mut rationale = format!(
                "'{}' is the cheapest option not dominated on latency or quality",
                target.group.id
            );
            // When the catalog knows a cheaper reference model at the same
            // quality level, name it as a candidate worth benchmarking.
            if let Some(reference) = target
                .group
                .avg_quality
                .and_then(|q| inputs.catalog?.cheapest_with_quality(q))
            {
                let key = format!("{}:{}", target.group.provider, target.group.model);
                if reference.model_id != key
                    && reference.model_id != target.group.model
                    && reference.combined_cost_per_1k() < target.group.avg_cost_per_1k_tokens_usd
                {
                    rationale.push_str(&format!(
                        "; catalog lists '{}' (${:.4}/1k tokens) as the cheapest \
                         reference model at that quality level",
                        reference.model_id,
                        reference.combined_cost_per_1k()
                    ));
                }
            }
            recommendations.push(build(
                RecommendationKind::CostOptimization,
                target,
                balanced,
                rationale,
                target.score.cost_score,
                inputs.catalog,
            ));
        }
    }

    // Rule 5: highest quality, when it is not already the balanced pick.
    let best_quality = inputs.ranked.iter().max_by(|a, b| {
        a.score
            .quality_score
            .total_cmp(&b.score.quality_score)
            .then_with(|| b.group.id.cmp(&a.group.id))
    });
    if let Some(target) = best_quality {
        if target.group.id != balanced.group.id {
            recommendations.push(build(
                RecommendationKind::QualityOptimization,
                target,
                balanced,
                format!(
                    "'{}' delivers the highest observed quality in the batch",
                    target.group.id
                ),
                target.score.quality_score,
                inputs.catalog,
            ));
        }
    }

    // Confidence descending; the stable sort keeps rule priority as the
    // tie-break.
    recommendations.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    tracing::debug!(count = recommendations.len(), "Generated recommendations");
    recommendations
}
