//! Analysis output contracts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::request::{AnalysisConstraints, AnalysisOptions, AnalysisScope, Weights};

/// One group of records reduced to mean metrics.
///
/// The identifier is derived from the scope value (model name, provider,
/// tier, or execution id). One instance exists per distinct scope value in
/// the batch; order is stable by first appearance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AggregatedGroup {
    /// Scope-derived identifier.
    pub id: String,
    /// Provider of the first record in the group.
    pub provider: String,
    /// Model of the first record in the group.
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Mean cost per request in USD.
    pub avg_cost_per_request_usd: f64,
    /// Mean cost per 1k tokens in USD.
    pub avg_cost_per_1k_tokens_usd: f64,
    /// Mean accumulated billing-unit cost in USD.
    pub avg_total_cost_usd: f64,
    /// Mean tokens consumed per request.
    pub avg_token_count: f64,
    /// Mean p50 latency in ms.
    pub avg_latency_p50_ms: f64,
    /// Mean p95 latency in ms.
    pub avg_latency_p95_ms: f64,
    /// Mean p99 latency in ms.
    pub avg_latency_p99_ms: f64,
    /// Mean average latency in ms.
    pub avg_latency_ms: f64,
    /// Mean minimum latency in ms.
    pub avg_latency_min_ms: f64,
    /// Mean maximum latency in ms.
    pub avg_latency_max_ms: f64,
    /// Mean composite quality over the records that report quality.
    /// `None` when no record in the group has quality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_quality: Option<f64>,
    /// Number of records aggregated into this group (≥ 1).
    pub record_count: u64,
}

/// Weighted tradeoff score attached 1:1 to an aggregated group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct TradeoffScore {
    /// Weighted combination of the three normalized dimensions, in `[0, 1]`.
    pub overall_score: f64,
    /// Normalized cost (1 = cheapest in batch).
    pub cost_score: f64,
    /// Normalized latency (1 = fastest in batch).
    pub latency_score: f64,
    /// Quality score in `[0, 1]`.
    pub quality_score: f64,
    /// Quality per unit of raw cost; 0 when cost is 0.
    pub efficiency_ratio: f64,
}

/// A scored group in the analysis output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScoredGroup {
    pub group: AggregatedGroup,
    pub score: TradeoffScore,
}

/// Projection of a group onto the raw (cost, latency, quality) triple.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParetoPoint {
    /// Group identifier.
    pub id: String,
    pub cost_usd: f64,
    pub latency_ms: f64,
    pub quality: f64,
    /// True iff no other group dominates this one.
    pub is_optimal: bool,
}

/// Result of the diminishing-returns walk.
///
/// This is a heuristic marginal-utility check, not a statistical test.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiminishingReturnsAnalysis {
    pub detected: bool,
    /// Cost level at which marginal quality gain collapsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_cost_usd: Option<f64>,
    /// Marginal quality gain per unit cost at the detected threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marginal_quality_gain: Option<f64>,
    /// Human-readable summary referencing the threshold.
    pub recommendation: String,
}

/// Category of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    CostOptimization,
    LatencyOptimization,
    QualityOptimization,
    Balanced,
    ConstraintViolation,
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CostOptimization => write!(f, "cost_optimization"),
            Self::LatencyOptimization => write!(f, "latency_optimization"),
            Self::QualityOptimization => write!(f, "quality_optimization"),
            Self::Balanced => write!(f, "balanced"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
        }
    }
}

/// Percent deltas of the recommended group relative to the balanced pick.
///
/// Negative cost/latency deltas mean the recommendation is cheaper/faster.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct EstimatedImpact {
    pub cost_delta_percent: f64,
    pub latency_delta_percent: f64,
    pub quality_delta_percent: f64,
}

/// A typed, ranked suggestion produced by the recommendation stage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub target_model: String,
    pub target_provider: String,
    pub rationale: String,
    pub estimated_impact: EstimatedImpact,
    /// Certainty in `[0, 1]`. Constraint violations are hard facts at 1.0.
    pub confidence: f64,
}

/// Batch-level evaluation of one limit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConstraintCheck {
    /// Echoed limit value.
    pub limit: f64,
    /// True only if every group satisfies the limit.
    pub satisfied: bool,
    /// Identifier of the worst-offending group, when violated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worst_offender: Option<String>,
    /// Worst observed value relative to the limit, as a percentage.
    pub utilization_percent: f64,
}

/// Echo of the constraints evaluated during the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConstraintsApplied {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost_per_request: Option<ConstraintCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_latency_p95_ms: Option<ConstraintCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quality_score: Option<ConstraintCheck>,
    /// True only if every present limit is satisfied by every group.
    pub satisfied: bool,
}

impl ConstraintsApplied {
    /// Iterate over the present checks with their limit names.
    pub fn checks(&self) -> impl Iterator<Item = (&'static str, &ConstraintCheck)> {
        [
            ("max_cost_per_request", self.max_cost_per_request.as_ref()),
            ("max_latency_p95_ms", self.max_latency_p95_ms.as_ref()),
            ("min_quality_score", self.min_quality_score.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, check)| check.map(|c| (name, c)))
    }
}

/// Headline figures for the run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisSummary {
    pub record_count: u64,
    pub group_count: u64,
    /// Identifier of the cheapest group.
    pub best_by_cost: String,
    /// Identifier of the fastest group (p95).
    pub best_by_latency: String,
    /// Identifier of the highest-quality group, when any group has quality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_by_quality: Option<String>,
    /// Identifier of the top group by overall score.
    pub best_overall: String,
}

/// Run metadata.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisMetadata {
    pub scope: AnalysisScope,
    pub weights_used: Weights,
    pub analysis_duration_ms: u64,
    pub engine_version: String,
}

/// The full result of one analysis invocation.
///
/// Optional sections are `None` when the corresponding option flag was
/// disabled or when the batch lacked the data to compute them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisOutput {
    /// All groups with their tradeoff scores, ranked best first.
    pub groups: Vec<ScoredGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pareto_frontier: Option<Vec<ParetoPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diminishing_returns: Option<DiminishingReturnsAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
    pub summary: AnalysisSummary,
    /// Present when the caller supplied constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints_applied: Option<ConstraintsApplied>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisOutput {
    /// Confidence aggregate for the decision event: the top group's
    /// overall score, 0 when there are no groups.
    pub fn top_confidence(&self) -> f64 {
        self.groups
            .first()
            .map(|g| g.score.overall_score)
            .unwrap_or(0.0)
    }
}

/// Full request body accepted by the CLI glue and integration callers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisRequest {
    pub records: Vec<super::record::PerformanceRecord>,
    pub scope: AnalysisScope,
    #[serde(default)]
    pub weights: Weights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<AnalysisConstraints>,
    #[serde(default)]
    pub options: AnalysisOptions,
}
