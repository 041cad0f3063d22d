//! Analysis request surface: scope, weights, constraints, options.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tolerance for the weights-sum-to-one invariant.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Grouping dimension used to aggregate records before scoring.
///
/// Exactly one scope is active per analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisScope {
    Model,
    Provider,
    Tier,
    Execution,
}

impl std::fmt::Display for AnalysisScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Provider => write!(f, "provider"),
            Self::Tier => write!(f, "tier"),
            Self::Execution => write!(f, "execution"),
        }
    }
}

/// Relative importance of the three tradeoff dimensions.
///
/// Each weight lies in `[0, 1]` and the three must sum to 1.0 within
/// [`WEIGHT_SUM_TOLERANCE`]. Validation happens once at the engine
/// boundary, not inside the stages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct Weights {
    pub cost: f64,
    pub latency: f64,
    pub quality: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            cost: 0.33,
            latency: 0.33,
            quality: 0.34,
        }
    }
}

impl Weights {
    /// Validate the cross-field invariant: weights in range, summing to 1.0.
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("cost", self.cost),
            ("latency", self.latency),
            ("quality", self.quality),
        ] {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(Error::invalid_input(format!(
                    "weight '{}' must be in [0, 1], got {}",
                    name, w
                )));
            }
        }

        let sum = self.cost + self.latency + self.quality;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::invalid_input(format!(
                "weights must sum to 1.0 (±{}), got {}",
                WEIGHT_SUM_TOLERANCE, sum
            )));
        }

        Ok(())
    }
}

/// Hard limits evaluated against every group.
///
/// Violations are reported, never thrown: groups exceeding a limit stay in
/// the output and surface as a `constraint_violation` recommendation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost_per_request: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_latency_p95_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quality_score: Option<f64>,
}

impl AnalysisConstraints {
    /// Whether any limit is present.
    pub fn is_empty(&self) -> bool {
        self.max_cost_per_request.is_none()
            && self.max_latency_p95_ms.is_none()
            && self.min_quality_score.is_none()
    }
}

/// Toggles for the optional output sections.
///
/// A disabled section is not computed at all, not merely hidden.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisOptions {
    pub include_pareto_frontier: bool,
    pub include_diminishing_returns: bool,
    pub include_recommendations: bool,
    pub normalize_metrics: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_pareto_frontier: true,
            include_diminishing_returns: true,
            include_recommendations: true,
            normalize_metrics: true,
        }
    }
}
