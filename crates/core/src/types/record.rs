//! Per-request performance records.
//!
//! A [`PerformanceRecord`] is the immutable input unit of an analysis:
//! one LLM request with its cost, latency, and (optionally) quality
//! measurements. Records are created and schema-validated by the caller;
//! the engine only reads them.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One observed LLM request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// When the request completed.
    pub timestamp: DateTime<Utc>,
    /// Provider name (e.g. "openai", "anthropic").
    pub provider: String,
    /// Model name (e.g. "gpt-4o-mini").
    pub model: String,
    /// Pricing/capability tier, if the caller classifies models into tiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Cost measurements for this request.
    pub cost: CostMetrics,
    /// Latency measurements for this request.
    pub latency: LatencyMetrics,
    /// Quality measurements, when an evaluator scored the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityMetrics>,
    /// Identifiers tying the request to a wider execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<GroupingContext>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

/// Cost measurements in USD.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CostMetrics {
    /// Cost of this request.
    pub cost_per_request_usd: f64,
    /// Effective cost per 1k tokens.
    pub cost_per_1k_tokens_usd: f64,
    /// Total accumulated cost for the billing unit this record belongs to.
    pub total_cost_usd: f64,
    /// Tokens consumed (prompt + completion).
    pub token_count: u64,
}

/// Latency measurements in milliseconds.
///
/// Percentile fields carry the caller's rolling percentiles at record time;
/// for a single isolated request they all equal the observed latency.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LatencyMetrics {
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Quality measurements.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QualityMetrics {
    /// Composite quality score in `[0, 1]`.
    pub composite_score: f64,
    /// Optional named sub-scores (e.g. "accuracy", "coherence").
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub sub_scores: HashMap<String, f64>,
}

/// Identifiers linking a record to the execution that produced it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GroupingContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl LatencyMetrics {
    /// Build latency metrics from a single observed latency.
    pub fn uniform(latency_ms: f64) -> Self {
        Self {
            p50_ms: latency_ms,
            p95_ms: latency_ms,
            p99_ms: latency_ms,
            avg_ms: latency_ms,
            min_ms: latency_ms,
            max_ms: latency_ms,
        }
    }
}

impl QualityMetrics {
    /// Build quality metrics from a composite score alone.
    pub fn composite(score: f64) -> Self {
        Self {
            composite_score: score,
            sub_scores: HashMap::new(),
        }
    }
}
