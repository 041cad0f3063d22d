//! Decision-event contract.
//!
//! Every analysis invocation is summarized by exactly one [`DecisionEvent`],
//! the audit artifact the host system persists to its decision store. The
//! engine constructs the event; persistence is the caller's job.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::Result;
use crate::types::{AnalysisOutput, ConstraintsApplied};

/// Agent identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Agent version following semantic versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AgentVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl AgentVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Version of the running engine, from the crate manifest.
    pub fn current() -> Self {
        let mut parts = env!("CARGO_PKG_VERSION")
            .split('.')
            .map(|p| p.parse().unwrap_or(0));
        Self::new(
            parts.next().unwrap_or(0),
            parts.next().unwrap_or(0),
            parts.next().unwrap_or(0),
        )
    }
}

impl std::fmt::Display for AgentVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Kind of decision recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    /// Cost vs performance tradeoff evaluation.
    CostPerformanceTradeoff,
}

impl std::fmt::Display for DecisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CostPerformanceTradeoff => write!(f, "cost_performance_tradeoff"),
        }
    }
}

/// The single audit record describing one analysis invocation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DecisionEvent {
    /// Unique event identifier.
    pub id: Uuid,
    pub agent_id: AgentId,
    pub agent_version: AgentVersion,
    pub decision_type: DecisionType,
    /// SHA-256 hash of the canonical JSON of the inputs, for audit
    /// reproducibility.
    pub inputs_hash: String,
    /// Aggregate confidence: the top group's overall score.
    pub confidence: f64,
    /// Echo of the constraints evaluated, when any were supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints_applied: Option<ConstraintsApplied>,
    pub timestamp: DateTime<Utc>,
}

impl DecisionEvent {
    /// Build the decision event for a completed analysis.
    pub fn for_analysis(
        agent_id: AgentId,
        inputs_hash: impl Into<String>,
        output: &AnalysisOutput,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id,
            agent_version: AgentVersion::current(),
            decision_type: DecisionType::CostPerformanceTradeoff,
            inputs_hash: inputs_hash.into(),
            confidence: output.top_confidence(),
            constraints_applied: output.constraints_applied.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// SHA-256 hash of a serializable value's canonical JSON, hex-encoded.
pub fn hash_inputs<T: Serialize>(inputs: &T) -> Result<String> {
    let canonical = serde_json::to_vec(inputs)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let digest = hasher.finalize();
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable() {
        let a = hash_inputs(&serde_json::json!({"scope": "model", "n": 3})).unwrap();
        let b = hash_inputs(&serde_json::json!({"scope": "model", "n": 3})).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_differs_on_input_change() {
        let a = hash_inputs(&serde_json::json!({"n": 3})).unwrap();
        let b = hash_inputs(&serde_json::json!({"n": 4})).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn version_display() {
        assert_eq!(AgentVersion::new(1, 2, 3).to_string(), "1.2.3");
    }
}
