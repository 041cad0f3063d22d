//! Engine configuration.
//!
//! Loaded once at startup and injected into the analyzer. The policy block
//! holds the tunable heuristics the engine deliberately does not hardcode:
//! the diminishing-returns drop fraction and the neutral quality prior are
//! policy choices, not contract behavior.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub policy: PolicyConfig,
    pub agent: AgentConfig,
}

/// Tunable analysis policy.
#[derive(Debug, Deserialize, Clone)]
pub struct PolicyConfig {
    /// Fraction of the first marginal quality-per-cost ratio below which a
    /// later step counts as diminished (heuristic, not a significance test).
    pub diminishing_drop_fraction: f64,
    /// Minimum number of quality-bearing groups required before the
    /// diminishing-returns walk runs at all.
    pub min_quality_groups: usize,
    /// Quality score assumed when no group in the batch reports quality.
    pub neutral_quality_score: f64,
}

/// Identity stamped onto decision events.
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    pub agent_id: String,
}

impl EngineConfig {
    /// Load configuration from files and environment.
    ///
    /// Layering: `config/default`, then `config/<COSTWISE_ENV>`, then
    /// `config/local`, then `COSTWISE__*` environment overrides
    /// (e.g. `COSTWISE__POLICY__DIMINISHING_DROP_FRACTION=0.15`).
    pub fn load() -> Result<Self> {
        let env = std::env::var("COSTWISE_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("policy.diminishing_drop_fraction", 0.2)?
            .set_default("policy.min_quality_groups", 3)?
            .set_default("policy.neutral_quality_score", 0.5)?
            .set_default("agent.agent_id", "costwise.tradeoff-analyzer")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("COSTWISE").separator("__"))
            .build()?;

        Ok(s.try_deserialize()?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            agent: AgentConfig {
                agent_id: "costwise.tradeoff-analyzer".into(),
            },
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            diminishing_drop_fraction: 0.2,
            min_quality_groups: 3,
            neutral_quality_score: 0.5,
        }
    }
}
