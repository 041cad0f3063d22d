//! Injected model catalog.
//!
//! A versioned lookup table of known models and their reference figures,
//! supplied by the caller and passed into the recommendation stage. Keeping
//! the table outside the engine means no ecosystem-specific knowledge
//! (pricing, "alternatives to X") can go stale inside it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference figures for one known model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    /// Model key (e.g. "openai:gpt-4o-mini").
    pub model_id: String,
    /// Reference cost per 1k input tokens in USD.
    pub input_cost_per_1k: f64,
    /// Reference cost per 1k output tokens in USD.
    pub output_cost_per_1k: f64,
    /// Relative quality score in `[0, 1]`.
    pub quality_score: f64,
}

impl CatalogEntry {
    /// Create a new entry.
    pub fn new(model_id: impl Into<String>, input: f64, output: f64) -> Self {
        Self {
            model_id: model_id.into(),
            input_cost_per_1k: input,
            output_cost_per_1k: output,
            quality_score: 0.5,
        }
    }

    /// Set the reference quality score.
    pub fn with_quality(mut self, score: f64) -> Self {
        self.quality_score = score.clamp(0.0, 1.0);
        self
    }

    /// Combined reference cost per 1k tokens.
    pub fn combined_cost_per_1k(&self) -> f64 {
        self.input_cost_per_1k + self.output_cost_per_1k
    }
}

/// Versioned registry of model reference data.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModelCatalog {
    /// Catalog version string, so decision records can name the table used.
    pub version: String,
    entries: HashMap<String, CatalogEntry>,
}

impl ModelCatalog {
    /// Create an empty catalog with a version tag.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            entries: HashMap::new(),
        }
    }

    /// Register a model's reference data.
    pub fn register(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.model_id.clone(), entry);
    }

    /// Get reference data for a model.
    pub fn get(&self, model_id: &str) -> Option<&CatalogEntry> {
        self.entries.get(model_id)
    }

    /// All entries sorted by combined reference cost, cheapest first.
    pub fn sorted_by_cost(&self) -> Vec<&CatalogEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| a.combined_cost_per_1k().total_cmp(&b.combined_cost_per_1k()));
        entries
    }

    /// Cheapest model meeting a minimum reference quality.
    pub fn cheapest_with_quality(&self, min_quality: f64) -> Option<&CatalogEntry> {
        self.sorted_by_cost()
            .into_iter()
            .find(|m| m.quality_score >= min_quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> ModelCatalog {
        let mut catalog = ModelCatalog::new("2026-08");
        catalog.register(CatalogEntry::new("openai:gpt-4o-mini", 0.15, 0.60).with_quality(0.7));
        catalog.register(CatalogEntry::new("openai:gpt-4o", 5.0, 15.0).with_quality(0.9));
        catalog.register(
            CatalogEntry::new("anthropic:claude-3-haiku", 0.25, 1.25).with_quality(0.7),
        );
        catalog
    }

    #[test]
    fn sorted_by_cost_cheapest_first() {
        let catalog = sample_catalog();
        let sorted = catalog.sorted_by_cost();
        assert_eq!(sorted[0].model_id, "openai:gpt-4o-mini");
    }

    #[test]
    fn cheapest_with_quality() {
        let catalog = sample_catalog();
        let pick = catalog.cheapest_with_quality(0.8).unwrap();
        assert_eq!(pick.model_id, "openai:gpt-4o");
    }

    #[test]
    fn quality_clamped() {
        let entry = CatalogEntry::new("m", 1.0, 1.0).with_quality(1.7);
        assert!((entry.quality_score - 1.0).abs() < 1e-12);
    }
}
