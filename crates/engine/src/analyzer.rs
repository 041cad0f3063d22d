//! The tradeoff analyzer facade.
//!
//! Owns the engine configuration and wires the stages into one synchronous,
//! pure `analyze` call: validation, aggregation, normalization, scoring,
//! then the option-gated frontier/diminishing-returns/constraints/
//! recommendation stages and final assembly. Disabled sections are skipped
//! entirely, not computed and hidden.

use std::time::Instant;

use costwise_core::{
    AgentId, AnalysisConstraints, AnalysisMetadata, AnalysisOptions, AnalysisOutput,
    AnalysisRequest, AnalysisScope, AnalysisSummary, DecisionEvent, EngineConfig, Error,
    ModelCatalog, PerformanceRecord, Result, ScoredGroup, Weights,
};

use crate::{aggregator, constraints, diminishing, frontier, normalizer, recommend, scorer};

/// Cost-performance tradeoff analysis engine.
///
/// Holds no state between invocations; a fixed input always produces the
/// same output (modulo the duration metadata field), so hosts may run
/// analyzers concurrently without coordination.
pub struct TradeoffAnalyzer {
    config: EngineConfig,
    catalog: Option<ModelCatalog>,
}

impl TradeoffAnalyzer {
    /// Create an analyzer with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            catalog: None,
        }
    }

    /// Inject a versioned model catalog for recommendation enrichment.
    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Run one analysis over a finite batch of records.
    ///
    /// Fails with `InsufficientData` on an empty batch and `InvalidInput`
    /// on malformed weights or records missing the scope key; per-section
    /// data insufficiency degrades to an omitted section instead.
    pub fn analyze(
        &self,
        records: &[PerformanceRecord],
        scope: AnalysisScope,
        weights: Option<Weights>,
        constraints: Option<AnalysisConstraints>,
        options: Option<AnalysisOptions>,
    ) -> Result<AnalysisOutput> {
        let started = Instant::now();
        let weights = weights.unwrap_or_default();
        let options = options.unwrap_or_default();

        if records.is_empty() {
            return Err(Error::insufficient_data("record batch is empty"));
        }
        weights.validate()?;

        tracing::debug!(
            records = records.len(),
            scope = %scope,
            "Starting tradeoff analysis"
        );

        let groups = aggregator::aggregate(records, scope)?;

        // With normalization disabled, cost and latency carry no
        // discriminating score (all 1.0) and quality passes through raw;
        // the weighted score then reflects quality alone.
        let triples = if options.normalize_metrics {
            normalizer::normalize(&groups, self.config.policy.neutral_quality_score)
        } else {
            let quality_default = normalizer::quality_fallback(
                &groups,
                self.config.policy.neutral_quality_score,
            );
            groups
                .iter()
                .map(|g| normalizer::NormalizedTriple {
                    cost_score: 1.0,
                    latency_score: 1.0,
                    quality_score: g.avg_quality.unwrap_or(quality_default),
                })
                .collect()
        };

        let constraints_applied = constraints
            .filter(|c| !c.is_empty())
            .map(|c| constraints::evaluate(&groups, &c));

        // The recommender consumes the frontier and the diminishing-returns
        // outcome even when their output sections are disabled, so compute
        // them whenever either consumer needs them.
        let need_pareto = options.include_pareto_frontier || options.include_recommendations;
        let need_diminishing =
            options.include_diminishing_returns || options.include_recommendations;

        let pareto = need_pareto.then(|| frontier::build(&groups));
        let diminishing_outcome =
            need_diminishing.then(|| diminishing::detect(&groups, &self.config.policy));

        let ranked = scorer::score_all(groups, &triples, &weights);
        verify_finite(&ranked)?;

        let recommendations = options.include_recommendations.then(|| {
            recommend::generate(&recommend::RecommendationInputs {
                ranked: &ranked,
                pareto: pareto.as_deref().unwrap_or(&[]),
                diminishing: diminishing_outcome.as_ref(),
                constraints: constraints_applied.as_ref(),
                catalog: self.catalog.as_ref(),
            })
        });

        let summary = build_summary(records.len() as u64, &ranked);
        let output = AnalysisOutput {
            pareto_frontier: if options.include_pareto_frontier {
                pareto
            } else {
                None
            },
            diminishing_returns: if options.include_diminishing_returns {
                diminishing_outcome.map(|o| o.analysis)
            } else {
                None
            },
            recommendations,
            summary,
            constraints_applied,
            groups: ranked,
            metadata: AnalysisMetadata {
                scope,
                weights_used: weights,
                analysis_duration_ms: started.elapsed().as_millis() as u64,
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        tracing::debug!(
            groups = output.groups.len(),
            duration_ms = output.metadata.analysis_duration_ms,
            "Tradeoff analysis complete"
        );
        Ok(output)
    }

    /// Convenience wrapper over [`Self::analyze`] for a full request body.
    pub fn analyze_request(&self, request: &AnalysisRequest) -> Result<AnalysisOutput> {
        self.analyze(
            &request.records,
            request.scope,
            Some(request.weights),
            request.constraints,
            Some(request.options),
        )
    }

    /// Build the single audit record describing a completed analysis.
    ///
    /// The inputs hash covers the canonical JSON of the full request, so a
    /// persisted event can be tied back to the exact batch it scored.
    /// Persisting the event is the caller's responsibility.
    pub fn decision_event(
        &self,
        request: &AnalysisRequest,
        output: &AnalysisOutput,
    ) -> Result<DecisionEvent> {
        let inputs_hash = costwise_core::hash_inputs(request)?;
        Ok(DecisionEvent::for_analysis(
            AgentId::new(self.config.agent.agent_id.clone()),
            inputs_hash,
            output,
        ))
    }
}

/// Guard the scoring invariants: every derived value must be finite.
fn verify_finite(ranked: &[ScoredGroup]) -> Result<()> {
    for g in ranked {
        let values = [
            g.score.overall_score,
            g.score.cost_score,
            g.score.latency_score,
            g.score.quality_score,
            g.score.efficiency_ratio,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::analysis_failed(format!(
                "non-finite score for group '{}'",
                g.group.id
            )));
        }
    }
    Ok(())
}

fn build_summary(record_count: u64, ranked: &[ScoredGroup]) -> AnalysisSummary {
    let lowest_by = |f: fn(&ScoredGroup) -> f64| -> String {
        ranked
            .iter()
            .min_by(|a, b| f(a).total_cmp(&f(b)).then_with(|| a.group.id.cmp(&b.group.id)))
            .map(|g| g.group.id.clone())
            .unwrap_or_default()
    };

    AnalysisSummary {
        record_count,
        group_count: ranked.len() as u64,
        best_by_cost: lowest_by(|g| g.group.avg_cost_per_request_usd),
        best_by_latency: lowest_by(|g| g.group.avg_latency_p95_ms),
        best_by_quality: ranked
            .iter()
            .filter(|g| g.group.avg_quality.is_some())
            .max_by(|a, b| {
                a.group
                    .avg_quality
                    .unwrap_or(0.0)
                    .total_cmp(&b.group.avg_quality.unwrap_or(0.0))
                    .then_with(|| b.group.id.cmp(&a.group.id))
            })
            .map(|g| g.group.id.clone()),
        best_overall: ranked
            .first()
            .map(|g| g.group.id.clone())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use costwise_core::{CostMetrics, LatencyMetrics, QualityMetrics};
    use uuid::Uuid;

    fn record(model: &str, cost: f64, p95: f64, quality: Option<f64>) -> PerformanceRecord {
        PerformanceRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            provider: "openai".into(),
            model: model.into(),
            tier: None,
            cost: CostMetrics {
                cost_per_request_usd: cost,
                cost_per_1k_tokens_usd: cost * 2.0,
                total_cost_usd: cost,
                token_count: 500,
            },
            latency: LatencyMetrics::uniform(p95),
            quality: quality.map(QualityMetrics::composite),
            context: None,
            tags: Vec::new(),
            metadata: serde_json::Value::Null,
        }
    }

    fn analyzer() -> TradeoffAnalyzer {
        TradeoffAnalyzer::new(EngineConfig::default())
    }

    #[test]
    fn empty_batch_is_insufficient_data() {
        let err = analyzer()
            .analyze(&[], AnalysisScope::Model, None, None, None)
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn invalid_weights_fail_at_the_boundary() {
        let records = vec![record("m", 0.01, 300.0, Some(0.9))];
        let weights = Weights {
            cost: 0.9,
            latency: 0.9,
            quality: 0.9,
        };
        let err = analyzer()
            .analyze(&records, AnalysisScope::Model, Some(weights), None, None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn disabled_sections_are_omitted() {
        let records = vec![
            record("a", 0.01, 500.0, Some(0.9)),
            record("b", 0.05, 300.0, Some(0.95)),
        ];
        let options = AnalysisOptions {
            include_pareto_frontier: false,
            include_diminishing_returns: false,
            include_recommendations: false,
            normalize_metrics: true,
        };

        let output = analyzer()
            .analyze(&records, AnalysisScope::Model, None, None, Some(options))
            .unwrap();
        assert!(output.pareto_frontier.is_none());
        assert!(output.diminishing_returns.is_none());
        assert!(output.recommendations.is_none());
        assert_eq!(output.groups.len(), 2);
    }

    #[test]
    fn recommendations_work_without_the_frontier_section() {
        let records = vec![
            record("a", 0.01, 500.0, Some(0.9)),
            record("b", 0.05, 300.0, Some(0.95)),
        ];
        let options = AnalysisOptions {
            include_pareto_frontier: false,
            include_diminishing_returns: false,
            include_recommendations: true,
            normalize_metrics: true,
        };

        let output = analyzer()
            .analyze(&records, AnalysisScope::Model, None, None, Some(options))
            .unwrap();
        assert!(output.pareto_frontier.is_none());
        assert!(!output.recommendations.unwrap().is_empty());
    }

    #[test]
    fn summary_names_the_best_groups() {
        let records = vec![
            record("cheap", 0.01, 500.0, Some(0.8)),
            record("fast", 0.05, 200.0, Some(0.95)),
        ];
        let output = analyzer()
            .analyze(&records, AnalysisScope::Model, None, None, None)
            .unwrap();

        assert_eq!(output.summary.record_count, 2);
        assert_eq!(output.summary.group_count, 2);
        assert_eq!(output.summary.best_by_cost, "cheap");
        assert_eq!(output.summary.best_by_latency, "fast");
        assert_eq!(output.summary.best_by_quality.as_deref(), Some("fast"));
    }

    #[test]
    fn raw_scoring_uses_batch_minimum_quality_fallback() {
        let records = vec![
            record("scored", 0.01, 100.0, Some(0.6)),
            record("unscored", 0.02, 100.0, None),
        ];
        let options = AnalysisOptions {
            include_pareto_frontier: true,
            include_diminishing_returns: true,
            include_recommendations: true,
            normalize_metrics: false,
        };

        let output = analyzer()
            .analyze(&records, AnalysisScope::Model, None, None, Some(options))
            .unwrap();
        let unscored = output
            .groups
            .iter()
            .find(|g| g.group.id == "unscored")
            .unwrap();
        // Same fallback policy as the normalizing path: batch minimum, not
        // the neutral prior.
        assert!((unscored.score.quality_score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn smaller_drop_fraction_suppresses_detection() {
        // Marginal ratios 0.05 then ~0.00133; the second sits below 20% of
        // the first but above 2% of it.
        let records = vec![
            record("cheap", 1.0, 200.0, Some(0.5)),
            record("mid", 5.0, 200.0, Some(0.7)),
            record("premium", 20.0, 200.0, Some(0.72)),
        ];

        let output = analyzer()
            .analyze(&records, AnalysisScope::Model, None, None, None)
            .unwrap();
        assert!(output.diminishing_returns.unwrap().detected);

        let mut config = EngineConfig::default();
        config.policy.diminishing_drop_fraction = 0.02;
        let output = TradeoffAnalyzer::new(config)
            .analyze(&records, AnalysisScope::Model, None, None, None)
            .unwrap();
        assert!(!output.diminishing_returns.unwrap().detected);
    }

    #[test]
    fn neutral_quality_prior_is_configurable() {
        let records = vec![
            record("a", 0.01, 100.0, None),
            record("b", 0.02, 200.0, None),
        ];
        let mut config = EngineConfig::default();
        config.policy.neutral_quality_score = 0.8;

        let output = TradeoffAnalyzer::new(config)
            .analyze(&records, AnalysisScope::Model, None, None, None)
            .unwrap();
        assert!(output
            .groups
            .iter()
            .all(|g| (g.score.quality_score - 0.8).abs() < 1e-12));
    }

    #[test]
    fn decision_event_reflects_the_output() {
        let request = AnalysisRequest {
            records: vec![
                record("a", 0.01, 500.0, Some(0.9)),
                record("b", 0.05, 300.0, Some(0.95)),
            ],
            scope: AnalysisScope::Model,
            weights: Weights::default(),
            constraints: None,
            options: AnalysisOptions::default(),
        };
        let engine = analyzer();
        let output = engine.analyze_request(&request).unwrap();
        let event = engine.decision_event(&request, &output).unwrap();

        assert_eq!(event.agent_id.to_string(), "costwise.tradeoff-analyzer");
        assert_eq!(event.inputs_hash.len(), 64);
        assert!((event.confidence - output.top_confidence()).abs() < 1e-12);
        assert!(event.constraints_applied.is_none());
    }
}
