//! End-to-end tests of the tradeoff analysis engine through its public
//! surface.

use chrono::Utc;
use costwise_core::{
    AnalysisConstraints, AnalysisOptions, AnalysisRequest, AnalysisScope, CostMetrics,
    EngineConfig, Error, LatencyMetrics, PerformanceRecord, QualityMetrics, RecommendationKind,
    Weights,
};
use costwise_engine::TradeoffAnalyzer;
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

// Scenario A: two incomparable groups are both Pareto-optimal and the
// weighted scores follow the normalization formulas exactly.
#[test]
fn scenario_two_incomparable_groups() {
    let records = vec![
        record("g1", 0.01, 500.0, Some(0.9)),
        record("g2", 0.05, 300.0, Some(0.95)),
    ];
    let weights = Weights {
        cost: 0.33,
        latency: 0.33,
        quality: 0.34,
    };

    let output = analyzer()
        .analyze(&records, AnalysisScope::Model, Some(weights), None, None)
        .unwrap();

    let frontier = output.pareto_frontier.unwrap();
    assert!(frontier.iter().all(|p| p.is_optimal));

    // G1 normalizes to (1, 0, 0.9), G2 to (0, 1, 0.95).
    let g1 = output.groups.iter().find(|g| g.group.id == "g1").unwrap();
    let g2 = output.groups.iter().find(|g| g.group.id == "g2").unwrap();
    assert!((g1.score.overall_score - (0.33 + 0.34 * 0.9)).abs() < 1e-9);
    assert!((g2.score.overall_score - (0.33 + 0.34 * 0.95)).abs() < 1e-9);
    assert!(g2.score.overall_score > g1.score.overall_score);
    assert_eq!(output.summary.best_overall, "g2");
}

// Scenario B: marginal quality collapse at the most expensive group.
#[test]
fn scenario_diminishing_returns_detected() {
    let records = vec![
        record("cheap", 1.0, 400.0, Some(0.5)),
        record("mid", 5.0, 400.0, Some(0.7)),
        record("premium", 20.0, 400.0, Some(0.72)),
    ];

    let output = analyzer()
        .analyze(&records, AnalysisScope::Model, None, None, None)
        .unwrap();

    let dr = output.diminishing_returns.unwrap();
    assert!(dr.detected);
    assert!((dr.threshold_cost_usd.unwrap() - 20.0).abs() < 1e-9);
    assert!(dr.marginal_quality_gain.unwrap() < 0.05 * 0.2);

    let recs = output.recommendations.unwrap();
    let cost_rec = recs
        .iter()
        .find(|r| r.kind == RecommendationKind::CostOptimization)
        .unwrap();
    assert_eq!(cost_rec.target_model, "mid");
}

// Scenario C: a violated constraint surfaces as data plus a
// constraint_violation recommendation at confidence 1.0.
#[test]
fn scenario_constraint_violation() {
    let records = vec![
        record("fine", 0.01, 300.0, Some(0.9)),
        record("expensive", 0.05, 300.0, Some(0.95)),
    ];
    let constraints = AnalysisConstraints {
        max_cost_per_request: Some(0.02),
        ..Default::default()
    };

    let output = analyzer()
        .analyze(
            &records,
            AnalysisScope::Model,
            None,
            Some(constraints),
            None,
        )
        .unwrap();

    let applied = output.constraints_applied.as_ref().unwrap();
    assert!(!applied.satisfied);
    assert!((applied.max_cost_per_request.as_ref().unwrap().limit - 0.02).abs() < 1e-12);

    let recs = output.recommendations.unwrap();
    let violation = recs
        .iter()
        .find(|r| r.kind == RecommendationKind::ConstraintViolation)
        .unwrap();
    assert!((violation.confidence - 1.0).abs() < 1e-12);
    assert_eq!(violation.target_model, "expensive");
}

// Scenario D: an empty batch fails, no output.
#[test]
fn scenario_empty_batch() {
    let err = analyzer()
        .analyze(&[], AnalysisScope::Model, None, None, None)
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientData(_)));
}

#[test]
fn group_count_equals_distinct_scope_values() {
    let records = vec![
        record("a", 0.01, 300.0, None),
        record("b", 0.02, 300.0, None),
        record("a", 0.03, 300.0, None),
        record("c", 0.04, 300.0, None),
        record("b", 0.05, 300.0, None),
    ];
    let output = analyzer()
        .analyze(&records, AnalysisScope::Model, None, None, None)
        .unwrap();
    assert_eq!(output.summary.group_count, 3);
    assert_eq!(output.groups.len(), 3);
}

#[test]
fn weighted_score_invariant() {
    let records = vec![
        record("a", 0.01, 500.0, Some(0.7)),
        record("b", 0.03, 400.0, Some(0.85)),
        record("c", 0.08, 250.0, Some(0.9)),
    ];
    let weights = Weights {
        cost: 0.5,
        latency: 0.2,
        quality: 0.3,
    };

    let output = analyzer()
        .analyze(&records, AnalysisScope::Model, Some(weights), None, None)
        .unwrap();

    for g in &output.groups {
        let expected = weights.cost * g.score.cost_score
            + weights.latency * g.score.latency_score
            + weights.quality * g.score.quality_score;
        assert!((g.score.overall_score - expected).abs() < 1e-9);
    }
}

#[test]
fn pareto_invariant_holds() {
    let records = vec![
        record("a", 0.01, 500.0, Some(0.7)),
        record("b", 0.03, 400.0, Some(0.85)),
        record("c", 0.05, 450.0, Some(0.8)),
        record("d", 0.08, 250.0, Some(0.9)),
    ];
    let output = analyzer()
        .analyze(&records, AnalysisScope::Model, None, None, None)
        .unwrap();
    let points = output.pareto_frontier.unwrap();

    let dominates = |a: &costwise_core::ParetoPoint, b: &costwise_core::ParetoPoint| {
        a.cost_usd <= b.cost_usd
            && a.latency_ms <= b.latency_ms
            && a.quality >= b.quality
            && (a.cost_usd < b.cost_usd || a.latency_ms < b.latency_ms || a.quality > b.quality)
    };

    for p in points.iter().filter(|p| !p.is_optimal) {
        assert!(points.iter().any(|other| other.id != p.id && dominates(other, p)));
    }
    for p in points.iter().filter(|p| p.is_optimal) {
        assert!(!points.iter().any(|other| other.id != p.id && dominates(other, p)));
    }
}

#[test]
fn analysis_is_idempotent() {
    let request = AnalysisRequest {
        records: vec![
            record("a", 0.01, 500.0, Some(0.7)),
            record("b", 0.03, 400.0, Some(0.85)),
            record("c", 0.08, 250.0, Some(0.9)),
        ],
        scope: AnalysisScope::Model,
        weights: Weights::default(),
        constraints: Some(AnalysisConstraints {
            max_latency_p95_ms: Some(600.0),
            ..Default::default()
        }),
        options: AnalysisOptions::default(),
    };

    let engine = analyzer();
    let first = engine.analyze_request(&request).unwrap();
    let second = engine.analyze_request(&request).unwrap();

    let mut a = serde_json::to_value(&first).unwrap();
    let mut b = serde_json::to_value(&second).unwrap();
    // The duration field is the one permitted difference between runs.
    a["metadata"]["analysis_duration_ms"] = 0.into();
    b["metadata"]["analysis_duration_ms"] = 0.into();
    assert_eq!(a, b);
}

#[test]
fn uniform_cost_normalizes_to_one() {
    let records = vec![
        record("a", 0.02, 500.0, Some(0.7)),
        record("b", 0.02, 300.0, Some(0.9)),
        record("c", 0.02, 400.0, Some(0.8)),
    ];
    let output = analyzer()
        .analyze(&records, AnalysisScope::Model, None, None, None)
        .unwrap();
    for g in &output.groups {
        assert!((g.score.cost_score - 1.0).abs() < 1e-12);
    }
}

#[test]
fn provider_scope_groups_by_provider() {
    let mut anthropic = record("claude", 0.02, 350.0, Some(0.9));
    anthropic.provider = "anthropic".into();
    let records = vec![
        record("gpt-4o", 0.03, 300.0, Some(0.9)),
        record("gpt-4o-mini", 0.01, 400.0, Some(0.8)),
        anthropic,
    ];

    let output = analyzer()
        .analyze(&records, AnalysisScope::Provider, None, None, None)
        .unwrap();
    assert_eq!(output.groups.len(), 2);
    assert!(output.groups.iter().any(|g| g.group.id == "openai"));
    assert!(output.groups.iter().any(|g| g.group.id == "anthropic"));
}

#[test]
fn request_round_trips_through_json() {
    let request = AnalysisRequest {
        records: vec![record("a", 0.01, 500.0, Some(0.7))],
        scope: AnalysisScope::Model,
        weights: Weights::default(),
        constraints: None,
        options: AnalysisOptions::default(),
    };

    let raw = serde_json::to_string(&request).unwrap();
    let parsed: AnalysisRequest = serde_json::from_str(&raw).unwrap();
    let output = analyzer().analyze_request(&parsed).unwrap();
    assert_eq!(output.summary.group_count, 1);
}
