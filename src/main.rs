#![deny(unused)]
//! Costwise CLI glue.
//!
//! Thin I/O wrapper around the tradeoff analysis engine: read one JSON
//! analysis request from a file (or stdin), run the engine, print the
//! analysis output and its decision event as JSON. Persistence of the
//! decision event is left to the surrounding system.

use std::io::Read;

use costwise_core::{AnalysisRequest, EngineConfig};
use costwise_engine::TradeoffAnalyzer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn configure_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,costwise=debug".into()),
    );
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn read_request() -> anyhow::Result<AnalysisRequest> {
    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

fn main() -> anyhow::Result<()> {
    configure_tracing();

    let config = EngineConfig::load()?;
    let request = read_request()?;

    tracing::info!(
        records = request.records.len(),
        scope = %request.scope,
        "Running tradeoff analysis"
    );

    let analyzer = TradeoffAnalyzer::new(config);
    let output = analyzer.analyze_request(&request)?;
    let event = analyzer.decision_event(&request, &output)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
