#![deny(unused)]
//! Cost-performance tradeoff analysis engine for Costwise.
//!
//! Turns a finite batch of per-request performance records into comparative
//! scores, a Pareto efficiency frontier, diminishing-returns diagnostics,
//! and ranked recommendations. Every stage is a pure function over the
//! batch: no I/O, no shared state, one deterministic result per invocation.
//!
//! Pipeline: aggregate → normalize → score → {frontier, diminishing
//! returns, constraints} → recommend → assemble.

pub mod aggregator;
pub mod analyzer;
pub mod constraints;
pub mod diminishing;
pub mod frontier;
pub mod normalizer;
pub mod recommend;
pub mod scorer;

pub use analyzer::TradeoffAnalyzer;
