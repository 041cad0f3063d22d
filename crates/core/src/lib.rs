#![deny(unused)]
//! Core types, contracts, and error definitions for Costwise.
//!
//! This crate provides the foundational building blocks shared by the
//! tradeoff analysis engine and its callers: the input/output contracts,
//! the configuration layer, the decision-event schema, and the injected
//! model catalog.

pub mod catalog;
pub mod config;
pub mod contracts;
pub mod error;
pub mod types;

pub use catalog::{CatalogEntry, ModelCatalog};
pub use config::{EngineConfig, PolicyConfig};
pub use contracts::{hash_inputs, AgentId, AgentVersion, DecisionEvent, DecisionType};
pub use error::{Error, Result};
pub use types::*;
