//! Contract types for the tradeoff analysis engine.
//!
//! Split into input records, the analysis request surface, and the
//! analysis output. Everything here is serde-serializable; the wire-facing
//! structs also derive a JSON schema for callers that validate upstream.

pub mod analysis;
pub mod record;
pub mod request;

pub use analysis::*;
pub use record::*;
pub use request::*;
