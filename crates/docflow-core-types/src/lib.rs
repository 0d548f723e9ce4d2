//! Core types shared across docflow crates
//!
//! - `CorrelationId`: the per-call id carried by execution contexts
//! - `schema`: canonical log field keys, operation names and event names

pub mod correlation;
pub mod schema;

pub use correlation::CorrelationId;
