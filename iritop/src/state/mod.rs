//! Per-peer state carried between polls and frames.
//!
//! Everything here is owned by a single `Dashboard`; nothing is shared across
//! threads.

mod baseline;
mod history;
mod liveness;
mod tracker;

pub use baseline::BaselineStore;
pub use history::{CounterHistory, CounterKey};
pub use liveness::{LivenessClassifier, DEFAULT_INCOMMUNICADO_THRESHOLD};
pub use tracker::{DisplayTracker, FieldId, FieldValue};
