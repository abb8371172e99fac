//! Reconciliation of staged definitions against the remote registry

pub mod engine;
pub mod report;

pub use engine::Reconciler;
pub use report::{ScopeOutcome, SyncReport};
