//! Per-scope reconciliation outcomes

use crate::error::{SyncError, SyncResult};
use crate::types::Scope;

/// What happened to one scope during a reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOutcome {
    /// Nothing was staged; no submission was made
    Skipped,
    /// The scope's remote set was overwritten and identities assigned
    Synced { count: usize },
    /// The scope's remote set was explicitly emptied
    Cleared,
}

/// Result of a multi-scope reconciliation pass.
///
/// Scopes are the unit of atomicity and isolation: each entry succeeded or
/// failed on its own, so an operator can rerun reconciliation for only the
/// failed scopes.
#[derive(Debug)]
pub struct SyncReport {
    results: Vec<(Scope, SyncResult<ScopeOutcome>)>,
}

impl SyncReport {
    pub(crate) fn new(results: Vec<(Scope, SyncResult<ScopeOutcome>)>) -> Self {
        Self { results }
    }

    /// Per-scope results, in completion order
    pub fn results(&self) -> &[(Scope, SyncResult<ScopeOutcome>)] {
        &self.results
    }

    /// Whether every attempted scope succeeded
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|(_, r)| r.is_ok())
    }

    /// Scopes whose submission failed, with the failure
    pub fn failures(&self) -> impl Iterator<Item = (Scope, &SyncError)> {
        self.results
            .iter()
            .filter_map(|(scope, r)| r.as_ref().err().map(|e| (*scope, e)))
    }

    /// Scopes whose submission failed
    pub fn failed_scopes(&self) -> Vec<Scope> {
        self.failures().map(|(scope, _)| scope).collect()
    }

    /// Total number of commands that received identity in this pass
    pub fn synced_count(&self) -> usize {
        self.results
            .iter()
            .filter_map(|(_, r)| match r {
                Ok(ScopeOutcome::Synced { count }) => Some(count),
                _ => None,
            })
            .sum()
    }
}
