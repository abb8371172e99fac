//! Registration reconciliation engine
//!
//! For each scope the engine replaces the remote platform's entire command
//! set with exactly the staged definitions, in one atomic overwrite call,
//! then writes the remote-assigned identity back onto the local
//! definitions. Remote registration is the source of truth for ids,
//! versions, and application linkage; local state is a cache rebuilt every
//! pass.

use crate::error::{SyncError, SyncResult};
use crate::registry::{PendingRegistry, RegisteredIndex};
use crate::reconcile::report::{ScopeOutcome, SyncReport};
use crate::transport::CommandTransport;
use crate::types::{CommandDefinition, Scope, Snowflake};
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;

/// Default bound on concurrently in-flight scope submissions
const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Drives per-scope overwrite submissions and identity write-back.
///
/// Scopes are reconciled independently: one scope's failure never prevents
/// or corrupts another's. On failure the drained batch is restored to the
/// pending registry, so re-invoking reconciliation for that scope retries
/// the identical set; the definitions stay unregistered (no identity
/// fields) until a submission succeeds.
pub struct Reconciler {
    transport: Arc<dyn CommandTransport>,
    pending: Arc<PendingRegistry>,
    registered: Arc<RegisteredIndex>,
    max_in_flight: usize,
}

impl Reconciler {
    /// Create an engine with fresh registries
    pub fn new(transport: Arc<dyn CommandTransport>) -> Self {
        Self {
            transport,
            pending: Arc::new(PendingRegistry::new()),
            registered: Arc::new(RegisteredIndex::new()),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Use an existing staging registry (shared with declaration sites)
    pub fn with_pending(mut self, pending: Arc<PendingRegistry>) -> Self {
        self.pending = pending;
        self
    }

    /// Use an existing registered index (shared with the dispatch layer)
    pub fn with_registered(mut self, registered: Arc<RegisteredIndex>) -> Self {
        self.registered = registered;
        self
    }

    /// Bound the number of simultaneously in-flight scope submissions
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// The staging registry declaration sites should stage into
    pub fn pending(&self) -> &Arc<PendingRegistry> {
        &self.pending
    }

    /// The read-only lookup index for interaction dispatch
    pub fn registered(&self) -> &Arc<RegisteredIndex> {
        &self.registered
    }

    /// Reconcile one scope.
    ///
    /// An empty staged list skips the submission entirely — an empty
    /// overwrite would delete every remote command in the scope, which only
    /// [`clear_scope`](Self::clear_scope) may do.
    pub async fn sync_scope(&self, scope: Scope) -> SyncResult<ScopeOutcome> {
        let staged = self.pending.drain(scope);
        if staged.is_empty() {
            tracing::debug!(%scope, "nothing staged, skipping submission");
            return Ok(ScopeOutcome::Skipped);
        }

        match self.submit(scope, &staged).await {
            Ok(count) => {
                tracing::info!(%scope, count, "command set synchronized");
                Ok(ScopeOutcome::Synced { count })
            }
            Err(error) => {
                tracing::warn!(%scope, %error, "submission failed, restoring staged set");
                self.pending.restore(scope, staged);
                Err(error)
            }
        }
    }

    /// Explicitly delete every remote command in a scope.
    ///
    /// Never triggered implicitly; staged definitions for the scope are
    /// left in place.
    pub async fn clear_scope(&self, scope: Scope) -> SyncResult<ScopeOutcome> {
        self.transport
            .overwrite(scope, Vec::new())
            .await
            .map_err(|e| tag_scope(scope, e))?;
        self.registered.remove(scope);
        tracing::info!(%scope, "remote command set cleared");
        Ok(ScopeOutcome::Cleared)
    }

    /// Reconcile every scope that currently has staged definitions.
    ///
    /// Scopes run concurrently, bounded by `max_in_flight`; failures are
    /// collected per scope, never propagated across scopes.
    pub async fn sync_all(&self) -> SyncReport {
        let scopes = self.pending.scopes();
        let results = futures::stream::iter(scopes)
            .map(|scope| async move { (scope, self.sync_scope(scope).await) })
            .buffer_unordered(self.max_in_flight)
            .collect::<Vec<_>>()
            .await;
        SyncReport::new(results)
    }

    async fn submit(&self, scope: Scope, staged: &[CommandDefinition]) -> SyncResult<usize> {
        for definition in staged {
            definition.validate()?;
        }
        // Declaration order; no remote meaning, but stable for diffs/logs.
        let payload: Vec<Value> = staged.iter().map(CommandDefinition::to_payload).collect();

        let responses = self
            .transport
            .overwrite(scope, payload)
            .await
            .map_err(|e| tag_scope(scope, e))?;

        if responses.len() != staged.len() {
            return Err(SyncError::IdentityMismatch {
                scope,
                submitted: staged.len(),
                received: responses.len(),
            });
        }

        // Parse every identity before mutating anything, so a malformed
        // entry leaves the whole batch unregistered.
        let identities: Vec<_> = responses.iter().map(parse_identity).collect();
        let usable = identities.iter().flatten().count();
        if usable != staged.len() {
            return Err(SyncError::IdentityMismatch {
                scope,
                submitted: staged.len(),
                received: usable,
            });
        }

        let published: Vec<Arc<CommandDefinition>> = staged
            .iter()
            .zip(identities.into_iter().flatten())
            .map(|(definition, (id, application_id, version))| {
                let mut registered = definition.clone();
                registered.id = Some(id);
                registered.application_id = application_id;
                registered.version = version;
                Arc::new(registered)
            })
            .collect();

        self.registered.publish(scope, published);
        Ok(staged.len())
    }
}

/// Pull the identity triple out of one response entry. A missing or
/// unparsable `id` makes the entry unusable, and positional assignment
/// cannot be trusted.
fn parse_identity(response: &Value) -> Option<(Snowflake, Option<Snowflake>, Option<Snowflake>)> {
    let id = response.get("id").and_then(Snowflake::from_value)?;
    let application_id = response.get("application_id").and_then(Snowflake::from_value);
    let version = response.get("version").and_then(Snowflake::from_value);
    Some((id, application_id, version))
}

fn tag_scope(scope: Scope, error: SyncError) -> SyncError {
    match error {
        e @ (SyncError::RemoteSubmissionFailed { .. } | SyncError::IdentityMismatch { .. }) => e,
        other => SyncError::submission(scope, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes each payload back with sequential identities, counting calls
    struct EchoTransport {
        calls: AtomicUsize,
    }

    impl EchoTransport {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CommandTransport for EchoTransport {
        async fn overwrite(&self, _scope: Scope, payload: Vec<Value>) -> SyncResult<Vec<Value>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(payload
                .into_iter()
                .enumerate()
                .map(|(i, mut entry)| {
                    entry["id"] = json!(42 + i as u64);
                    entry["application_id"] = json!(7);
                    entry["version"] = json!(1);
                    entry
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn empty_scope_performs_no_submission() {
        let transport = Arc::new(EchoTransport::new());
        let engine = Reconciler::new(transport.clone());

        let outcome = engine.sync_scope(Scope::Global).await.unwrap();
        assert_eq!(outcome, ScopeOutcome::Skipped);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn identity_is_assigned_by_position() {
        let engine = Reconciler::new(Arc::new(EchoTransport::new()));
        engine
            .pending()
            .stage(CommandDefinition::new("ping", "Measure latency"));

        let outcome = engine.sync_scope(Scope::Global).await.unwrap();
        assert_eq!(outcome, ScopeOutcome::Synced { count: 1 });

        let registered = engine
            .registered()
            .find(Scope::Global, Snowflake(42))
            .unwrap();
        assert_eq!(registered.name, "ping");
        assert_eq!(registered.id, Some(Snowflake(42)));
        assert_eq!(registered.application_id, Some(Snowflake(7)));
        assert_eq!(registered.version, Some(Snowflake(1)));
        assert!(registered.options.is_none());
    }

    struct ShortTransport;

    #[async_trait]
    impl CommandTransport for ShortTransport {
        async fn overwrite(&self, _scope: Scope, _payload: Vec<Value>) -> SyncResult<Vec<Value>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn short_response_is_an_identity_mismatch_and_restores() {
        let engine = Reconciler::new(Arc::new(ShortTransport));
        engine
            .pending()
            .stage(CommandDefinition::new("ping", "Measure latency"));

        let error = engine.sync_scope(Scope::Global).await.unwrap_err();
        assert!(matches!(error, SyncError::IdentityMismatch { .. }));
        // Batch restored for a retry pass; nothing published.
        assert_eq!(engine.pending().staged_count(Scope::Global), 1);
        assert!(engine.registered().is_empty(Scope::Global));
    }

    struct NoIdTransport;

    #[async_trait]
    impl CommandTransport for NoIdTransport {
        async fn overwrite(&self, _scope: Scope, payload: Vec<Value>) -> SyncResult<Vec<Value>> {
            Ok(payload)
        }
    }

    #[tokio::test]
    async fn response_entry_without_id_leaves_batch_unregistered() {
        let engine = Reconciler::new(Arc::new(NoIdTransport));
        engine
            .pending()
            .stage(CommandDefinition::new("ping", "Measure latency"));

        let error = engine.sync_scope(Scope::Global).await.unwrap_err();
        assert!(matches!(error, SyncError::IdentityMismatch { .. }));
        assert_eq!(engine.pending().staged_count(Scope::Global), 1);
    }

    #[tokio::test]
    async fn clear_scope_submits_empty_and_drops_the_index() {
        let transport = Arc::new(EchoTransport::new());
        let engine = Reconciler::new(transport.clone());
        engine
            .pending()
            .stage(CommandDefinition::new("ping", "Measure latency"));
        engine.sync_scope(Scope::Global).await.unwrap();
        assert_eq!(engine.registered().len(Scope::Global), 1);

        let outcome = engine.clear_scope(Scope::Global).await.unwrap();
        assert_eq!(outcome, ScopeOutcome::Cleared);
        assert!(engine.registered().is_empty(Scope::Global));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalid_option_tree_fails_before_submission() {
        use crate::types::{Choice, CommandOption};

        let transport = Arc::new(EchoTransport::new());
        let engine = Reconciler::new(transport.clone());
        engine.pending().stage(
            CommandDefinition::new("bad", "Broken schema").with_options(vec![
                CommandOption::string("flavor", "Pick one")
                    .with_autocomplete()
                    .with_choices(vec![Choice::new("vanilla", "vanilla")]),
            ]),
        );

        let error = engine.sync_scope(Scope::Global).await.unwrap_err();
        assert!(matches!(error, SyncError::InvalidSchema(_)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }
}
