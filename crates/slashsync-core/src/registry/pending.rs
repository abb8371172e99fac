//! Staging area for declared-but-unsubmitted command definitions

use crate::types::{CommandDefinition, Scope};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Process-wide staging area, keyed by registration scope.
///
/// Declaration sites stage definitions here during startup; the
/// reconciliation engine drains one scope at a time when it runs. This is
/// the only mutable shared state in the core: an owned instance held by the
/// composition root, not a hidden global. Staging performs no
/// deduplication — collapsing or rejecting structurally identical entries
/// is the engine's concern.
#[derive(Default)]
pub struct PendingRegistry {
    staged: Mutex<HashMap<Scope, Vec<CommandDefinition>>>,
}

impl PendingRegistry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a definition under its scope, creating the scope's list on
    /// first use. Safe to call concurrently from independent declaration
    /// sites.
    pub fn stage(&self, definition: CommandDefinition) {
        let mut staged = self.staged.lock();
        staged.entry(definition.scope).or_default().push(definition);
    }

    /// Atomically remove and return everything staged for a scope, in
    /// staging order. A second immediate drain returns an empty list.
    pub fn drain(&self, scope: Scope) -> Vec<CommandDefinition> {
        self.staged.lock().remove(&scope).unwrap_or_default()
    }

    /// Put a drained batch back at the front of the scope's list, ahead of
    /// anything staged since. Used after a failed submission so a retry
    /// pass sees the same set in the same order.
    pub fn restore(&self, scope: Scope, definitions: Vec<CommandDefinition>) {
        if definitions.is_empty() {
            return;
        }
        let mut staged = self.staged.lock();
        let entry = staged.entry(scope).or_default();
        let newer = std::mem::replace(entry, definitions);
        entry.extend(newer);
    }

    /// Snapshot of the scopes that currently have staged definitions
    pub fn scopes(&self) -> Vec<Scope> {
        self.staged.lock().keys().copied().collect()
    }

    /// Number of definitions staged for a scope
    pub fn staged_count(&self, scope: Scope) -> usize {
        self.staged.lock().get(&scope).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Snowflake;

    fn def(name: &str, scope: Scope) -> CommandDefinition {
        CommandDefinition::new(name, "test command").with_scope(scope)
    }

    #[test]
    fn drain_returns_staging_order_then_empty() {
        let registry = PendingRegistry::new();
        registry.stage(def("alpha", Scope::Global));
        registry.stage(def("beta", Scope::Global));
        registry.stage(def("gamma", Scope::Guild(Snowflake(1))));

        let drained = registry.drain(Scope::Global);
        assert_eq!(
            drained.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            vec!["alpha", "beta"]
        );
        assert!(registry.drain(Scope::Global).is_empty());
        assert_eq!(registry.staged_count(Scope::Guild(Snowflake(1))), 1);
    }

    #[test]
    fn duplicate_stages_are_preserved() {
        let registry = PendingRegistry::new();
        registry.stage(def("ping", Scope::Global));
        registry.stage(def("ping", Scope::Global));
        assert_eq!(registry.drain(Scope::Global).len(), 2);
    }

    #[test]
    fn restore_puts_the_batch_ahead_of_newer_stages() {
        let registry = PendingRegistry::new();
        registry.stage(def("alpha", Scope::Global));
        let drained = registry.drain(Scope::Global);
        registry.stage(def("beta", Scope::Global));
        registry.restore(Scope::Global, drained);

        let order: Vec<_> = registry
            .drain(Scope::Global)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(order, vec!["alpha", "beta"]);
    }

    #[test]
    fn concurrent_staging_loses_nothing() {
        let registry = std::sync::Arc::new(PendingRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        registry.stage(def(&format!("cmd-{i}-{j}"), Scope::Global));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.drain(Scope::Global).len(), 400);
    }
}
