//! Lookup index of successfully registered commands

use crate::types::{CommandDefinition, Scope, Snowflake};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Scope-indexed map of registered definitions, keyed by remote-assigned id.
///
/// Written only by the reconciliation engine after a successful submission,
/// as a whole-scope replace: the new map is built off to the side and
/// swapped in under the write lock, so concurrent readers observe either
/// the pre-update or fully-post-update state, never a partially updated
/// scope. Read by interaction dispatch when an invocation arrives.
#[derive(Default)]
pub struct RegisteredIndex {
    scopes: RwLock<HashMap<Scope, HashMap<Snowflake, Arc<CommandDefinition>>>>,
}

impl RegisteredIndex {
    /// Create a new, empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a scope's entire entry with the given registered definitions.
    ///
    /// Definitions without an assigned id are skipped; the engine only
    /// publishes after identity assignment, so in practice every entry
    /// carries one.
    pub fn publish(&self, scope: Scope, definitions: Vec<Arc<CommandDefinition>>) {
        let entry: HashMap<_, _> = definitions
            .into_iter()
            .filter_map(|def| def.id.map(|id| (id, def)))
            .collect();
        self.scopes.write().insert(scope, entry);
    }

    /// Drop a scope's entry entirely (after an explicit clear)
    pub fn remove(&self, scope: Scope) {
        self.scopes.write().remove(&scope);
    }

    /// Look up a registered command by scope and remote-assigned id
    pub fn find(&self, scope: Scope, id: Snowflake) -> Option<Arc<CommandDefinition>> {
        self.scopes.read().get(&scope)?.get(&id).cloned()
    }

    /// All registered commands for a scope
    pub fn commands(&self, scope: Scope) -> Vec<Arc<CommandDefinition>> {
        self.scopes
            .read()
            .get(&scope)
            .map(|entry| entry.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of registered commands for a scope
    pub fn len(&self, scope: Scope) -> usize {
        self.scopes.read().get(&scope).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self, scope: Scope) -> bool {
        self.len(scope) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(name: &str, id: u64) -> Arc<CommandDefinition> {
        let mut def = CommandDefinition::new(name, "test command");
        def.id = Some(Snowflake(id));
        Arc::new(def)
    }

    #[test]
    fn publish_replaces_the_whole_scope() {
        let index = RegisteredIndex::new();
        index.publish(Scope::Global, vec![registered("old", 1)]);
        index.publish(Scope::Global, vec![registered("ping", 42), registered("ban", 43)]);

        assert_eq!(index.len(Scope::Global), 2);
        assert!(index.find(Scope::Global, Snowflake(1)).is_none());
        assert_eq!(index.find(Scope::Global, Snowflake(42)).unwrap().name, "ping");
    }

    #[test]
    fn scopes_are_independent() {
        let index = RegisteredIndex::new();
        let guild = Scope::Guild(Snowflake(9));
        index.publish(Scope::Global, vec![registered("ping", 42)]);

        assert!(index.is_empty(guild));
        assert!(index.find(guild, Snowflake(42)).is_none());
        index.remove(Scope::Global);
        assert!(index.is_empty(Scope::Global));
    }

    #[test]
    fn unidentified_definitions_are_not_indexed() {
        let index = RegisteredIndex::new();
        index.publish(
            Scope::Global,
            vec![Arc::new(CommandDefinition::new("ghost", "never registered"))],
        );
        assert!(index.is_empty(Scope::Global));
    }
}
