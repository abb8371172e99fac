//! Transport boundary to the remote command registry

use crate::error::SyncResult;
use crate::types::Scope;
use async_trait::async_trait;
use serde_json::Value;

/// Submits a full command set to the remote platform.
///
/// One call per scope, one semantics: atomic full replace. The remote side
/// computes creates/updates/deletes by diffing against its own prior state
/// and responds with the ordered list of registered command
/// representations, each carrying assigned identity. Submission order is
/// preserved in the response.
///
/// Implementations own authentication and may take arbitrarily long (the
/// engine tolerates slow or failing calls); retry and rate-limit policy
/// lives behind this trait, never in the engine. A successful-but-empty
/// response is `Ok(vec![])`, distinct from any error.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Replace the scope's entire remote command set with `payload`
    async fn overwrite(&self, scope: Scope, payload: Vec<Value>) -> SyncResult<Vec<Value>>;
}
