//! reqwest implementation of the command transport

use crate::config::RestConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use slashsync_core::error::{SyncError, SyncResult};
use slashsync_core::transport::CommandTransport;
use slashsync_core::types::Scope;

/// Bulk-overwrite transport against the platform's registration routes.
///
/// One PUT per scope, global or guild endpoint. No retry or rate-limit
/// handling: a 429 surfaces as a failed submission like any other non-2xx,
/// and the engine leaves the scope's batch staged for a later pass.
pub struct RestTransport {
    config: RestConfig,
    http_client: Client,
}

impl RestTransport {
    /// Create a transport over an existing HTTP client
    pub fn new(config: RestConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Create a transport with its own client, honoring the configured
    /// timeout
    pub fn from_config(config: RestConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::new(config, http_client))
    }

    fn route(&self, scope: Scope) -> String {
        match scope {
            Scope::Global => format!(
                "{}/applications/{}/commands",
                self.config.base_url, self.config.application_id
            ),
            Scope::Guild(guild_id) => format!(
                "{}/applications/{}/guilds/{}/commands",
                self.config.base_url, self.config.application_id, guild_id
            ),
        }
    }
}

#[async_trait]
impl CommandTransport for RestTransport {
    async fn overwrite(&self, scope: Scope, payload: Vec<Value>) -> SyncResult<Vec<Value>> {
        let url = self.route(scope);
        tracing::debug!(%scope, commands = payload.len(), %url, "submitting overwrite");

        let response = self
            .http_client
            .put(&url)
            .header("Authorization", format!("Bot {}", self.config.token))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| SyncError::submission(scope, format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::submission(
                scope,
                format!("status {status}: {body}"),
            ));
        }

        let entries: Vec<Value> = response
            .json()
            .await
            .map_err(|e| SyncError::submission(scope, format!("malformed response: {e}")))?;
        tracing::debug!(%scope, registered = entries.len(), "overwrite acknowledged");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slashsync_core::types::Snowflake;

    fn transport() -> RestTransport {
        let config = RestConfig::new("token", Snowflake(7)).with_base_url("http://localhost:9");
        RestTransport::new(config, Client::new())
    }

    #[test]
    fn global_route_has_no_guild_segment() {
        assert_eq!(
            transport().route(Scope::Global),
            "http://localhost:9/applications/7/commands"
        );
    }

    #[test]
    fn guild_route_is_parameterized_by_guild_id() {
        assert_eq!(
            transport().route(Scope::Guild(Snowflake(42))),
            "http://localhost:9/applications/7/guilds/42/commands"
        );
    }

    #[tokio::test]
    async fn connection_failure_surfaces_as_scope_tagged_submission_error() {
        // Port 9 (discard) is not listening; the request fails fast.
        let error = transport()
            .overwrite(Scope::Global, vec![])
            .await
            .unwrap_err();
        match error {
            SyncError::RemoteSubmissionFailed { scope, .. } => assert_eq!(scope, Scope::Global),
            other => panic!("expected RemoteSubmissionFailed, got {other:?}"),
        }
    }
}
