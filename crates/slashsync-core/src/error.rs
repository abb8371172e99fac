//! Error types for slashsync

use crate::types::Scope;
use thiserror::Error;

/// Result type alias for slashsync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Main error type for slashsync
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    /// Malformed raw command or option data. Caller error, surfaced at
    /// construction time and never retried.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A declared parameter type has no known option type mapping
    #[error("Unsupported parameter type `{type_name}` for parameter `{parameter}`")]
    UnsupportedParameterType { parameter: String, type_name: String },

    /// The overwrite submission for one scope failed. Other scopes are
    /// unaffected; the failed scope's definitions stay unregistered.
    #[error("Remote submission failed for {scope}: {message}")]
    RemoteSubmissionFailed { scope: Scope, message: String },

    /// The response list does not line up with the submitted list, so
    /// positional identity assignment cannot be trusted.
    #[error("Identity mismatch for {scope}: submitted {submitted} commands, received {received} usable identities")]
    IdentityMismatch {
        scope: Scope,
        submitted: usize,
        received: usize,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl SyncError {
    /// Create a new invalid-schema error
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema(message.into())
    }

    /// Create a new unsupported-parameter-type error
    pub fn unsupported_parameter(
        parameter: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self::UnsupportedParameterType {
            parameter: parameter.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a new scope-tagged submission error
    pub fn submission(scope: Scope, message: impl Into<String>) -> Self {
        Self::RemoteSubmissionFailed {
            scope,
            message: message.into(),
        }
    }

    /// Scope the error is tagged with, if any
    pub fn scope(&self) -> Option<Scope> {
        match self {
            Self::RemoteSubmissionFailed { scope, .. } | Self::IdentityMismatch { scope, .. } => {
                Some(*scope)
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}
