//! Registration scopes

use crate::types::Snowflake;
use serde::{Deserialize, Serialize};

/// The registration boundary for a command set: visible to every
/// installation, or to a single guild.
///
/// Scopes have fully independent lifecycles — each one is reconciled with
/// its own overwrite call, and one scope's failure never touches another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Registered on the application's global command endpoint
    Global,
    /// Registered on a single guild's command endpoint
    Guild(Snowflake),
}

impl Scope {
    /// Guild id for guild scopes, `None` for global
    pub fn guild_id(&self) -> Option<Snowflake> {
        match self {
            Self::Global => None,
            Self::Guild(id) => Some(*id),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

impl From<Snowflake> for Scope {
    fn from(id: Snowflake) -> Self {
        Self::Guild(id)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "global scope"),
            Self::Guild(id) => write!(f, "guild {}", id),
        }
    }
}
