//! Command definitions and remote-assigned identity

use crate::error::{SyncError, SyncResult};
use crate::types::option::require_str;
use crate::types::{CommandOption, Scope};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use std::any::Any;
use std::sync::Arc;

/// A remote-assigned identifier.
///
/// The platform serializes these as decimal strings on the wire, but tooling
/// (and fixtures) often uses bare numbers; deserialization accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snowflake(pub u64);

impl Snowflake {
    /// Read a snowflake out of a response field that may be a number or a
    /// decimal string.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self),
            Value::String(s) => s.parse().ok().map(Self),
            _ => None,
        }
    }
}

impl std::fmt::Display for Snowflake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Snowflake {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a u64 or a decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Snowflake, E> {
                Ok(Snowflake(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Snowflake, E> {
                v.parse().map(Snowflake).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

/// Which interaction surface a command appears on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    /// Typed slash command; the only kind that carries options
    ChatInput = 1,
    /// User context-menu command
    User = 2,
    /// Message context-menu command
    Message = 3,
}

impl CommandType {
    pub fn from_wire(value: u64) -> SyncResult<Self> {
        Ok(match value {
            1 => Self::ChatInput,
            2 => Self::User,
            3 => Self::Message,
            other => {
                return Err(SyncError::invalid_schema(format!(
                    "unknown command type tag {other}"
                )));
            }
        })
    }

    pub fn wire(self) -> u8 {
        self as u8
    }
}

/// Opaque behavior reference attached to a definition.
///
/// Owned by the dispatch layer; this core stores it, copies it, and never
/// inspects or calls it.
pub type Handler = Arc<dyn Any + Send + Sync>;

/// The top-level declarative unit: one slash or context-menu command.
///
/// A definition is created locally with no identity fields. After a
/// successful overwrite submission the engine copies the remote-assigned
/// `id`/`application_id`/`version` onto it and the definition is
/// "registered". Equality deliberately excludes identity and the handler:
/// two definitions are the same command if their declared configuration
/// matches, regardless of remote id.
#[derive(Clone)]
pub struct CommandDefinition {
    /// Command name
    pub name: String,
    /// Command description
    pub description: String,
    /// Interaction surface
    pub kind: CommandType,
    /// Registration scope
    pub scope: Scope,
    /// Parameter schema; only meaningful for chat-input commands
    pub options: Option<Vec<CommandOption>>,
    /// Legacy default-invocation permission flag
    pub default_permission: bool,
    /// Member-permission gate, when set
    pub default_member_permissions: Option<bool>,
    /// Whether the command is invocable in DMs, when set
    pub dm_permission: Option<bool>,
    /// Remote-assigned command id
    pub id: Option<Snowflake>,
    /// Remote-assigned owning application id
    pub application_id: Option<Snowflake>,
    /// Remote-assigned version
    pub version: Option<Snowflake>,
    /// Opaque dispatch-layer behavior reference
    pub handler: Option<Handler>,
}

impl CommandDefinition {
    /// Create a new chat-input command definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: CommandType::ChatInput,
            scope: Scope::Global,
            options: None,
            default_permission: true,
            default_member_permissions: None,
            dm_permission: None,
            id: None,
            application_id: None,
            version: None,
            handler: None,
        }
    }

    /// Set the interaction surface
    pub fn with_kind(mut self, kind: CommandType) -> Self {
        self.kind = kind;
        self
    }

    /// Set the registration scope
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Attach the parameter schema
    pub fn with_options(mut self, options: Vec<CommandOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the legacy default-permission flag
    pub fn with_default_permission(mut self, default_permission: bool) -> Self {
        self.default_permission = default_permission;
        self
    }

    /// Set the member-permission gate
    pub fn with_default_member_permissions(mut self, value: bool) -> Self {
        self.default_member_permissions = Some(value);
        self
    }

    /// Set DM invocability
    pub fn with_dm_permission(mut self, value: bool) -> Self {
        self.dm_permission = Some(value);
        self
    }

    /// Attach the opaque behavior reference
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Whether the remote side has assigned identity to this definition
    pub fn is_registered(&self) -> bool {
        self.id.is_some()
    }

    /// Construct from a raw wire mapping.
    ///
    /// Fails with [`SyncError::InvalidSchema`] when `name` or `description`
    /// is missing. A payload that came from the remote side may carry
    /// identity fields and a `guild_id`; both are absorbed.
    pub fn from_payload(value: &Value) -> SyncResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| SyncError::invalid_schema("command payload must be an object"))?;

        let name = require_str(map, "name", "command")?;
        let description = require_str(map, "description", "command")?;

        let kind = match map.get("type") {
            Some(Value::Number(n)) => {
                let raw = n.as_u64().ok_or_else(|| {
                    SyncError::invalid_schema(format!("command type tag {n} is not an integer"))
                })?;
                CommandType::from_wire(raw)?
            }
            Some(other) => {
                return Err(SyncError::invalid_schema(format!(
                    "command type must be an integer tag, got {other}"
                )));
            }
            None => CommandType::ChatInput,
        };

        let options = match map.get("options") {
            Some(Value::Array(raw)) => Some(
                raw.iter()
                    .map(CommandOption::from_value)
                    .collect::<SyncResult<Vec<_>>>()?,
            ),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(SyncError::invalid_schema(format!(
                    "command `{name}` options must be a list, got {other}"
                )));
            }
        };

        let scope = match map.get("guild_id").and_then(Snowflake::from_value) {
            Some(guild_id) => Scope::Guild(guild_id),
            None => Scope::Global,
        };

        Ok(Self {
            name,
            description,
            kind,
            scope,
            options,
            default_permission: map
                .get("default_permission")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            default_member_permissions: map
                .get("default_member_permissions")
                .and_then(Value::as_bool),
            dm_permission: map.get("dm_permission").and_then(Value::as_bool),
            id: map.get("id").and_then(Snowflake::from_value),
            application_id: map.get("application_id").and_then(Snowflake::from_value),
            version: map.get("version").and_then(Snowflake::from_value),
            handler: None,
        })
    }

    /// Serialize to the outbound registration payload.
    ///
    /// Identity fields are write-only from the remote side and never
    /// emitted; scope is routing, carried by the endpoint rather than the
    /// body. Absent optional fields are omitted.
    pub fn to_payload(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), json!(self.name));
        map.insert("description".to_string(), json!(self.description));
        map.insert("type".to_string(), json!(self.kind.wire()));
        map.insert(
            "default_permission".to_string(),
            json!(self.default_permission),
        );
        if let Some(options) = &self.options {
            map.insert(
                "options".to_string(),
                Value::Array(options.iter().map(CommandOption::to_value).collect()),
            );
        }
        if let Some(value) = self.default_member_permissions {
            map.insert("default_member_permissions".to_string(), json!(value));
        }
        if let Some(value) = self.dm_permission {
            map.insert("dm_permission".to_string(), json!(value));
        }
        Value::Object(map)
    }

    /// Check every declared option against the schema placement invariants
    pub fn validate(&self) -> SyncResult<()> {
        for option in self.options.iter().flatten() {
            option.validate()?;
        }
        Ok(())
    }

    /// Duplicate the declared configuration and handler, dropping identity.
    ///
    /// A copy is always unregistered until reconciliation assigns it fresh
    /// identity.
    pub fn fresh_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind,
            scope: self.scope,
            options: self.options.clone(),
            default_permission: self.default_permission,
            default_member_permissions: self.default_member_permissions,
            dm_permission: self.dm_permission,
            id: None,
            application_id: None,
            version: None,
            handler: self.handler.clone(),
        }
    }
}

impl PartialEq for CommandDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.kind == other.kind
            && self.scope == other.scope
            && self.options == other.options
            && self.default_permission == other.default_permission
            && self.default_member_permissions == other.default_member_permissions
            && self.dm_permission == other.dm_permission
    }
}

impl std::fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("kind", &self.kind)
            .field("scope", &self.scope)
            .field("options", &self.options)
            .field("default_permission", &self.default_permission)
            .field("default_member_permissions", &self.default_member_permissions)
            .field("dm_permission", &self.dm_permission)
            .field("id", &self.id)
            .field("application_id", &self.application_id)
            .field("version", &self.version)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish()
    }
}
