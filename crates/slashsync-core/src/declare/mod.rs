//! Declaration boundary: building and staging command definitions
//!
//! This is the inbound contract for inference adapters: given parameter
//! names and declared types, produce an option list and a staged
//! [`CommandDefinition`]. The mapping from a type to an option kind either
//! comes from the [`ArgumentKind`] trait (checked at compile time) or from
//! a type name resolved at declaration time, which fails with
//! [`SyncError::UnsupportedParameterType`] rather than silently dropping
//! the parameter.

use crate::error::{SyncError, SyncResult};
use crate::registry::PendingRegistry;
use crate::types::{CommandDefinition, CommandOption, CommandType, Handler, OptionType, Scope};

/// Placeholder used when a command or parameter is declared without a
/// description; the remote API rejects empty ones.
pub const DEFAULT_DESCRIPTION: &str = "No description yet";

/// Marker for a user-mention parameter
pub struct UserRef;
/// Marker for a channel parameter
pub struct ChannelRef;
/// Marker for a role parameter
pub struct RoleRef;
/// Marker for a user-or-role parameter
pub struct MentionableRef;

/// Maps a Rust parameter type to its option kind
pub trait ArgumentKind {
    fn kind() -> OptionType;
}

impl ArgumentKind for String {
    fn kind() -> OptionType {
        OptionType::String
    }
}

impl ArgumentKind for &str {
    fn kind() -> OptionType {
        OptionType::String
    }
}

impl ArgumentKind for i64 {
    fn kind() -> OptionType {
        OptionType::Integer
    }
}

impl ArgumentKind for bool {
    fn kind() -> OptionType {
        OptionType::Boolean
    }
}

impl ArgumentKind for f64 {
    fn kind() -> OptionType {
        OptionType::Number
    }
}

impl ArgumentKind for UserRef {
    fn kind() -> OptionType {
        OptionType::User
    }
}

impl ArgumentKind for ChannelRef {
    fn kind() -> OptionType {
        OptionType::Channel
    }
}

impl ArgumentKind for RoleRef {
    fn kind() -> OptionType {
        OptionType::Role
    }
}

impl ArgumentKind for MentionableRef {
    fn kind() -> OptionType {
        OptionType::Mentionable
    }
}

/// Resolve a declared type name to an option kind.
///
/// The dynamic path for adapters that only see type names (reflection,
/// config files, foreign annotations). Unknown names fail with
/// [`SyncError::UnsupportedParameterType`].
pub fn resolve_type(parameter: &str, type_name: &str) -> SyncResult<OptionType> {
    Ok(match type_name {
        "String" | "str" | "string" => OptionType::String,
        "i64" | "i32" | "u32" | "int" | "integer" => OptionType::Integer,
        "bool" | "boolean" => OptionType::Boolean,
        "f64" | "f32" | "float" | "number" => OptionType::Number,
        "User" | "user" => OptionType::User,
        "Channel" | "channel" => OptionType::Channel,
        "Role" | "role" => OptionType::Role,
        "Mentionable" | "mentionable" => OptionType::Mentionable,
        _ => return Err(SyncError::unsupported_parameter(parameter, type_name)),
    })
}

/// One declared parameter, before it becomes a [`CommandOption`]
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub description: Option<String>,
    pub kind: OptionType,
    pub required: bool,
}

impl ParamSpec {
    /// Typed constructor; the mapping is checked at compile time
    pub fn of<T: ArgumentKind>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind: T::kind(),
            required: false,
        }
    }

    /// Dynamic constructor from a declared type name
    pub fn named(name: impl Into<String>, type_name: &str) -> SyncResult<Self> {
        let name = name.into();
        let kind = resolve_type(&name, type_name)?;
        Ok(Self {
            name,
            description: None,
            kind,
            required: false,
        })
    }

    /// Set the parameter description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the parameter as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn into_option(self) -> CommandOption {
        let mut option = CommandOption::new(
            self.kind,
            self.name,
            self.description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        );
        option.required = self.required;
        option
    }
}

/// Builder that assembles a chat-input definition and stages it.
///
/// ```
/// use slashsync_core::declare::{ParamSpec, SlashCommand};
/// use slashsync_core::registry::PendingRegistry;
///
/// let registry = PendingRegistry::new();
/// let command = SlashCommand::new("greet")
///     .describe("Say hello")
///     .param(ParamSpec::of::<String>("who").describe("Who to greet").required())
///     .stage(&registry);
/// assert_eq!(command.name, "greet");
/// assert_eq!(registry.staged_count(command.scope), 1);
/// ```
pub struct SlashCommand {
    name: String,
    description: Option<String>,
    scope: Scope,
    params: Vec<ParamSpec>,
    handler: Option<Handler>,
}

impl SlashCommand {
    /// Start declaring a chat-input command
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            scope: Scope::Global,
            params: Vec::new(),
            handler: None,
        }
    }

    /// Set the command description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Register under a specific scope instead of globally
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Append one parameter, in declaration order
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Append several parameters, in declaration order
    pub fn params(mut self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
        self.params.extend(params);
        self
    }

    /// Attach the opaque behavior reference for the dispatch layer
    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Build the definition without staging it
    pub fn build(self) -> CommandDefinition {
        let mut definition = CommandDefinition::new(
            self.name,
            self.description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        )
        .with_scope(self.scope);
        if !self.params.is_empty() {
            definition = definition.with_options(
                self.params.into_iter().map(ParamSpec::into_option).collect(),
            );
        }
        if let Some(handler) = self.handler {
            definition = definition.with_handler(handler);
        }
        definition
    }

    /// Build the definition, stage it, and return it
    pub fn stage(self, registry: &PendingRegistry) -> CommandDefinition {
        let definition = self.build();
        registry.stage(definition.clone());
        definition
    }
}

/// Declare a user context-menu command (no options; description must be
/// empty on the wire for context commands)
pub fn user_command(name: impl Into<String>) -> CommandDefinition {
    CommandDefinition::new(name, "").with_kind(CommandType::User)
}

/// Declare a message context-menu command
pub fn message_command(name: impl Into<String>) -> CommandDefinition {
    CommandDefinition::new(name, "").with_kind(CommandType::Message)
}
