//! Command option and choice schema types
//!
//! An option describes one parameter or sub-command slot of a chat-input
//! command. Options form an owned tree: a `SUB_COMMAND_GROUP` owns
//! `SUB_COMMAND` options, which own the leaf parameter options. Structural
//! equality over that tree is the basis for diffing against remote state,
//! so every field participates in `PartialEq`.

use crate::error::{SyncError, SyncResult};
use serde_json::{Map, Value, json};

/// Wire type tag for a command option.
///
/// The numeric values are the remote API's contract and must never be
/// renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OptionType {
    SubCommand = 1,
    SubCommandGroup = 2,
    String = 3,
    Integer = 4,
    Boolean = 5,
    User = 6,
    Channel = 7,
    Role = 8,
    Mentionable = 9,
    Number = 10,
}

impl OptionType {
    /// Convert a raw wire integer into a type tag
    pub fn from_wire(value: u64) -> SyncResult<Self> {
        Ok(match value {
            1 => Self::SubCommand,
            2 => Self::SubCommandGroup,
            3 => Self::String,
            4 => Self::Integer,
            5 => Self::Boolean,
            6 => Self::User,
            7 => Self::Channel,
            8 => Self::Role,
            9 => Self::Mentionable,
            10 => Self::Number,
            other => {
                return Err(SyncError::invalid_schema(format!(
                    "unknown option type tag {other}"
                )));
            }
        })
    }

    /// Wire integer value
    pub fn wire(self) -> u8 {
        self as u8
    }

    /// Whether this tag may carry a `choices` list
    pub fn supports_choices(self) -> bool {
        matches!(self, Self::String | Self::Integer | Self::Number)
    }

    /// Whether this tag may carry nested options
    pub fn supports_nesting(self) -> bool {
        matches!(self, Self::SubCommand | Self::SubCommandGroup)
    }
}

/// Channel kind filter values for `CHANNEL` options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelType {
    GuildText = 0,
    Dm = 1,
    GuildVoice = 2,
    GroupDm = 3,
    GuildCategory = 4,
    GuildAnnouncement = 5,
    AnnouncementThread = 10,
    PublicThread = 11,
    PrivateThread = 12,
    GuildStageVoice = 13,
    GuildDirectory = 14,
    GuildForum = 15,
}

impl ChannelType {
    pub fn from_wire(value: u64) -> SyncResult<Self> {
        Ok(match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            3 => Self::GroupDm,
            4 => Self::GuildCategory,
            5 => Self::GuildAnnouncement,
            10 => Self::AnnouncementThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            13 => Self::GuildStageVoice,
            14 => Self::GuildDirectory,
            15 => Self::GuildForum,
            other => {
                return Err(SyncError::invalid_schema(format!(
                    "unknown channel type tag {other}"
                )));
            }
        })
    }

    pub fn wire(self) -> u8 {
        self as u8
    }
}

/// Value of an enumerated choice: the remote API accepts strings, integers,
/// and floats here.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceValue {
    String(String),
    Int(i64),
    Number(f64),
}

impl ChoiceValue {
    fn from_value(value: &Value) -> SyncResult<Self> {
        match value {
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Number(f))
                } else {
                    Err(SyncError::invalid_schema(format!(
                        "choice value {n} is out of range"
                    )))
                }
            }
            other => Err(SyncError::invalid_schema(format!(
                "choice value must be a string or number, got {other}"
            ))),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::String(s) => json!(s),
            Self::Int(i) => json!(i),
            Self::Number(f) => json!(f),
        }
    }
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ChoiceValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One entry of an option's enumerated choice set
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// Display name shown to the user
    pub name: String,
    /// Value delivered on invocation
    pub value: ChoiceValue,
}

impl Choice {
    /// Create a new choice
    pub fn new(name: impl Into<String>, value: impl Into<ChoiceValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Construct from a raw wire mapping
    pub fn from_value(value: &Value) -> SyncResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| SyncError::invalid_schema("choice payload must be an object"))?;
        let name = require_str(map, "name", "choice")?;
        let raw = map
            .get("value")
            .ok_or_else(|| SyncError::invalid_schema(format!("choice `{name}` is missing a value")))?;
        Ok(Self {
            name,
            value: ChoiceValue::from_value(raw)?,
        })
    }

    /// Serialize to the wire mapping form
    pub fn to_value(&self) -> Value {
        json!({ "name": self.name, "value": self.value.to_value() })
    }
}

/// One parameter or sub-command slot within a command's schema.
///
/// Immutable after construction by convention: built with the constructors
/// and `with_*` methods below, or from a raw payload via [`from_value`],
/// then handed to the registry as-is.
///
/// [`from_value`]: CommandOption::from_value
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    /// Wire type tag
    pub kind: OptionType,
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether the user must supply this parameter
    pub required: bool,
    /// Enumerated value set; only meaningful for string/integer/number options
    pub choices: Option<Vec<Choice>>,
    /// Nested options; only meaningful for sub-commands and groups
    pub options: Option<Vec<CommandOption>>,
    /// Channel kind filter; only meaningful for channel options
    pub channel_types: Option<Vec<ChannelType>>,
    /// Lower numeric bound
    pub min_value: Option<f64>,
    /// Upper numeric bound
    pub max_value: Option<f64>,
    /// Whether the option offers autocomplete suggestions
    pub autocomplete: bool,
}

impl CommandOption {
    /// Create a new option of the given kind
    pub fn new(kind: OptionType, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            choices: None,
            options: None,
            channel_types: None,
            min_value: None,
            max_value: None,
            autocomplete: false,
        }
    }

    /// Create a string parameter
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::String, name, description)
    }

    /// Create an integer parameter
    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::Integer, name, description)
    }

    /// Create a boolean parameter
    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::Boolean, name, description)
    }

    /// Create a float parameter
    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::Number, name, description)
    }

    /// Create a sub-command slot
    pub fn sub_command(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::SubCommand, name, description)
    }

    /// Create a sub-command group
    pub fn sub_command_group(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::SubCommandGroup, name, description)
    }

    /// Mark the parameter as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Constrain the parameter to an enumerated choice set
    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Attach nested options (sub-commands and groups only)
    pub fn with_options(mut self, options: Vec<CommandOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Restrict a channel parameter to the given channel kinds
    pub fn with_channel_types(mut self, channel_types: Vec<ChannelType>) -> Self {
        self.channel_types = Some(channel_types);
        self
    }

    /// Set the lower numeric bound
    pub fn with_min_value(mut self, min_value: f64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    /// Set the upper numeric bound
    pub fn with_max_value(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    /// Enable autocomplete suggestions
    pub fn with_autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }

    /// Construct an option tree from a raw wire mapping.
    ///
    /// Integer type tags are coerced into [`OptionType`]; nested `choices`
    /// and `options` are constructed recursively. Fails with
    /// [`SyncError::InvalidSchema`] on unknown tags, missing required
    /// fields, or an option that declares both choices and autocomplete.
    pub fn from_value(value: &Value) -> SyncResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| SyncError::invalid_schema("option payload must be an object"))?;

        let kind = match map.get("type") {
            Some(Value::Number(n)) => {
                let raw = n.as_u64().ok_or_else(|| {
                    SyncError::invalid_schema(format!("option type tag {n} is not an integer"))
                })?;
                OptionType::from_wire(raw)?
            }
            Some(other) => {
                return Err(SyncError::invalid_schema(format!(
                    "option type must be an integer tag, got {other}"
                )));
            }
            None => return Err(SyncError::invalid_schema("option payload is missing a type")),
        };

        let name = require_str(map, "name", "option")?;
        let description = require_str(map, "description", "option")?;

        let choices = match map.get("choices") {
            Some(Value::Array(raw)) => Some(
                raw.iter()
                    .map(Choice::from_value)
                    .collect::<SyncResult<Vec<_>>>()?,
            ),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(SyncError::invalid_schema(format!(
                    "option `{name}` choices must be a list, got {other}"
                )));
            }
        };

        let options = match map.get("options") {
            Some(Value::Array(raw)) => Some(
                raw.iter()
                    .map(Self::from_value)
                    .collect::<SyncResult<Vec<_>>>()?,
            ),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(SyncError::invalid_schema(format!(
                    "option `{name}` options must be a list, got {other}"
                )));
            }
        };

        let channel_types = match map.get("channel_types") {
            Some(Value::Array(raw)) => Some(
                raw.iter()
                    .map(|v| {
                        v.as_u64()
                            .ok_or_else(|| {
                                SyncError::invalid_schema(format!(
                                    "channel type tag {v} is not an integer"
                                ))
                            })
                            .and_then(ChannelType::from_wire)
                    })
                    .collect::<SyncResult<Vec<_>>>()?,
            ),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(SyncError::invalid_schema(format!(
                    "option `{name}` channel_types must be a list, got {other}"
                )));
            }
        };

        let option = Self {
            kind,
            name,
            description,
            required: map.get("required").and_then(Value::as_bool).unwrap_or(false),
            choices,
            options,
            channel_types,
            min_value: map.get("min_value").and_then(Value::as_f64),
            max_value: map.get("max_value").and_then(Value::as_f64),
            autocomplete: map
                .get("autocomplete")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        };
        option.validate()?;
        Ok(option)
    }

    /// Check the option tree's placement invariants.
    ///
    /// Choices and autocomplete are mutually exclusive; choices belong on
    /// string/integer/number options; nested options belong on sub-commands
    /// and groups. Recurses into nested options.
    pub fn validate(&self) -> SyncResult<()> {
        if self.choices.is_some() && self.autocomplete {
            return Err(SyncError::invalid_schema(format!(
                "option `{}` declares both choices and autocomplete",
                self.name
            )));
        }
        if self.choices.is_some() && !self.kind.supports_choices() {
            return Err(SyncError::invalid_schema(format!(
                "option `{}` of type {:?} cannot carry choices",
                self.name, self.kind
            )));
        }
        if self.options.is_some() && !self.kind.supports_nesting() {
            return Err(SyncError::invalid_schema(format!(
                "option `{}` of type {:?} cannot carry nested options",
                self.name, self.kind
            )));
        }
        for nested in self.options.iter().flatten() {
            nested.validate()?;
        }
        Ok(())
    }

    /// Serialize to the wire mapping form.
    ///
    /// Absent optional fields are omitted, not emitted as null; enum fields
    /// are lowered to their wire integers; nested lists serialize
    /// recursively.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), json!(self.kind.wire()));
        map.insert("name".to_string(), json!(self.name));
        map.insert("description".to_string(), json!(self.description));
        map.insert("required".to_string(), json!(self.required));
        map.insert("autocomplete".to_string(), json!(self.autocomplete));

        if let Some(choices) = &self.choices {
            map.insert(
                "choices".to_string(),
                Value::Array(choices.iter().map(Choice::to_value).collect()),
            );
        }
        if let Some(options) = &self.options {
            map.insert(
                "options".to_string(),
                Value::Array(options.iter().map(Self::to_value).collect()),
            );
        }
        if let Some(channel_types) = &self.channel_types {
            map.insert(
                "channel_types".to_string(),
                Value::Array(channel_types.iter().map(|ct| json!(ct.wire())).collect()),
            );
        }
        if let Some(min_value) = self.min_value {
            map.insert("min_value".to_string(), json!(min_value));
        }
        if let Some(max_value) = self.max_value {
            map.insert("max_value".to_string(), json!(max_value));
        }

        Value::Object(map)
    }
}

pub(crate) fn require_str(
    map: &Map<String, Value>,
    key: &str,
    context: &str,
) -> SyncResult<String> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(SyncError::invalid_schema(format!(
            "{context} field `{key}` must be a string, got {other}"
        ))),
        None => Err(SyncError::invalid_schema(format!(
            "{context} payload is missing `{key}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags_are_stable() {
        assert_eq!(OptionType::SubCommand.wire(), 1);
        assert_eq!(OptionType::Mentionable.wire(), 9);
        assert_eq!(OptionType::Number.wire(), 10);
        assert_eq!(ChannelType::GuildForum.wire(), 15);
    }

    #[test]
    fn raw_integer_tag_equals_typed_construction() {
        let from_raw = CommandOption::from_value(&json!({
            "type": 4,
            "name": "count",
            "description": "How many",
        }))
        .unwrap();
        let typed = CommandOption::integer("count", "How many");
        assert_eq!(from_raw, typed);
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let err = CommandOption::from_value(&json!({
            "type": 99,
            "name": "bad",
            "description": "nope",
        }))
        .unwrap_err();
        assert!(matches!(err, SyncError::InvalidSchema(_)));
    }

    #[test]
    fn missing_description_is_rejected() {
        let err = CommandOption::from_value(&json!({ "type": 3, "name": "who" })).unwrap_err();
        assert!(matches!(err, SyncError::InvalidSchema(_)));
    }

    #[test]
    fn choices_and_autocomplete_are_mutually_exclusive() {
        let err = CommandOption::from_value(&json!({
            "type": 3,
            "name": "flavor",
            "description": "Pick one",
            "autocomplete": true,
            "choices": [{ "name": "vanilla", "value": "vanilla" }],
        }))
        .unwrap_err();
        assert!(matches!(err, SyncError::InvalidSchema(_)));

        let built = CommandOption::string("flavor", "Pick one")
            .with_autocomplete()
            .with_choices(vec![Choice::new("vanilla", "vanilla")]);
        assert!(built.validate().is_err());
    }

    #[test]
    fn choices_only_on_enumerable_types() {
        let bad = CommandOption::boolean("flag", "On or off")
            .with_choices(vec![Choice::new("yes", 1i64)]);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn nested_options_only_on_sub_commands() {
        let bad = CommandOption::string("who", "A user")
            .with_options(vec![CommandOption::string("inner", "Nope")]);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn absent_fields_are_omitted_from_the_payload() {
        let payload = CommandOption::string("who", "Target user").to_value();
        let map = payload.as_object().unwrap();
        assert!(!map.contains_key("choices"));
        assert!(!map.contains_key("options"));
        assert!(!map.contains_key("channel_types"));
        assert!(!map.contains_key("min_value"));
        assert_eq!(map["type"], json!(3));
        assert_eq!(map["required"], json!(false));
    }

    #[test]
    fn round_trip_with_all_fields_present() {
        let original = CommandOption::sub_command_group("admin", "Admin commands").with_options(
            vec![CommandOption::sub_command("ban", "Ban a user").with_options(vec![
                CommandOption::new(OptionType::User, "target", "Who to ban").required(),
                CommandOption::integer("days", "Days of messages to purge")
                    .with_min_value(0.0)
                    .with_max_value(7.0)
                    .with_choices(vec![Choice::new("none", 0i64), Choice::new("week", 7i64)]),
                CommandOption::new(OptionType::Channel, "log", "Audit channel")
                    .with_channel_types(vec![ChannelType::GuildText]),
            ])],
        );
        let rebuilt = CommandOption::from_value(&original.to_value()).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn round_trip_with_no_optional_fields() {
        let original = CommandOption::string("echo", "Text to echo").required();
        let rebuilt = CommandOption::from_value(&original.to_value()).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn choice_values_accept_all_three_shapes() {
        let string = Choice::from_value(&json!({ "name": "a", "value": "x" })).unwrap();
        let int = Choice::from_value(&json!({ "name": "b", "value": 3 })).unwrap();
        let float = Choice::from_value(&json!({ "name": "c", "value": 2.5 })).unwrap();
        assert_eq!(string.value, ChoiceValue::String("x".to_string()));
        assert_eq!(int.value, ChoiceValue::Int(3));
        assert_eq!(float.value, ChoiceValue::Number(2.5));
        assert!(Choice::from_value(&json!({ "name": "d", "value": true })).is_err());
    }
}
