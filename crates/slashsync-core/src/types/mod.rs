//! Schema value types shared across the registry, engine, and declaration
//! layers

pub mod command;
pub mod option;
pub mod scope;

pub use command::{CommandDefinition, CommandType, Handler, Snowflake};
pub use option::{ChannelType, Choice, ChoiceValue, CommandOption, OptionType};
pub use scope::Scope;
