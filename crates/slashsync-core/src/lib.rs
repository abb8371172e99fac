//! slashsync core library
//!
//! Declarative slash-command schemas and the reconciliation engine that
//! keeps a remote platform's registered command set synchronized with
//! them. The schema model is a recursively nested option tree with strict
//! structural equality and a canonical wire representation; the engine
//! replaces each scope's remote set with the locally staged definitions in
//! one atomic overwrite call and writes the remote-assigned identity back.
//!
//! The HTTP transport is an external collaborator behind
//! [`transport::CommandTransport`]; argument parsing and dispatch of user
//! invocations are out of scope.

pub mod declare;
pub mod error;
pub mod reconcile;
pub mod registry;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use declare::{ParamSpec, SlashCommand};
pub use error::{SyncError, SyncResult};
pub use reconcile::{Reconciler, ScopeOutcome, SyncReport};
pub use registry::{PendingRegistry, RegisteredIndex};
pub use transport::CommandTransport;
pub use types::{
    ChannelType, Choice, ChoiceValue, CommandDefinition, CommandOption, CommandType, OptionType,
    Scope, Snowflake,
};
