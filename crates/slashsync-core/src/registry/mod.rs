//! Pending and registered command registries

pub mod pending;
pub mod registered;

pub use pending::PendingRegistry;
pub use registered::RegisteredIndex;
