//! reqwest-backed transport for the slashsync reconciliation engine
//!
//! Implements [`slashsync_core::transport::CommandTransport`] against the
//! platform's bulk-overwrite registration routes. Pair it with a
//! [`Reconciler`](slashsync_core::Reconciler):
//!
//! ```no_run
//! use slashsync_core::Reconciler;
//! use slashsync_rest::{RestConfig, RestTransport};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RestConfig::from_env()?;
//! let transport = RestTransport::from_config(config)?;
//! let engine = Reconciler::new(Arc::new(transport));
//! let report = engine.sync_all().await;
//! for (scope, error) in report.failures() {
//!     eprintln!("{scope} failed: {error}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod transport;

pub use config::{ConfigError, RestConfig};
pub use transport::RestTransport;
