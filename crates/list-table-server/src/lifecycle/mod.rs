//! # System Lifecycle
//!
//! Startup wiring for the server: tracing, then the [`AdminSystem`] that owns the record
//! source, CSRF guard, table registry and dispatcher.
//!
//! ```rust,ignore
//! setup_tracing();
//! let system = Arc::new(AdminSystem::new(&config));
//! server::serve(listener, system, shutdown_signal()).await?;
//! ```
//!
//! The system is built once and never mutated; every request gets a fresh `ListTable`
//! from the registry, so no state crosses request boundaries.

pub mod admin_system;
pub mod tracing;

pub use self::admin_system::*;
pub use self::tracing::setup_tracing;
