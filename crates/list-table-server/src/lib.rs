//! # List Table Server
//!
//! Serves a "posts" list table over HTTP: a full admin page at `/` and AJAX refreshes
//! at `/admin-ajax.php`.
//!
//! - **[config]**: YAML configuration ([`ServerConfig`](config::ServerConfig)).
//! - **[posts]**: the [`PostsTable`](posts::PostsTable) definition and demo data.
//! - **[lifecycle]**: tracing setup and the [`AdminSystem`](lifecycle::AdminSystem) wiring.
//! - **[server]**: the hyper transport.

pub mod config;
pub mod lifecycle;
pub mod posts;
pub mod server;
