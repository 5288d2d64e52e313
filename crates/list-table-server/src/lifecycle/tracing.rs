//! # Tracing Setup
//!
//! One subscriber for the whole process: compact format, level from `RUST_LOG`
//! (defaulting to `info`), no module targets.
//!
//! ```bash
//! RUST_LOG=info list-table-server     # requests, dispatch decisions
//! RUST_LOG=debug list-table-server    # merge reports, queries, registry contents
//! ```
//!
//! Useful fields: `action` (dispatch span), `table`, `page`, `total_items`, `rejected`.

use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
