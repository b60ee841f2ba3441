//! Harness version information.
//!
//! Taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time. Prefer this constant over repeating
//! `env!("CARGO_PKG_VERSION")`.

/// The toolbelt version string (for example, `0.3.0`).
pub const TOOLBELT_VERSION: &str = env!("CARGO_PKG_VERSION");
