//! ciinfo: detect whether the current process runs in continuous integration.
//!
//! Detection matches an environment [`Snapshot`] against an ordered table of
//! [`Vendor`] rule sets and produces an [`Info`]: whether this is CI, which
//! vendor (the last matching one in table order), every vendor that matched,
//! and whether the build is for a pull request.
//!
//! # Architecture
//!
//! - **[`env`]** — Environment snapshots built from `KEY=VALUE` lists or the process.
//! - **[`rules`]** — Env and PR match rules plus their JSON grammar.
//! - **[`vendor`]** — Vendor records, the built-in vendor table, table loading.
//! - **[`eval`]** — The detection pass and its [`Info`] result.
//! - **[`cache`]** — Process-wide memoized detection behind [`info()`].
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — simplelog setup for the CLI.

/// Process-wide memoized detection.
pub mod cache;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Environment snapshots.
pub mod env;
/// Crate error type.
pub mod error;
/// Detection engine and result type.
pub mod eval;
/// Logger initialisation and detection logging.
pub mod logging;
/// Env and PR match rules.
pub mod rules;
/// Vendor records and tables.
pub mod vendor;

pub use cache::info;
pub use env::Snapshot;
pub use error::{Error, Result};
pub use eval::{Info, detect};
pub use vendor::Vendor;

/// Detect CI from `KEY=VALUE` strings against the built-in vendor table.
///
/// Unlike [`info()`], nothing is cached.
pub fn detect_environ<I, S>(environ: I) -> Info
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    eval::detect(&Snapshot::from_environ(environ), vendor::builtin())
}
