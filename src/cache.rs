//! Memoized detection for the current process.

use std::sync::OnceLock;

use crate::env::Snapshot;
use crate::eval::{self, Info};
use crate::vendor;

static CURRENT: CachedInfo = CachedInfo::new();

/// A detection result computed at most once.
///
/// Concurrent first callers block until the single computation finishes and
/// then all observe the same value. Later environment changes are never seen.
#[derive(Debug, Default)]
pub struct CachedInfo {
    cell: OnceLock<Info>,
}

impl CachedInfo {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached result, running `detect` if nothing is cached yet.
    pub fn get_or_detect<F>(&self, detect: F) -> &Info
    where
        F: FnOnce() -> Info,
    {
        self.cell.get_or_init(detect)
    }

    /// The cached result, if already computed.
    pub fn get(&self) -> Option<&Info> {
        self.cell.get()
    }

    /// Drop the cached result. Needs exclusive access, so the process-wide
    /// instance can never be reset.
    #[cfg(test)]
    pub(crate) fn reset(&mut self) {
        self.cell.take();
    }
}

/// Detect the current process against the built-in vendor table.
///
/// Computed on first call and reused for the lifetime of the process.
pub fn info() -> &'static Info {
    CURRENT.get_or_detect(|| eval::detect(&Snapshot::from_process(), vendor::builtin()))
}
