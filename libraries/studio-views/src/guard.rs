//! Fetch generations and the pending-submission flag

use crate::error::{Result, ViewError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Hands out fetch tickets; only the newest ticket may apply its result.
#[derive(Debug, Default)]
pub(crate) struct FetchGeneration(AtomicU64);

impl FetchGeneration {
    /// Start a fetch, superseding all earlier ones
    pub(crate) fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

/// Disabled-while-pending flag for a form
#[derive(Debug, Default)]
pub(crate) struct BusyFlag(AtomicBool);

impl BusyFlag {
    /// Claim the flag or fail with [`ViewError::Busy`]
    pub(crate) fn acquire(&self) -> Result<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ViewError::Busy)?;
        Ok(BusyGuard(&self.0))
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the flag on drop
pub(crate) struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
