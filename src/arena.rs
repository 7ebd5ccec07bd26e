//! Memory-ceiling accounting for packed token buffers.
//!
//! The arena answers two questions for the packer: how much room is free
//! right now (the size of the scratch region it may fill) and "commit these
//! bytes as an exact-size permanent allocation".  Committed bytes count
//! against the ceiling until [`Arena::release`] hands them back.

use bytes::Bytes;
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Arena ceiling used when none is configured.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 1 << 20;

#[derive(Debug)]
pub struct Arena {
    limit: usize,
    committed: AtomicUsize,
}

impl Arena {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            committed: AtomicUsize::new(0),
        }
    }

    /// Contiguous space currently free for a scratch region.
    #[inline]
    pub fn free_space(&self) -> usize {
        self.limit
            .saturating_sub(self.committed.load(Ordering::Acquire))
    }

    /// Bytes held by committed buffers.
    #[inline]
    pub fn committed(&self) -> usize {
        self.committed.load(Ordering::Acquire)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Copy `data` into an exact-size permanent buffer.
    ///
    /// Returns `None`, committing nothing, when `data` does not fit in the
    /// free space.
    pub fn commit(&self, data: &[u8]) -> Option<Bytes> {
        let limit: usize = self.limit;

        self.committed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(data.len()).filter(|&total| total <= limit)
            })
            .ok()?;

        debug!("Committed {} bytes ({} free)", data.len(), self.free_space());

        Some(Bytes::copy_from_slice(data))
    }

    /// Return `len` previously committed bytes to the free space.
    pub fn release(&self, len: usize) {
        let _ = self
            .committed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                Some(used.saturating_sub(len))
            });
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(DEFAULT_SCRATCH_CAPACITY)
    }
}
