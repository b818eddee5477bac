//! Linear arena allocator
//!
//! [`Arena`] reserves one fixed-size region up front and serves
//! sub-allocations from it by advancing a monotonic cursor. Individual
//! blocks are never reclaimed: [`Arena::release`] accepts a block and does
//! nothing, and the whole region is returned to the system only when the
//! arena is dropped.
//!
//! # Layout
//!
//! ```text
//! region: [ block 0 | block 1 | block 2 |      free      ]
//!                                       ^ offset         ^ capacity
//! ```
//!
//! Invariants:
//! - `0 <= offset <= capacity` at all times
//! - every block lies inside `[0, capacity)` and blocks never overlap
//!
//! The `buddy` mode alias on the command line is historical: there is no
//! power-of-two splitting or coalescing.

use crate::error::{Error, Result};
use std::cell::Cell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use tracing::{debug, trace, warn};

/// Default arena size used by the command-line tool (128 MiB).
pub const DEFAULT_ARENA_CAPACITY: usize = 128 * 1024 * 1024;

/// Fixed-capacity bump allocator.
///
/// Blocks borrow the arena, so the borrow checker guarantees that no block
/// outlives the region it points into. The cursor lives in a [`Cell`], which
/// also makes the arena `!Sync`: concurrent use would need a mutex around
/// [`Arena::allocate`].
pub struct Arena {
    base: NonNull<u8>,
    capacity: usize,
    offset: Cell<usize>,
    allocations: Cell<usize>,
}

impl Arena {
    /// Reserve a new arena of `capacity` bytes.
    ///
    /// The region is zero-filled on creation, but callers must not rely on
    /// the contents of a freshly allocated block.
    pub fn new(capacity: usize) -> Self {
        let region: Box<[u8]> = vec![0u8; capacity].into_boxed_slice();
        let base = NonNull::from(Box::leak(region)).cast::<u8>();
        debug!(capacity, "arena reserved");
        Self {
            base,
            capacity,
            offset: Cell::new(0),
            allocations: Cell::new(0),
        }
    }

    /// Reserve an arena of [`DEFAULT_ARENA_CAPACITY`] bytes.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_ARENA_CAPACITY)
    }

    /// Allocate `len` contiguous bytes at the current cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArenaExhausted`] when `offset + len` would exceed
    /// the capacity. The cursor is left untouched in that case.
    pub fn allocate(&self, len: usize) -> Result<ArenaBlock<'_>> {
        let start = self.offset.get();
        let available = self.capacity - start;
        let end = match start.checked_add(len) {
            Some(end) if end <= self.capacity => end,
            _ => {
                warn!(requested = len, available, "arena out of memory");
                return Err(Error::ArenaExhausted {
                    requested: len,
                    available,
                });
            }
        };

        self.offset.set(end);
        self.allocations.set(self.allocations.get() + 1);
        trace!(offset = start, len, "arena allocation");

        // SAFETY: `start..end` lies inside the region (checked above) and the
        // cursor only moves forward, so no other live block covers these
        // bytes. The region outlives the returned borrow of `self`.
        let bytes = unsafe { std::slice::from_raw_parts_mut(self.base.as_ptr().add(start), len) };
        Ok(ArenaBlock {
            bytes,
            offset: start,
        })
    }

    /// Accept a block back from its owner.
    ///
    /// Individual blocks are not reclaimed; the bytes stay reserved until the
    /// arena itself is dropped.
    pub fn release(&self, block: ArenaBlock<'_>) {
        trace!(
            offset = block.offset,
            len = block.len(),
            "arena release ignored"
        );
    }

    /// Total size of the region in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes handed out so far.
    pub fn used(&self) -> usize {
        self.offset.get()
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.capacity - self.offset.get()
    }

    /// Number of successful allocations.
    pub fn allocation_count(&self) -> usize {
        self.allocations.get()
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        let region = std::ptr::slice_from_raw_parts_mut(self.base.as_ptr(), self.capacity);
        // SAFETY: `base`/`capacity` came from `Box::leak` in `Arena::new` and
        // every block borrowing the region has already ended.
        drop(unsafe { Box::from_raw(region) });
        debug!(capacity = self.capacity, "arena released");
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("used", &self.used())
            .field("allocations", &self.allocation_count())
            .finish()
    }
}

/// A block of bytes carved out of an [`Arena`].
pub struct ArenaBlock<'a> {
    bytes: &'a mut [u8],
    offset: usize,
}

impl ArenaBlock<'_> {
    /// Byte offset of this block from the start of the arena region.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Deref for ArenaBlock<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes
    }
}

impl DerefMut for ArenaBlock<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.bytes
    }
}

impl fmt::Debug for ArenaBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaBlock")
            .field("offset", &self.offset)
            .field("len", &self.bytes.len())
            .finish()
    }
}
