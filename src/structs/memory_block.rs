//! # **MemoryBlock** — *Reference-counted raw storage substrate*
//!
//! Every array's bytes live in a [`MemoryBlock`]: a shared, reference-
//! counted byte allocation backed by a 64-byte aligned [`Vec64`], the same
//! aligned-vector substrate columnar buffers use.
//!
//! ## Ownership
//! `allocate` starts the count at 1; `acquire` returns an equally-owning
//! handle; release is `Drop`; the backing allocation is freed when the
//! count reaches 0. Counting is non-atomic (`Rc`) — concurrent
//! acquire/release on the same handle from multiple threads is unsupported
//! without external synchronization, per the crate's single-threaded
//! execution model.
//!
//! ## Zero-initializing variant
//! [`ZeroInitBlock`] additionally guarantees that any byte newly exposed by
//! growth reads as zero before the first write. This is tracked with a
//! high-water mark that is advanced (and the new range zero-filled) only on
//! growth past the previous mark — never redundantly on every call.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use vec64::Vec64;

use crate::enums::error::DynarrError;

/// Largest supported allocation. Requests past this report
/// [`DynarrError::AllocationFailure`] instead of aborting in the allocator.
const MAX_BLOCK_BYTES: usize = isize::MAX as usize;

/// Shared, reference-counted raw byte allocation.
#[derive(Debug, Clone)]
pub struct MemoryBlock {
    inner: Rc<RefCell<Vec64<u8>>>,
}

impl MemoryBlock {
    /// Allocates a block of `capacity` bytes. The new handle is the sole
    /// owner (refcount 1). Contents are zeroed.
    pub fn allocate(capacity: usize) -> Result<Self, DynarrError> {
        if capacity > MAX_BLOCK_BYTES {
            return Err(DynarrError::AllocationFailure {
                requested: capacity,
            });
        }
        let mut bytes = Vec64::with_capacity(capacity);
        bytes.0.resize(capacity, 0);
        Ok(MemoryBlock {
            inner: Rc::new(RefCell::new(bytes)),
        })
    }

    /// Wraps an existing aligned byte vector as a block.
    pub fn from_bytes(bytes: Vec64<u8>) -> Self {
        MemoryBlock {
            inner: Rc::new(RefCell::new(bytes)),
        }
    }

    /// Returns an equally-owning handle, incrementing the refcount.
    #[inline]
    pub fn acquire(&self) -> MemoryBlock {
        self.clone()
    }

    /// Number of live handles to this allocation.
    #[inline]
    pub fn refcount(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Size of the allocation in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read access to the backing bytes.
    #[inline]
    pub fn bytes(&self) -> Ref<'_, [u8]> {
        Ref::map(self.inner.borrow(), |v| v.as_slice())
    }

    /// Write access to the backing bytes.
    #[inline]
    pub fn bytes_mut(&self) -> RefMut<'_, [u8]> {
        RefMut::map(self.inner.borrow_mut(), |v| v.as_mut_slice())
    }

    /// True when both handles own the same allocation.
    #[inline]
    pub fn shares_allocation_with(&self, other: &MemoryBlock) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[derive(Debug)]
struct ZeroInitInner {
    bytes: Vec64<u8>,
    /// Bytes below this mark have been exposed (and zeroed) already.
    high_water: usize,
}

/// Growable block whose newly exposed capacity always reads as zero.
///
/// Used as the output substrate for variable-sized payloads, where a
/// consumer may legitimately read ranges it has not written yet.
#[derive(Debug, Clone)]
pub struct ZeroInitBlock {
    inner: Rc<RefCell<ZeroInitInner>>,
}

impl ZeroInitBlock {
    /// Allocates with an initial capacity, fully zeroed. The initial
    /// capacity can be set if a good estimate is known.
    pub fn allocate(initial_capacity: usize) -> Result<Self, DynarrError> {
        if initial_capacity > MAX_BLOCK_BYTES {
            return Err(DynarrError::AllocationFailure {
                requested: initial_capacity,
            });
        }
        let mut bytes = Vec64::with_capacity(initial_capacity);
        bytes.0.resize(initial_capacity, 0);
        Ok(ZeroInitBlock {
            inner: Rc::new(RefCell::new(ZeroInitInner {
                bytes,
                high_water: initial_capacity,
            })),
        })
    }

    /// Grows the block to at least `new_capacity` bytes, zero-filling
    /// exactly the range past the previous high-water mark. Requests at or
    /// below the mark are no-ops.
    pub fn grow(&self, new_capacity: usize) -> Result<(), DynarrError> {
        if new_capacity > MAX_BLOCK_BYTES {
            return Err(DynarrError::AllocationFailure {
                requested: new_capacity,
            });
        }
        let mut inner = self.inner.borrow_mut();
        if new_capacity <= inner.high_water {
            return Ok(());
        }
        // Vec::resize writes only the new tail, so bytes below the mark are
        // never touched again.
        inner.bytes.0.resize(new_capacity, 0);
        inner.high_water = new_capacity;
        Ok(())
    }

    /// Current capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.borrow().bytes.len()
    }

    /// Exposed-and-zeroed extent. Equal to the capacity at all times the
    /// block is quiescent; tracked separately so growth never re-zeroes.
    #[inline]
    pub fn high_water_mark(&self) -> usize {
        self.inner.borrow().high_water
    }

    /// Returns an equally-owning handle, incrementing the refcount.
    #[inline]
    pub fn acquire(&self) -> ZeroInitBlock {
        self.clone()
    }

    /// Number of live handles to this allocation.
    #[inline]
    pub fn refcount(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Read access to the backing bytes.
    #[inline]
    pub fn bytes(&self) -> Ref<'_, [u8]> {
        Ref::map(self.inner.borrow(), |v| v.bytes.as_slice())
    }

    /// Write access to the backing bytes.
    #[inline]
    pub fn bytes_mut(&self) -> RefMut<'_, [u8]> {
        RefMut::map(self.inner.borrow_mut(), |v| v.bytes.as_mut_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_starts_at_refcount_one() {
        let block = MemoryBlock::allocate(64).unwrap();
        assert_eq!(block.refcount(), 1);
        assert_eq!(block.len(), 64);
    }

    #[test]
    fn test_acquire_release_cycle() {
        let block = MemoryBlock::allocate(16).unwrap();
        let second = block.acquire();
        assert_eq!(block.refcount(), 2);
        assert!(second.shares_allocation_with(&block));
        drop(second);
        assert_eq!(block.refcount(), 1);
    }

    #[test]
    fn test_writes_visible_through_shared_handle() {
        let block = MemoryBlock::allocate(4).unwrap();
        let other = block.acquire();
        block.bytes_mut()[2] = 0xAB;
        assert_eq!(other.bytes()[2], 0xAB);
    }

    #[test]
    fn test_allocation_failure_on_absurd_request() {
        let err = MemoryBlock::allocate(usize::MAX).unwrap_err();
        assert!(matches!(err, DynarrError::AllocationFailure { .. }));
    }

    #[test]
    fn test_zeroinit_initial_contents() {
        let block = ZeroInitBlock::allocate(32).unwrap();
        assert_eq!(block.capacity(), 32);
        assert!(block.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zeroinit_growth_exposes_zeroes() {
        let block = ZeroInitBlock::allocate(8).unwrap();
        // Dirty the first region, then grow.
        for b in block.bytes_mut().iter_mut() {
            *b = 0xFF;
        }
        block.grow(24).unwrap();
        let bytes = block.bytes();
        assert!(bytes[..8].iter().all(|&b| b == 0xFF));
        assert!(bytes[8..24].iter().all(|&b| b == 0));
        assert_eq!(block.high_water_mark(), 24);
    }

    #[test]
    fn test_zeroinit_growth_never_rezeroes_old_range() {
        let block = ZeroInitBlock::allocate(4).unwrap();
        block.bytes_mut()[0] = 7;
        block.grow(4).unwrap(); // no-op, at the mark
        block.grow(2).unwrap(); // no-op, below the mark
        assert_eq!(block.bytes()[0], 7);
        block.grow(16).unwrap();
        assert_eq!(block.bytes()[0], 7);
    }
}
