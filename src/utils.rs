//! # Utilities - *Internal Helper Utilities*
//!
//! Raw scalar load/store helpers shared by the kernel leaves, plus small
//! layout arithmetic. These are the only places the crate reads or writes
//! untyped bytes directly.

/// Reads one `T` from the front of `bytes`, without an alignment
/// requirement.
///
/// Only the machine-scalar element types ever flow through here; every
/// caller slices its operand to at least `size_of::<T>()` bytes.
#[inline(always)]
pub(crate) fn read_scalar<T: Copy>(bytes: &[u8]) -> T {
    assert!(bytes.len() >= size_of::<T>());
    // SAFETY: length checked above; element buffers hold values previously
    // written through `write_scalar`, so the bit pattern is valid for T.
    unsafe { std::ptr::read_unaligned(bytes.as_ptr() as *const T) }
}

/// Writes `v` to the front of `bytes`, without an alignment requirement.
#[inline(always)]
pub(crate) fn write_scalar<T: Copy>(bytes: &mut [u8], v: T) {
    assert!(bytes.len() >= size_of::<T>());
    // SAFETY: length checked above.
    unsafe { std::ptr::write_unaligned(bytes.as_mut_ptr() as *mut T, v) }
}

/// Rounds `offset` up to the next multiple of `align` (a power of two).
#[inline(always)]
pub(crate) fn align_up(offset: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (offset + align - 1) & !(align - 1)
}
