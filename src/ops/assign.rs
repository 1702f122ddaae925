//! # Broadcast Assignment Op
//!
//! Assigns one array's elements into another, broadcasting the source to
//! the destination's fixed shape. The element kernel is compiled once per
//! call, then driven across the destination odometer-style; same-type
//! copies, lossless widenings, and per-field struct assignment all flow
//! through the same compiled path.

use crate::enums::call_style::CallStyle;
use crate::enums::error::DynarrError;
use crate::iterate::cursor::StridedCursor;
use crate::iterate::driver::IterDriver;
use crate::kernels::arena::KernelArena;
use crate::kernels::builder::{KernelOp, build_kernel};
use crate::shape::broadcast::{BroadcastShape, shape_can_broadcast};
use crate::structs::array::Array;

/// Assigns `src` into `dst`, broadcasting `src` to `dst`'s shape.
///
/// The destination shape is fixed: the source must broadcast onto it, and
/// the source element type must be losslessly assignable to the
/// destination's. Fails before any element is written.
///
/// # Panics
/// Panics when `dst` and `src` share a storage allocation.
pub fn broadcast_assign(dst: &Array, src: &Array) -> Result<(), DynarrError> {
    assert!(
        !dst.block().shares_allocation_with(src.block()),
        "assignment source and destination must not share storage"
    );
    let dst_shape = dst.shape();
    let src_shape = src.shape();
    if !shape_can_broadcast(&dst_shape, &src_shape) {
        return Err(DynarrError::BroadcastIncompatibleShapes {
            lhs: dst_shape,
            rhs: src_shape,
        });
    }

    let mut arena = KernelArena::new();
    let kernel = build_kernel(
        &mut arena,
        KernelOp::Assign,
        &dst.element_type(),
        &[&src.element_type()],
        CallStyle::Single,
    )?;

    let bs = BroadcastShape {
        axis_perm: (0..dst_shape.len()).collect(),
        shape: dst_shape,
    };
    let dst_cursor = StridedCursor::new(dst.meta().dims.iter().map(|d| d.stride).collect());
    let src_cursor = src.dtype().cursor(src.meta(), &bs.shape)?;
    let mut iter = IterDriver::new(
        &bs,
        vec![
            (Box::new(dst_cursor), dst.offset() as isize),
            (src_cursor, src.offset() as isize),
        ],
    );

    let mut dst_bytes = dst.block().bytes_mut();
    let src_bytes = src.block().bytes();
    if !iter.empty() {
        loop {
            let d = iter.offset(0) as usize;
            let s = iter.offset(1) as usize;
            arena.invoke_single(kernel, &mut dst_bytes[d..], &[&src_bytes[s..]]);
            if !iter.next() {
                break;
            }
        }
    }
    Ok(())
}
