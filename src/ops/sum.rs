//! # Sum Reduction Op
//!
//! Sums an array over a chosen set of axes. The destination keeps the
//! remaining axes and starts at the reduction identity (zero); a
//! zero-stride destination cursor folds every element along the reduced
//! axes into its accumulator while the source walks its full shape.

use crate::enums::call_style::CallStyle;
use crate::enums::error::DynarrError;
use crate::iterate::cursor::StridedCursor;
use crate::iterate::driver::IterDriver;
use crate::kernels::arena::KernelArena;
use crate::kernels::builder::{KernelOp, build_kernel};
use crate::shape::broadcast::BroadcastShape;
use crate::structs::array::Array;
use crate::structs::type_descriptor::DataType;

/// Sums `src` over `axes`, returning an array of the remaining axes.
///
/// Reducing every axis yields a zero-dimensional array holding the total.
/// Listing an axis twice is the same as listing it once. A reduced axis of
/// size 0 contributes the identity.
pub fn sum(src: &Array, axes: &[usize]) -> Result<Array, DynarrError> {
    let shape = src.shape();
    let depth = shape.len();
    let mut reduced = vec![false; depth];
    for &axis in axes {
        if axis >= depth {
            return Err(DynarrError::TooManyIndices {
                provided: axis + 1,
                depth,
            });
        }
        reduced[axis] = true;
    }

    let element = src.element_type();
    let dst_shape: Vec<usize> = shape
        .iter()
        .zip(reduced.iter())
        .filter(|&(_, &r)| !r)
        .map(|(&s, _)| s)
        .collect();
    let dst = Array::zeros(&DataType::fixed_dims(&dst_shape, element.acquire()))?;

    let mut arena = KernelArena::new();
    let kernel = build_kernel(
        &mut arena,
        KernelOp::Sum,
        &element,
        &[&element],
        CallStyle::Single,
    )?;

    // The destination walks the full source shape: reduced axes carry
    // stride 0, so all their elements land on one accumulator.
    let mut dst_strides = vec![0isize; depth];
    let mut kept = 0;
    for axis in 0..depth {
        if !reduced[axis] {
            dst_strides[axis] = dst.meta().dims[kept].stride;
            kept += 1;
        }
    }
    let bs = BroadcastShape {
        axis_perm: (0..depth).collect(),
        shape,
    };
    let dst_cursor = StridedCursor::new(dst_strides);
    let src_cursor = StridedCursor::new(src.meta().dims.iter().map(|d| d.stride).collect());
    let mut iter = IterDriver::new(
        &bs,
        vec![
            (Box::new(dst_cursor), dst.offset() as isize),
            (Box::new(src_cursor), src.offset() as isize),
        ],
    );

    {
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
    }
    Ok(dst)
}
