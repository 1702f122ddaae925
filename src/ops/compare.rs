//! # Array Equality Op
//!
//! Whole-array equality: same shape, same element type, and every element
//! pair equal. Shape or type disagreement is an ordinary `false`, not an
//! error, and element comparison short-circuits on the first mismatch.

use crate::enums::call_style::CallStyle;
use crate::enums::error::DynarrError;
use crate::enums::scalar_type::ScalarType;
use crate::iterate::cursor::StridedCursor;
use crate::iterate::driver::IterDriver;
use crate::kernels::arena::KernelArena;
use crate::kernels::builder::{KernelOp, build_kernel};
use crate::shape::broadcast::BroadcastShape;
use crate::structs::array::Array;
use crate::structs::type_descriptor::DataType;

/// True when `a` and `b` have identical shape, identical element type, and
/// equal elements throughout. No broadcasting.
pub fn array_equals(a: &Array, b: &Array) -> Result<bool, DynarrError> {
    let shape = a.shape();
    if shape != b.shape() {
        return Ok(false);
    }
    if a.element_type() != b.element_type() {
        return Ok(false);
    }

    let mut arena = KernelArena::new();
    let kernel = build_kernel(
        &mut arena,
        KernelOp::Equal,
        &DataType::scalar(ScalarType::Bool),
        &[&a.element_type(), &b.element_type()],
        CallStyle::Single,
    )?;

    let bs = BroadcastShape {
        axis_perm: (0..shape.len()).collect(),
        shape,
    };
    let a_cursor = StridedCursor::new(a.meta().dims.iter().map(|d| d.stride).collect());
    let b_cursor = StridedCursor::new(b.meta().dims.iter().map(|d| d.stride).collect());
    let mut iter = IterDriver::new(
        &bs,
        vec![
            (Box::new(a_cursor), a.offset() as isize),
            (Box::new(b_cursor), b.offset() as isize),
        ],
    );

    let a_bytes = a.block().bytes();
    let b_bytes = b.block().bytes();
    let mut eq = [1u8];
    if !iter.empty() {
        loop {
            let oa = iter.offset(0) as usize;
            let ob = iter.offset(1) as usize;
            arena.invoke_single(kernel, &mut eq, &[&a_bytes[oa..], &b_bytes[ob..]]);
            if eq[0] == 0 {
                return Ok(false);
            }
            if !iter.next() {
                break;
            }
        }
    }
    Ok(true)
}
