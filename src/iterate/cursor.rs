//! # Iteration Cursor Module
//!
//! Per-operand traversal state ("iterdata"): transient, one per operand per
//! active iteration, computing successive element byte offsets as the outer
//! odometer advances.
//!
//! A cursor exposes exactly two operations: `reset` at iteration start and
//! `advance` when the odometer rolls over some number of trailing axes.
//! [`StridedCursor`] is the fixed-dimension implementation; the [`DimCursor`]
//! trait is the seam where other dimension representations plug in.

use crate::enums::error::DynarrError;
use crate::structs::metadata::ArrayMeta;

/// Per-operand dimension-traversal state.
///
/// Offsets are byte offsets relative to the operand's own base offset; the
/// driver adds the array's base before slicing. Cursors never persist
/// across iterations.
pub trait DimCursor {
    /// Positions the cursor at the first element. Called once at iteration
    /// start; returns the first element offset.
    fn reset(&mut self, base: isize) -> isize;

    /// Advances after the odometer rolled over `axes_rolled` trailing axes:
    /// those axes return to index 0 and the next axis out steps once.
    /// Returns the new element offset.
    fn advance(&mut self, axes_rolled: usize) -> isize;
}

/// Cursor over fixed, strided dimensions, wrapped to a broadcast shape.
///
/// Axes the operand does not really have — extra leading axes, and axes
/// where the operand's size is 1 against a larger broadcast size — carry
/// stride 0, so increments on them are no-ops (broadcast semantics).
#[derive(Debug, Clone)]
pub struct StridedCursor {
    /// One stride per broadcast axis, outermost first.
    strides: Vec<isize>,
    index: Vec<usize>,
    base: isize,
}

impl StridedCursor {
    /// Builds a cursor directly from per-broadcast-axis strides.
    pub fn new(strides: Vec<isize>) -> Self {
        let index = vec![0; strides.len()];
        StridedCursor {
            strides,
            index,
            base: 0,
        }
    }

    /// Wraps an operand's dimension metadata to `broadcast_shape`,
    /// right-aligned. Fails when some operand axis neither matches the
    /// broadcast size nor is 1.
    pub fn broadcast_to(
        meta: &ArrayMeta,
        broadcast_shape: &[usize],
    ) -> Result<Self, DynarrError> {
        let depth = broadcast_shape.len();
        if meta.depth() > depth {
            return Err(DynarrError::BroadcastIncompatibleShapes {
                lhs: broadcast_shape.to_vec(),
                rhs: meta.shape(),
            });
        }
        let pad = depth - meta.depth();
        let mut strides = vec![0isize; depth];
        for (i, dim) in meta.dims.iter().enumerate() {
            let axis = pad + i;
            if dim.size == broadcast_shape[axis] {
                strides[axis] = dim.stride;
            } else if dim.size == 1 {
                strides[axis] = 0;
            } else {
                return Err(DynarrError::BroadcastIncompatibleShapes {
                    lhs: broadcast_shape.to_vec(),
                    rhs: meta.shape(),
                });
            }
        }
        Ok(StridedCursor::new(strides))
    }

    #[inline]
    fn offset(&self) -> isize {
        let mut off = self.base;
        for (i, &stride) in self.strides.iter().enumerate() {
            off += self.index[i] as isize * stride;
        }
        off
    }
}

impl DimCursor for StridedCursor {
    fn reset(&mut self, base: isize) -> isize {
        self.base = base;
        self.index.iter_mut().for_each(|i| *i = 0);
        base
    }

    fn advance(&mut self, axes_rolled: usize) -> isize {
        let depth = self.strides.len();
        debug_assert!(axes_rolled < depth);
        let axis = depth - 1 - axes_rolled;
        for i in axis + 1..depth {
            self.index[i] = 0;
        }
        self.index[axis] += 1;
        self.offset()
    }
}
