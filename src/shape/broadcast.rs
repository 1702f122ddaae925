//! # Shape Broadcast Resolver Module
//!
//! Computes the common iteration shape for N operand shapes, or fails with
//! the first conflicting pair.
//!
//! Shapes are right-aligned sequences of axis sizes: shorter shapes are
//! implicitly left-padded with size-1 axes. Per trailing axis position, the
//! resolved size is 1 when every operand contributes 1, the single distinct
//! size greater than 1 when exactly one appears, and an error when two or
//! more distinct sizes greater than 1 collide.

use crate::enums::error::DynarrError;

/// A resolved common iteration shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastShape {
    /// Axis sizes, outermost first.
    pub shape: Vec<usize>,
    /// Iteration-order hint reserved for future optimisation. Identity
    /// today; the walk itself is always innermost-axis-fastest and does not
    /// consult it.
    pub axis_perm: Vec<usize>,
}

impl BroadcastShape {
    /// Product of all axis sizes; the total element count of one lockstep
    /// iteration.
    pub fn itersize(&self) -> usize {
        self.shape.iter().product()
    }

    /// Number of axes.
    #[inline]
    pub fn depth(&self) -> usize {
        self.shape.len()
    }
}

/// Resolves the common broadcast shape of `shapes`, or fails with the two
/// conflicting shapes.
pub fn resolve_broadcast_shape(shapes: &[&[usize]]) -> Result<BroadcastShape, DynarrError> {
    let depth = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut out = vec![1usize; depth];
    // Which operand pinned each axis to a size > 1, for error reporting.
    let mut pinned_by = vec![usize::MAX; depth];

    for (op, shape) in shapes.iter().enumerate() {
        let pad = depth - shape.len();
        for (i, &size) in shape.iter().enumerate() {
            let axis = pad + i;
            if size == 1 {
                continue;
            }
            if out[axis] == 1 {
                out[axis] = size;
                pinned_by[axis] = op;
            } else if out[axis] != size {
                return Err(DynarrError::BroadcastIncompatibleShapes {
                    lhs: shapes[pinned_by[axis]].to_vec(),
                    rhs: shape.to_vec(),
                });
            }
        }
    }

    Ok(BroadcastShape {
        axis_perm: (0..depth).collect(),
        shape: out,
    })
}

/// True when `src` (right-aligned) broadcasts onto the fixed destination
/// shape `dst`: no more axes than the destination, and each axis either
/// matches or is 1.
pub fn shape_can_broadcast(dst: &[usize], src: &[usize]) -> bool {
    if src.len() > dst.len() {
        return false;
    }
    let pad = dst.len() - src.len();
    src.iter()
        .enumerate()
        .all(|(i, &s)| s == 1 || s == dst[pad + i])
}
