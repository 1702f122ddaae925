//! # Iteration Driver Module
//!
//! The odometer-style outer loop that advances every operand cursor in
//! lockstep across a resolved broadcast shape.
//!
//! The driver keeps one integer index per resolved axis. Advancing scans
//! axes from innermost to outermost, increments the first axis still below
//! its bound, and tells every cursor how many trailing axes wrapped during
//! the scan. Traversal order is strict row-major (innermost fastest),
//! deterministic, and retraceable: re-running from `reset` yields the
//! identical offset sequence for identical inputs.
//!
//! ## Usage
//! The first element is available immediately after construction; `next`
//! moves to the following one:
//! ```text
//! if !iter.empty() {
//!     loop {
//!         /* body using iter.offset(k) */
//!         if !iter.next() { break; }
//!     }
//! }
//! ```

use crate::iterate::cursor::DimCursor;
use crate::shape::broadcast::BroadcastShape;

/// Lockstep odometer over N operand cursors.
pub struct IterDriver {
    shape: Vec<usize>,
    index: Vec<usize>,
    itersize: usize,
    cursors: Vec<Box<dyn DimCursor>>,
    bases: Vec<isize>,
    offsets: Vec<isize>,
}

impl IterDriver {
    /// Builds a driver over `operands`, each a cursor plus the byte offset
    /// of its array's first element. Every cursor is reset, so the first
    /// element's offsets are available immediately.
    pub fn new(broadcast: &BroadcastShape, operands: Vec<(Box<dyn DimCursor>, isize)>) -> Self {
        let shape = broadcast.shape.clone();
        let itersize = broadcast.itersize();
        let mut cursors = Vec::with_capacity(operands.len());
        let mut bases = Vec::with_capacity(operands.len());
        let mut offsets = Vec::with_capacity(operands.len());
        for (mut cursor, base) in operands {
            offsets.push(cursor.reset(base));
            cursors.push(cursor);
            bases.push(base);
        }
        IterDriver {
            index: vec![0; shape.len()],
            shape,
            itersize,
            cursors,
            bases,
            offsets,
        }
    }

    /// Total number of elements in the iteration.
    #[inline]
    pub fn itersize(&self) -> usize {
        self.itersize
    }

    /// True when the iteration has no elements (some axis has size 0).
    #[inline]
    pub fn empty(&self) -> bool {
        self.itersize == 0
    }

    /// Number of operands advanced in lockstep.
    #[inline]
    pub fn operand_count(&self) -> usize {
        self.cursors.len()
    }

    /// Current element byte offset for operand `k`.
    #[inline]
    pub fn offset(&self, k: usize) -> isize {
        self.offsets[k]
    }

    /// Advances to the next element. Returns `false` when the iteration is
    /// finished — immediately so when it is empty.
    pub fn next(&mut self) -> bool {
        if self.itersize == 0 {
            return false;
        }
        let mut i = self.shape.len();
        while i != 0 {
            i -= 1;
            self.index[i] += 1;
            if self.index[i] != self.shape[i] {
                let rolled = self.shape.len() - i - 1;
                for (k, cursor) in self.cursors.iter_mut().enumerate() {
                    self.offsets[k] = cursor.advance(rolled);
                }
                return true;
            }
            self.index[i] = 0;
        }
        false
    }

    /// Rewinds to the first element, resetting every cursor. The re-run
    /// traces the identical offset sequence.
    pub fn reset(&mut self) {
        self.index.iter_mut().for_each(|i| *i = 0);
        for (k, cursor) in self.cursors.iter_mut().enumerate() {
            self.offsets[k] = cursor.reset(self.bases[k]);
        }
    }
}
