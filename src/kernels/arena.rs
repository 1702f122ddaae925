//! # Kernel Arena Module
//!
//! The flat buffer compiled kernels live in.
//!
//! # Design
//! A kernel is a tree of [`KernelRecord`]s appended into one growable
//! arena and addressed by stable [`KernelHandle`] indices: a composite
//! record reaches its children by direct index jumps into the same buffer,
//! not through a chain of heap-allocated polymorphic objects. This keeps
//! per-element sub-operation dispatch to one function-pointer call while
//! allowing unbounded composition depth.
//!
//! Each record's header is its invocation entry point — a plain `fn`
//! pointer chosen at build time for the requested
//! [`CallStyle`](crate::CallStyle) — and its payload is the tagged
//! [`KernelKind`] the entry point interprets.
//!
//! ## Invariants
//! - A child's index strictly exceeds its parent's, and children never
//!   alias.
//! - Teardown is depth-first, child before parent; dropping the arena (or
//!   rolling back a failed build) destroys records in reverse append order,
//!   which respects that invariant by construction, and an explicit
//!   kind-keyed recursive `destroy` enforces it for composite records.
//! - A record is valid for the lifetime of the arena and may be invoked
//!   any number of times with varying pointers; the compiled plan carries
//!   no per-invocation state.

use std::cell::RefCell;
use std::rc::Rc;

use crate::enums::scalar_type::ScalarType;

/// Stable index of a kernel record within its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelHandle(pub(crate) usize);

impl KernelHandle {
    /// The record's position in the arena, for diagnostics.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Single-style entry point: performs exactly one output element.
pub type SingleFn = fn(&KernelArena, KernelHandle, &mut [u8], &[&[u8]]);

/// Strided-style entry point: performs `count` elements, with destination
/// and per-source byte strides.
pub type StridedFn = fn(&KernelArena, KernelHandle, &mut [u8], usize, &[&[u8]], &[usize], usize);

/// A record's invocation entry point, fixed at build time.
#[derive(Clone, Copy)]
pub enum KernelEntry {
    Single(SingleFn),
    Strided(StridedFn),
}

/// Tagged payload a kernel entry point interprets.
#[derive(Debug, Clone)]
pub enum KernelKind {
    /// Same-type copy of `width` bytes.
    ScalarAssign { width: usize },
    /// Lossless widening conversion; the entry point is monomorphised to
    /// the pair, the payload identifies it for diagnostics.
    ScalarConvert { dst: ScalarType, src: ScalarType },
    /// Same-type comparison writing a `bool` byte.
    ScalarEqual { ty: ScalarType },
    /// Reduction combine step: `dst += src`.
    ScalarSum { ty: ScalarType },
    /// Per-field assignment through child kernels.
    StructAssign {
        dst_offsets: Vec<usize>,
        src_offsets: Vec<usize>,
        field_sizes: Vec<usize>,
        children: Vec<KernelHandle>,
    },
    /// Per-field comparison through child kernels, short-circuiting on the
    /// first mismatch.
    StructEqual {
        src0_offsets: Vec<usize>,
        src1_offsets: Vec<usize>,
        field_sizes: Vec<usize>,
        children: Vec<KernelHandle>,
    },
}

impl KernelKind {
    /// Child handles, for composite kinds.
    fn children(&self) -> &[KernelHandle] {
        match self {
            KernelKind::StructAssign { children, .. }
            | KernelKind::StructEqual { children, .. } => children,
            _ => &[],
        }
    }
}

/// One compiled operation unit: entry-point header plus payload.
pub struct KernelRecord {
    pub(crate) entry: KernelEntry,
    pub(crate) kind: KernelKind,
}

impl KernelRecord {
    #[inline]
    pub fn kind(&self) -> &KernelKind {
        &self.kind
    }
}

/// Growable arena of kernel records.
#[derive(Default)]
pub struct KernelArena {
    records: Vec<Option<KernelRecord>>,
    teardown_log: Option<Rc<RefCell<Vec<usize>>>>,
}

impl KernelArena {
    pub fn new() -> Self {
        KernelArena::default()
    }

    /// Number of record slots appended so far (live or torn down).
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registers a sink that receives record indices in teardown order.
    /// Diagnostic aid for verifying child-before-parent destruction.
    pub fn observe_teardown(&mut self, log: Rc<RefCell<Vec<usize>>>) {
        self.teardown_log = Some(log);
    }

    pub(crate) fn append(&mut self, record: KernelRecord) -> KernelHandle {
        let handle = KernelHandle(self.records.len());
        self.records.push(Some(record));
        handle
    }

    pub(crate) fn record(&self, handle: KernelHandle) -> &KernelRecord {
        match self.records[handle.0].as_ref() {
            Some(r) => r,
            None => unreachable!("kernel record {} already destroyed", handle.0),
        }
    }

    pub(crate) fn record_mut(&mut self, handle: KernelHandle) -> &mut KernelRecord {
        match self.records[handle.0].as_mut() {
            Some(r) => r,
            None => unreachable!("kernel record {} already destroyed", handle.0),
        }
    }

    /// Performs one operation instance through the record's entry point.
    ///
    /// A record built for the strided style is driven as a run of one.
    #[inline]
    pub fn invoke_single(&self, handle: KernelHandle, dst: &mut [u8], srcs: &[&[u8]]) {
        match self.record(handle).entry {
            KernelEntry::Single(f) => f(self, handle, dst, srcs),
            KernelEntry::Strided(f) => {
                let zero_strides = vec![0usize; srcs.len()];
                f(self, handle, dst, 0, srcs, &zero_strides, 1);
            }
        }
    }

    /// Performs a batch of `count` operation instances separated by byte
    /// strides.
    ///
    /// A record built for the single style is driven element by element.
    pub fn invoke_strided(
        &self,
        handle: KernelHandle,
        dst: &mut [u8],
        dst_stride: usize,
        srcs: &[&[u8]],
        src_strides: &[usize],
        count: usize,
    ) {
        match self.record(handle).entry {
            KernelEntry::Strided(f) => {
                f(self, handle, dst, dst_stride, srcs, src_strides, count)
            }
            KernelEntry::Single(f) => {
                for i in 0..count {
                    let element_srcs: Vec<&[u8]> = srcs
                        .iter()
                        .zip(src_strides.iter())
                        .map(|(s, &stride)| &s[i * stride..])
                        .collect();
                    f(self, handle, &mut dst[i * dst_stride..], &element_srcs);
                }
            }
        }
    }

    /// High-water position used to unwind a partially built composite.
    #[inline]
    pub(crate) fn mark(&self) -> usize {
        self.records.len()
    }

    /// Destroys every record appended at or after `mark` and truncates the
    /// arena back to it. Reverse append order guarantees children go before
    /// parents.
    pub(crate) fn rollback_to(&mut self, mark: usize) {
        for idx in (mark..self.records.len()).rev() {
            self.destroy(idx);
        }
        self.records.truncate(mark);
    }

    /// Kind-keyed recursive teardown: children first, then the record
    /// itself. Idempotent per slot.
    fn destroy(&mut self, idx: usize) {
        let Some(record) = self.records[idx].take() else {
            return;
        };
        for child in record.kind.children().to_vec() {
            self.destroy(child.0);
        }
        if let Some(log) = &self.teardown_log {
            log.borrow_mut().push(idx);
        }
    }
}

impl Drop for KernelArena {
    fn drop(&mut self) {
        for idx in (0..self.records.len()).rev() {
            self.destroy(idx);
        }
    }
}
