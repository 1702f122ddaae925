//! # **Dynarr** — *Dynamically typed array computation engine*
//!
//! Arrays in `dynarr` carry runtime-resolved type descriptors rather than
//! compile-time types, yet element-wise and reduction operations run with
//! near-static-dispatch performance across arbitrary shapes, broadcasting
//! rules, and strided memory layouts.
//!
//! ## Execution path
//! Every operation call flows through four subsystems:
//! 1. [`shape::broadcast`] resolves a common iteration shape from the
//!    operand shapes, or fails with the conflicting pair.
//! 2. [`dispatch`] selects the best-matching overload when the callable is
//!    signature-overloaded, via exact match or promotion ranking.
//! 3. [`kernels`] compiles a reusable, tree-shaped operation into a flat
//!    arena once per call-site type combination; the compiled entry point is
//!    then invoked once per element with no further type resolution.
//! 4. [`iterate`] walks the broadcast shape odometer-style, advancing one
//!    cursor per operand in lockstep and feeding element offsets to the
//!    compiled kernel.
//!
//! A reference-counted raw memory block ([`MemoryBlock`], [`ZeroInitBlock`])
//! underlies all of these as the storage substrate.
//!
//! Execution is fully synchronous and single-threaded within one
//! build-then-iterate cycle: reference counts are non-atomic (`Rc`), and any
//! parallelism belongs to a layer above this crate.

pub mod enums {
    pub mod call_style;
    pub mod error;
    pub mod scalar_type;
}

pub mod structs {
    pub mod array;
    pub mod memory_block;
    pub mod metadata;
    pub mod type_descriptor;
}

pub mod shape {
    pub mod broadcast;
}

pub mod iterate {
    pub mod cursor;
    pub mod driver;
}

pub mod kernels {
    pub mod arena;
    pub mod assign;
    pub mod builder;
    pub mod compare;
    pub mod reduce;
}

pub mod dispatch {
    pub mod resolver;
    pub mod signature;
}

pub mod ops {
    pub mod assign;
    pub mod compare;
    pub mod sum;
}

pub mod traits {
    pub mod element;
}

pub(crate) mod utils;

pub use dispatch::resolver::DispatchTable;
pub use dispatch::signature::{Signature, promotion_distance};
pub use enums::call_style::CallStyle;
pub use enums::error::DynarrError;
pub use enums::scalar_type::ScalarType;
pub use iterate::cursor::{DimCursor, StridedCursor};
pub use iterate::driver::IterDriver;
pub use kernels::arena::{KernelArena, KernelHandle};
pub use kernels::builder::{KernelOp, build_kernel};
pub use ops::assign::broadcast_assign;
pub use ops::compare::array_equals;
pub use ops::sum::sum;
pub use shape::broadcast::{BroadcastShape, resolve_broadcast_shape, shape_can_broadcast};
pub use structs::array::Array;
pub use structs::memory_block::{MemoryBlock, ZeroInitBlock};
pub use structs::metadata::{ArrayMeta, DimMeta};
pub use structs::type_descriptor::{DataType, StructField, TypeKind};
pub use traits::element::{Element, Numeric};
