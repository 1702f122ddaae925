//! # Comparison Kernels Module
//!
//! Leaf entry points for element equality. Each invocation consumes one
//! element from each of two same-type sources and writes one `bool` byte
//! (0 or 1) to the destination.
//!
//! Struct equality is composite: the parent record drives one child per
//! field and short-circuits to `false` on the first mismatching field, so
//! later fields are never read.

use crate::enums::call_style::CallStyle;
use crate::enums::scalar_type::ScalarType;
use crate::kernels::arena::{KernelArena, KernelEntry, KernelHandle, KernelKind};
use crate::utils::read_scalar;

fn equal_single<T: Copy + PartialEq>(
    _: &KernelArena,
    _: KernelHandle,
    dst: &mut [u8],
    srcs: &[&[u8]],
) {
    dst[0] = (read_scalar::<T>(srcs[0]) == read_scalar::<T>(srcs[1])) as u8;
}

fn equal_strided<T: Copy + PartialEq>(
    _: &KernelArena,
    _: KernelHandle,
    dst: &mut [u8],
    dst_stride: usize,
    srcs: &[&[u8]],
    src_strides: &[usize],
    count: usize,
) {
    for i in 0..count {
        let a = read_scalar::<T>(&srcs[0][i * src_strides[0]..]);
        let b = read_scalar::<T>(&srcs[1][i * src_strides[1]..]);
        dst[i * dst_stride] = (a == b) as u8;
    }
}

/// Per-field equality through child kernels, short-circuiting on the first
/// `false`.
pub(crate) fn struct_equal_single(
    arena: &KernelArena,
    handle: KernelHandle,
    dst: &mut [u8],
    srcs: &[&[u8]],
) {
    let KernelKind::StructEqual {
        src0_offsets,
        src1_offsets,
        children,
        ..
    } = arena.record(handle).kind()
    else {
        unreachable!("struct equal kernel with non-struct payload");
    };
    let mut field_eq = [1u8];
    for (i, &child) in children.iter().enumerate() {
        let a = &srcs[0][src0_offsets[i]..];
        let b = &srcs[1][src1_offsets[i]..];
        arena.invoke_single(child, &mut field_eq, &[a, b]);
        if field_eq[0] == 0 {
            dst[0] = 0;
            return;
        }
    }
    dst[0] = 1;
}

pub(crate) fn struct_equal_strided(
    arena: &KernelArena,
    handle: KernelHandle,
    dst: &mut [u8],
    dst_stride: usize,
    srcs: &[&[u8]],
    src_strides: &[usize],
    count: usize,
) {
    for i in 0..count {
        let a = &srcs[0][i * src_strides[0]..];
        let b = &srcs[1][i * src_strides[1]..];
        struct_equal_single(arena, handle, &mut dst[i * dst_stride..], &[a, b]);
    }
}

pub(crate) fn struct_equal_entry(style: CallStyle) -> KernelEntry {
    match style {
        CallStyle::Single => KernelEntry::Single(struct_equal_single),
        CallStyle::Strided => KernelEntry::Strided(struct_equal_strided),
    }
}

/// Same-type equality entry point for `ty` and `style`.
pub(crate) fn equal_entry(ty: ScalarType, style: CallStyle) -> KernelEntry {
    macro_rules! entry {
        ($t:ty) => {
            match style {
                CallStyle::Single => KernelEntry::Single(equal_single::<$t>),
                CallStyle::Strided => KernelEntry::Strided(equal_strided::<$t>),
            }
        };
    }
    match ty {
        ScalarType::Bool | ScalarType::UInt8 => entry!(u8),
        ScalarType::Int8 => entry!(i8),
        ScalarType::Int16 => entry!(i16),
        ScalarType::Int32 => entry!(i32),
        ScalarType::Int64 => entry!(i64),
        ScalarType::UInt16 => entry!(u16),
        ScalarType::UInt32 => entry!(u32),
        ScalarType::UInt64 => entry!(u64),
        ScalarType::Float32 => entry!(f32),
        ScalarType::Float64 => entry!(f64),
    }
}
