//! # Assignment Kernels Module
//!
//! Leaf entry points for element assignment: same-type byte copies,
//! lossless widening conversions, and the composite per-field struct
//! assignment that drives child kernels.
//!
//! Conversion entry points are monomorphised per `(source, destination)`
//! Rust type pair through [`AsPrimitive`], so the per-element work is one
//! load, one cast, one store. Only the pairs the lossless-assignment table
//! admits are instantiated; everything else reports
//! [`UnsupportedConversion`](crate::DynarrError::UnsupportedConversion) at
//! build time rather than failing per element.

use num_traits::AsPrimitive;

use crate::enums::call_style::CallStyle;
use crate::enums::scalar_type::ScalarType;
use crate::kernels::arena::{KernelArena, KernelEntry, KernelHandle, KernelKind};
use crate::utils::{read_scalar, write_scalar};

fn copy_single(arena: &KernelArena, handle: KernelHandle, dst: &mut [u8], srcs: &[&[u8]]) {
    let &KernelKind::ScalarAssign { width } = arena.record(handle).kind() else {
        unreachable!("copy kernel with non-copy payload");
    };
    dst[..width].copy_from_slice(&srcs[0][..width]);
}

fn copy_strided(
    arena: &KernelArena,
    handle: KernelHandle,
    dst: &mut [u8],
    dst_stride: usize,
    srcs: &[&[u8]],
    src_strides: &[usize],
    count: usize,
) {
    let &KernelKind::ScalarAssign { width } = arena.record(handle).kind() else {
        unreachable!("copy kernel with non-copy payload");
    };
    let src = srcs[0];
    let src_stride = src_strides[0];
    for i in 0..count {
        let d = i * dst_stride;
        let s = i * src_stride;
        dst[d..d + width].copy_from_slice(&src[s..s + width]);
    }
}

fn convert_single<S, D>(_: &KernelArena, _: KernelHandle, dst: &mut [u8], srcs: &[&[u8]])
where
    S: Copy + AsPrimitive<D>,
    D: Copy + 'static,
{
    write_scalar(dst, read_scalar::<S>(srcs[0]).as_());
}

fn convert_strided<S, D>(
    _: &KernelArena,
    _: KernelHandle,
    dst: &mut [u8],
    dst_stride: usize,
    srcs: &[&[u8]],
    src_strides: &[usize],
    count: usize,
) where
    S: Copy + AsPrimitive<D>,
    D: Copy + 'static,
{
    let src = srcs[0];
    let src_stride = src_strides[0];
    for i in 0..count {
        let v: D = read_scalar::<S>(&src[i * src_stride..]).as_();
        write_scalar(&mut dst[i * dst_stride..], v);
    }
}

/// Per-field assignment through child kernels.
pub(crate) fn struct_assign_single(
    arena: &KernelArena,
    handle: KernelHandle,
    dst: &mut [u8],
    srcs: &[&[u8]],
) {
    let KernelKind::StructAssign {
        dst_offsets,
        src_offsets,
        children,
        ..
    } = arena.record(handle).kind()
    else {
        unreachable!("struct assign kernel with non-struct payload");
    };
    for (i, &child) in children.iter().enumerate() {
        let field_src = &srcs[0][src_offsets[i]..];
        arena.invoke_single(child, &mut dst[dst_offsets[i]..], &[field_src]);
    }
}

pub(crate) fn struct_assign_strided(
    arena: &KernelArena,
    handle: KernelHandle,
    dst: &mut [u8],
    dst_stride: usize,
    srcs: &[&[u8]],
    src_strides: &[usize],
    count: usize,
) {
    for i in 0..count {
        let element_src = &srcs[0][i * src_strides[0]..];
        struct_assign_single(arena, handle, &mut dst[i * dst_stride..], &[element_src]);
    }
}

/// Same-type copy entry point for `style`.
pub(crate) fn copy_entry(style: CallStyle) -> KernelEntry {
    match style {
        CallStyle::Single => KernelEntry::Single(copy_single),
        CallStyle::Strided => KernelEntry::Strided(copy_strided),
    }
}

pub(crate) fn struct_assign_entry(style: CallStyle) -> KernelEntry {
    match style {
        CallStyle::Single => KernelEntry::Single(struct_assign_single),
        CallStyle::Strided => KernelEntry::Strided(struct_assign_strided),
    }
}

macro_rules! convert_table {
    ($dst:expr, $src:expr, $style:expr;
     $( ($sv:ident, $st:ty) => [ $( ($dv:ident, $dt:ty) ),+ $(,)? ] );+ $(;)?) => {
        match ($src, $dst) {
            $( $(
                (ScalarType::$sv, ScalarType::$dv) => Some(match $style {
                    CallStyle::Single => KernelEntry::Single(convert_single::<$st, $dt>),
                    CallStyle::Strided => KernelEntry::Strided(convert_strided::<$st, $dt>),
                }),
            )+ )+
            _ => None,
        }
    };
}

/// Widening-conversion entry point for the pair, or `None` when the pair
/// is not in the lossless-assignment table. Mirrors
/// [`ScalarType::losslessly_assignable_from`] exactly, identity excluded.
pub(crate) fn convert_entry(
    dst: ScalarType,
    src: ScalarType,
    style: CallStyle,
) -> Option<KernelEntry> {
    convert_table! {
        dst, src, style;
        (Int8, i8) => [(Int16, i16), (Int32, i32), (Int64, i64), (Float32, f32), (Float64, f64)];
        (Int16, i16) => [(Int32, i32), (Int64, i64), (Float32, f32), (Float64, f64)];
        (Int32, i32) => [(Int64, i64), (Float64, f64)];
        (UInt8, u8) => [
            (UInt16, u16), (UInt32, u32), (UInt64, u64),
            (Int16, i16), (Int32, i32), (Int64, i64),
            (Float32, f32), (Float64, f64),
        ];
        (UInt16, u16) => [
            (UInt32, u32), (UInt64, u64),
            (Int32, i32), (Int64, i64),
            (Float32, f32), (Float64, f64),
        ];
        (UInt32, u32) => [(UInt64, u64), (Int64, i64), (Float64, f64)];
        (Float32, f32) => [(Float64, f64)];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::arena::KernelRecord;

    fn arena_with(entry: KernelEntry, kind: KernelKind) -> (KernelArena, KernelHandle) {
        let mut arena = KernelArena::new();
        let handle = arena.append(KernelRecord { entry, kind });
        (arena, handle)
    }

    #[test]
    fn test_copy_single() {
        let (arena, h) = arena_with(
            copy_entry(CallStyle::Single),
            KernelKind::ScalarAssign { width: 4 },
        );
        let mut dst = [0u8; 4];
        let mut src = [0u8; 4];
        write_scalar(&mut src, -42i32);
        arena.invoke_single(h, &mut dst, &[&src]);
        assert_eq!(read_scalar::<i32>(&dst), -42);
    }

    #[test]
    fn test_copy_strided_respects_strides() {
        let (arena, h) = arena_with(
            copy_entry(CallStyle::Strided),
            KernelKind::ScalarAssign { width: 2 },
        );
        let mut src = [0u8; 12];
        for (i, v) in [100i16, 200, 300].iter().enumerate() {
            write_scalar(&mut src[i * 4..], *v);
        }
        let mut dst = [0u8; 6];
        // Source elements 4 bytes apart, destination packed.
        arena.invoke_strided(h, &mut dst, 2, &[&src], &[4], 3);
        assert_eq!(read_scalar::<i16>(&dst), 100);
        assert_eq!(read_scalar::<i16>(&dst[2..]), 200);
        assert_eq!(read_scalar::<i16>(&dst[4..]), 300);
    }

    #[test]
    fn test_convert_int16_to_float64() {
        let entry = convert_entry(ScalarType::Float64, ScalarType::Int16, CallStyle::Single)
            .unwrap();
        let (arena, h) = arena_with(
            entry,
            KernelKind::ScalarConvert {
                dst: ScalarType::Float64,
                src: ScalarType::Int16,
            },
        );
        let mut src = [0u8; 2];
        write_scalar(&mut src, -321i16);
        let mut dst = [0u8; 8];
        arena.invoke_single(h, &mut dst, &[&src]);
        assert_eq!(read_scalar::<f64>(&dst), -321.0);
    }

    #[test]
    fn test_convert_table_matches_lossless_table() {
        for dst in ScalarType::ALL {
            for src in ScalarType::ALL {
                let expected = dst != src && dst.losslessly_assignable_from(src);
                let got = convert_entry(dst, src, CallStyle::Single).is_some();
                assert_eq!(got, expected, "pair {src} -> {dst}");
            }
        }
    }

    #[test]
    fn test_single_entry_driven_strided() {
        // A single-style record run through the strided dispatcher.
        let (arena, h) = arena_with(
            copy_entry(CallStyle::Single),
            KernelKind::ScalarAssign { width: 1 },
        );
        let src = [7u8, 8, 9];
        let mut dst = [0u8; 3];
        arena.invoke_strided(h, &mut dst, 1, &[&src], &[1], 3);
        assert_eq!(dst, [7, 8, 9]);
    }
}
