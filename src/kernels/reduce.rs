//! # Reduction Kernels Module
//!
//! Accumulating combine step for reductions: `dst += src`, with the
//! destination doubling as the accumulator. The caller seeds the
//! destination with the reduction identity (zero for sums) before driving
//! the kernel across the reduced elements.

use num_traits::NumAssign;

use crate::enums::call_style::CallStyle;
use crate::enums::scalar_type::ScalarType;
use crate::kernels::arena::{KernelArena, KernelEntry, KernelHandle};
use crate::utils::{read_scalar, write_scalar};

fn sum_single<T: Copy + NumAssign>(
    _: &KernelArena,
    _: KernelHandle,
    dst: &mut [u8],
    srcs: &[&[u8]],
) {
    let mut acc = read_scalar::<T>(dst);
    acc += read_scalar::<T>(srcs[0]);
    write_scalar(dst, acc);
}

fn sum_strided<T: Copy + NumAssign>(
    _: &KernelArena,
    _: KernelHandle,
    dst: &mut [u8],
    dst_stride: usize,
    srcs: &[&[u8]],
    src_strides: &[usize],
    count: usize,
) {
    for i in 0..count {
        let d = &mut dst[i * dst_stride..];
        let mut acc = read_scalar::<T>(d);
        acc += read_scalar::<T>(&srcs[0][i * src_strides[0]..]);
        write_scalar(d, acc);
    }
}

/// Accumulating-sum entry point for `ty`, or `None` for non-numeric types.
pub(crate) fn sum_entry(ty: ScalarType, style: CallStyle) -> Option<KernelEntry> {
    macro_rules! entry {
        ($t:ty) => {
            Some(match style {
                CallStyle::Single => KernelEntry::Single(sum_single::<$t>),
                CallStyle::Strided => KernelEntry::Strided(sum_strided::<$t>),
            })
        };
    }
    match ty {
        ScalarType::Bool => None,
        ScalarType::Int8 => entry!(i8),
        ScalarType::Int16 => entry!(i16),
        ScalarType::Int32 => entry!(i32),
        ScalarType::Int64 => entry!(i64),
        ScalarType::UInt8 => entry!(u8),
        ScalarType::UInt16 => entry!(u16),
        ScalarType::UInt32 => entry!(u32),
        ScalarType::UInt64 => entry!(u64),
        ScalarType::Float32 => entry!(f32),
        ScalarType::Float64 => entry!(f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::arena::{KernelKind, KernelRecord};

    #[test]
    fn test_sum_accumulates_into_destination() {
        let mut arena = KernelArena::new();
        let h = arena.append(KernelRecord {
            entry: sum_entry(ScalarType::Int32, CallStyle::Single).unwrap(),
            kind: KernelKind::ScalarSum {
                ty: ScalarType::Int32,
            },
        });
        let mut dst = [0u8; 4];
        for v in [1i32, -2, 12] {
            let mut src = [0u8; 4];
            write_scalar(&mut src, v);
            arena.invoke_single(h, &mut dst, &[&src]);
        }
        assert_eq!(read_scalar::<i32>(&dst), 11);
    }

    #[test]
    fn test_sum_strided_zero_dst_stride_reduces() {
        // Zero destination stride folds a whole run into one accumulator.
        let mut arena = KernelArena::new();
        let h = arena.append(KernelRecord {
            entry: sum_entry(ScalarType::Float64, CallStyle::Strided).unwrap(),
            kind: KernelKind::ScalarSum {
                ty: ScalarType::Float64,
            },
        });
        let mut src = [0u8; 24];
        for (i, v) in [1.25f64, -2.5, 12.125].iter().enumerate() {
            write_scalar(&mut src[i * 8..], *v);
        }
        let mut dst = [0u8; 8];
        arena.invoke_strided(h, &mut dst, 0, &[&src], &[8], 3);
        assert_eq!(read_scalar::<f64>(&dst), 10.875);
    }

    #[test]
    fn test_bool_has_no_sum() {
        assert!(sum_entry(ScalarType::Bool, CallStyle::Single).is_none());
    }
}
