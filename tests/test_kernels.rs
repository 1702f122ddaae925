//! Integration tests for kernel building, reuse, and teardown

use std::cell::RefCell;
use std::rc::Rc;

use dynarr::{
    Array, CallStyle, DataType, DynarrError, KernelArena, KernelOp, ScalarType, broadcast_assign,
    build_kernel,
};

fn record_ty(kinds: &[(&str, ScalarType)]) -> DataType {
    DataType::record(
        kinds
            .iter()
            .map(|&(n, k)| (n, DataType::scalar(k)))
            .collect(),
    )
}

#[test]
fn test_one_kernel_many_invocations() {
    // Build once, invoke across many element pairs with varying bytes.
    let mut arena = KernelArena::new();
    let h = build_kernel(
        &mut arena,
        KernelOp::Assign,
        &DataType::scalar(ScalarType::Float64),
        &[&DataType::scalar(ScalarType::Int32)],
        CallStyle::Single,
    )
    .unwrap();
    let built = arena.len();
    for v in [0i32, -1, 7, i32::MAX, i32::MIN] {
        let src = v.to_ne_bytes();
        let mut dst = [0u8; 8];
        arena.invoke_single(h, &mut dst, &[&src]);
        assert_eq!(f64::from_ne_bytes(dst), f64::from(v));
    }
    // Reuse never appends records.
    assert_eq!(arena.len(), built);
}

#[test]
fn test_reused_kernel_matches_single_use_kernels() {
    // One long-lived kernel driven across many inputs produces exactly
    // what a fresh kernel per input produces.
    let dst_ty = DataType::scalar(ScalarType::Int64);
    let src_ty = DataType::scalar(ScalarType::UInt16);
    let mut shared = KernelArena::new();
    let reused = build_kernel(
        &mut shared,
        KernelOp::Assign,
        &dst_ty,
        &[&src_ty],
        CallStyle::Single,
    )
    .unwrap();
    for v in [0u16, 1, 500, u16::MAX] {
        let src = v.to_ne_bytes();
        let mut via_reused = [0u8; 8];
        shared.invoke_single(reused, &mut via_reused, &[&src]);

        let mut fresh_arena = KernelArena::new();
        let fresh = build_kernel(
            &mut fresh_arena,
            KernelOp::Assign,
            &dst_ty,
            &[&src_ty],
            CallStyle::Single,
        )
        .unwrap();
        let mut via_fresh = [0u8; 8];
        fresh_arena.invoke_single(fresh, &mut via_fresh, &[&src]);

        assert_eq!(via_reused, via_fresh);
        assert_eq!(i64::from_ne_bytes(via_reused), i64::from(v));
    }
}

#[test]
fn test_nested_struct_composition() {
    let inner_src = record_ty(&[("a", ScalarType::Int8), ("b", ScalarType::Int16)]);
    let inner_dst = record_ty(&[("a", ScalarType::Int32), ("b", ScalarType::Int64)]);
    let src_ty = DataType::record(vec![
        ("head", DataType::scalar(ScalarType::UInt8)),
        ("body", inner_src),
    ]);
    let dst_ty = DataType::record(vec![
        ("head", DataType::scalar(ScalarType::UInt32)),
        ("body", inner_dst),
    ]);
    let mut arena = KernelArena::new();
    let h = build_kernel(
        &mut arena,
        KernelOp::Assign,
        &dst_ty,
        &[&src_ty],
        CallStyle::Single,
    )
    .unwrap();
    // Outer struct, two children, inner struct with two more.
    assert_eq!(arena.len(), 5);
    assert_eq!(h.index(), 0);

    // src: {uint8 @0, {int8 @0, int16 @2} @2}, size 6
    let mut src = [0u8; 6];
    src[0] = 200;
    src[2] = (-5i8) as u8;
    src[4..6].copy_from_slice(&(-300i16).to_ne_bytes());
    // dst: {uint32 @0, {int32 @0, int64 @8} @8}, size 24
    let mut dst = [0u8; 24];
    arena.invoke_single(h, &mut dst, &[&src]);
    assert_eq!(u32::from_ne_bytes(dst[0..4].try_into().unwrap()), 200);
    assert_eq!(i32::from_ne_bytes(dst[8..12].try_into().unwrap()), -5);
    assert_eq!(i64::from_ne_bytes(dst[16..24].try_into().unwrap()), -300);
}

#[test]
fn test_failed_build_unwinds_to_clean_arena() {
    let src_ty = record_ty(&[
        ("a", ScalarType::Int16),
        ("b", ScalarType::Int32),
        ("c", ScalarType::Float64),
    ]);
    // Third field narrows, so the build fails after two children exist.
    let dst_ty = record_ty(&[
        ("a", ScalarType::Int32),
        ("b", ScalarType::Int64),
        ("c", ScalarType::Float32),
    ]);
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut arena = KernelArena::new();
    arena.observe_teardown(log.clone());
    let err = build_kernel(
        &mut arena,
        KernelOp::Assign,
        &dst_ty,
        &[&src_ty],
        CallStyle::Single,
    )
    .unwrap_err();
    assert!(matches!(err, DynarrError::UnsupportedConversion { .. }));
    assert!(arena.is_empty());
    // Children (1, 2) torn down before the parent (0).
    assert_eq!(*log.borrow(), vec![2, 1, 0]);

    // The arena remains usable for a fresh build.
    build_kernel(
        &mut arena,
        KernelOp::Assign,
        &DataType::scalar(ScalarType::Int64),
        &[&DataType::scalar(ScalarType::Int64)],
        CallStyle::Strided,
    )
    .unwrap();
    assert_eq!(arena.len(), 1);
}

#[test]
fn test_drop_tears_down_all_records() {
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let mut arena = KernelArena::new();
        arena.observe_teardown(log.clone());
        build_kernel(
            &mut arena,
            KernelOp::Assign,
            &record_ty(&[("x", ScalarType::Int8), ("y", ScalarType::Int8)]),
            &[&record_ty(&[("x", ScalarType::Int8), ("y", ScalarType::Int8)])],
            CallStyle::Single,
        )
        .unwrap();
    }
    assert_eq!(*log.borrow(), vec![2, 1, 0]);
}

#[test]
fn test_strided_kernel_runs_whole_rows() {
    let mut arena = KernelArena::new();
    let h = build_kernel(
        &mut arena,
        KernelOp::Assign,
        &DataType::scalar(ScalarType::Int16),
        &[&DataType::scalar(ScalarType::Int16)],
        CallStyle::Strided,
    )
    .unwrap();
    let mut src = [0u8; 8];
    for (i, v) in [5i16, 6, 7, 8].iter().enumerate() {
        src[i * 2..i * 2 + 2].copy_from_slice(&v.to_ne_bytes());
    }
    // Scatter into every other destination slot.
    let mut dst = [0u8; 16];
    arena.invoke_strided(h, &mut dst, 4, &[&src], &[2], 4);
    for (i, v) in [5i16, 6, 7, 8].iter().enumerate() {
        assert_eq!(
            i16::from_ne_bytes(dst[i * 4..i * 4 + 2].try_into().unwrap()),
            *v
        );
    }
}

#[test]
fn test_compiled_path_matches_op_layer() {
    // The op layer drives the same arena machinery end to end.
    let src = Array::from_shape_slice(&[2, 2], &[1i16, 2, 3, 4]);
    let dst = Array::zeros(&DataType::fixed_dims(
        &[2, 2],
        DataType::scalar(ScalarType::Int64),
    ))
    .unwrap();
    broadcast_assign(&dst, &src).unwrap();
    assert_eq!(dst.to_vec::<i64>(), vec![1, 2, 3, 4]);
}
