//! Integration tests for shape resolution and broadcast assignment

use dynarr::{
    Array, DataType, DynarrError, ScalarType, broadcast_assign, resolve_broadcast_shape,
    shape_can_broadcast,
};

#[test]
fn test_resolve_matrix_row_and_column() {
    let out = resolve_broadcast_shape(&[&[2, 3], &[3], &[2, 1]]).unwrap();
    assert_eq!(out.shape, vec![2, 3]);
    assert_eq!(out.itersize(), 6);
}

#[test]
fn test_resolve_reports_conflicting_pair() {
    let err = resolve_broadcast_shape(&[&[2, 3], &[4]]).unwrap_err();
    assert_eq!(
        err,
        DynarrError::BroadcastIncompatibleShapes {
            lhs: vec![2, 3],
            rhs: vec![4],
        }
    );
    let msg = err.to_string();
    assert!(msg.contains("(2, 3)"));
    assert!(msg.contains("(4,)"));
}

#[test]
fn test_column_broadcasts_across_matrix() {
    let dst = Array::zeros(&DataType::fixed_dims(
        &[2, 3],
        DataType::scalar(ScalarType::Int32),
    ))
    .unwrap();
    let col = Array::from_shape_slice(&[2, 1], &[10i32, 20]);
    broadcast_assign(&dst, &col).unwrap();
    assert_eq!(dst.to_vec::<i32>(), vec![10, 10, 10, 20, 20, 20]);
}

#[test]
fn test_row_then_scalar_overwrite() {
    let dst = Array::zeros(&DataType::fixed_dims(
        &[2, 2],
        DataType::scalar(ScalarType::Float64),
    ))
    .unwrap();
    broadcast_assign(&dst, &Array::from_slice(&[1.0f64, 2.0])).unwrap();
    assert_eq!(dst.to_vec::<f64>(), vec![1.0, 2.0, 1.0, 2.0]);
    broadcast_assign(&dst, &Array::scalar(-3.5f64)).unwrap();
    assert_eq!(dst.to_vec::<f64>(), vec![-3.5; 4]);
}

#[test]
fn test_destination_shape_is_fixed() {
    // The destination never grows to meet the source.
    let dst = Array::from_slice(&[0i32, 0, 0]);
    let src = Array::from_shape_slice(&[2, 3], &[1i32, 2, 3, 4, 5, 6]);
    assert!(!shape_can_broadcast(&dst.shape(), &src.shape()));
    let err = broadcast_assign(&dst, &src).unwrap_err();
    assert!(matches!(
        err,
        DynarrError::BroadcastIncompatibleShapes { .. }
    ));
}

#[test]
fn test_zero_size_destination_is_a_noop() {
    let dst = Array::from_shape_slice::<i64>(&[0, 3], &[]);
    broadcast_assign(&dst, &Array::scalar(5i64)).unwrap();
    assert_eq!(dst.to_vec::<i64>(), Vec::<i64>::new());
}

#[test]
fn test_mixed_width_struct_assignment() {
    let src_ty = DataType::record(vec![
        ("id", DataType::scalar(ScalarType::UInt16)),
        ("score", DataType::scalar(ScalarType::Float32)),
    ]);
    let dst_ty = DataType::record(vec![
        ("id", DataType::scalar(ScalarType::Int64)),
        ("score", DataType::scalar(ScalarType::Float64)),
    ]);
    let src = Array::zeros(&DataType::fixed_dim(2, src_ty)).unwrap();
    let dst = Array::zeros(&DataType::fixed_dim(2, dst_ty)).unwrap();
    // Hand-write the source elements: {uint16 @0, float32 @4}, size 8.
    {
        let mut bytes = src.block().bytes_mut();
        bytes[0..2].copy_from_slice(&7u16.to_le_bytes());
        bytes[4..8].copy_from_slice(&1.5f32.to_le_bytes());
        bytes[8..10].copy_from_slice(&9u16.to_le_bytes());
        bytes[12..16].copy_from_slice(&(-2.0f32).to_le_bytes());
    }
    broadcast_assign(&dst, &src).unwrap();
    // Destination layout: {int64 @0, float64 @8}, size 16.
    let bytes = dst.block().bytes();
    assert_eq!(i64::from_le_bytes(bytes[0..8].try_into().unwrap()), 7);
    assert_eq!(f64::from_le_bytes(bytes[8..16].try_into().unwrap()), 1.5);
    assert_eq!(i64::from_le_bytes(bytes[16..24].try_into().unwrap()), 9);
    assert_eq!(f64::from_le_bytes(bytes[24..32].try_into().unwrap()), -2.0);
}
