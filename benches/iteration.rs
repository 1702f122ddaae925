//! Criterion benchmarks for the build-then-iterate execution path:
//! broadcast assignment at several shapes, and full/axis reductions.
//!
//! Run with:
//!     cargo bench --bench iteration

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use dynarr::{Array, DataType, ScalarType, broadcast_assign, sum};

const ROWS: usize = 1_000;
const COLS: usize = 64;

fn matrix_f64() -> Array {
    let values: Vec<f64> = (0..ROWS * COLS).map(|i| i as f64 * 0.5).collect();
    Array::from_shape_slice(&[ROWS, COLS], &values)
}

fn bench_broadcast_assign(c: &mut Criterion) {
    let src = matrix_f64();
    let dst = Array::zeros(src.dtype()).unwrap();
    c.bench_function("assign_same_shape_f64", |b| {
        b.iter(|| broadcast_assign(black_box(&dst), black_box(&src)).unwrap())
    });

    let row: Vec<f64> = (0..COLS).map(|i| i as f64).collect();
    let row = Array::from_slice(&row);
    c.bench_function("assign_broadcast_row_f64", |b| {
        b.iter(|| broadcast_assign(black_box(&dst), black_box(&row)).unwrap())
    });

    let narrow: Vec<i32> = (0..ROWS * COLS).map(|i| i as i32).collect();
    let narrow = Array::from_shape_slice(&[ROWS, COLS], &narrow);
    let wide = Array::zeros(&DataType::fixed_dims(
        &[ROWS, COLS],
        DataType::scalar(ScalarType::Int64),
    ))
    .unwrap();
    c.bench_function("assign_widening_i32_to_i64", |b| {
        b.iter(|| broadcast_assign(black_box(&wide), black_box(&narrow)).unwrap())
    });
}

fn bench_sum(c: &mut Criterion) {
    let src = matrix_f64();
    c.bench_function("sum_all_axes_f64", |b| {
        b.iter(|| black_box(sum(black_box(&src), &[0, 1]).unwrap()))
    });
    c.bench_function("sum_inner_axis_f64", |b| {
        b.iter(|| black_box(sum(black_box(&src), &[1]).unwrap()))
    });
}

criterion_group!(benches, bench_broadcast_assign, bench_sum);
criterion_main!(benches);
