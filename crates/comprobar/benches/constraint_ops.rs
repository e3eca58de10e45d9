//! Constraint Operations Benchmarks
//!
//! Benchmarks for constraint evaluation, collection equivalence, and
//! failure-message rendering.
//!
//! Run with: `cargo bench --bench constraint_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use comprobar::diff::{clip_expected_and_actual, find_mismatch_position};
use comprobar::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_equality(c: &mut Criterion) {
    let mut group = c.benchmark_group("equality");

    let cases: Vec<(&str, Value, Value)> = vec![
        ("int", Value::from(42), Value::from(42i64)),
        ("float_tolerance", Value::from(1.0), Value::from(1.000_01)),
        ("string", Value::from("Hello World"), Value::from("Hello World")),
        (
            "list_100",
            Value::from((0..100).collect::<Vec<i32>>()),
            Value::from((0..100).collect::<Vec<i32>>()),
        ),
    ];

    for (name, expected, actual) in cases {
        let constraint: Constraint = Is::equal_to(expected).within(0.001).into();
        group.bench_with_input(BenchmarkId::from_parameter(name), &actual, |bench, a| {
            bench.iter(|| black_box(constraint.matches(black_box(a))));
        });
    }

    group.finish();
}

fn bench_equivalence(c: &mut Criterion) {
    let mut group = c.benchmark_group("equivalence");

    for size in [10usize, 100, 500] {
        let expected: Vec<i32> = (0..size as i32).collect();
        let actual = Value::from(expected.iter().rev().copied().collect::<Vec<i32>>());
        let constraint: Constraint = Is::equivalent_to(expected).into();
        group.bench_with_input(BenchmarkId::from_parameter(size), &actual, |bench, a| {
            bench.iter(|| black_box(constraint.matches(black_box(a))));
        });
    }

    group.finish();
}

fn bench_message_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_rendering");

    let long_expected = "x".repeat(500);
    let long_actual = format!("{}y{}", "x".repeat(250), "x".repeat(249));

    group.bench_function("string_clip", |bench| {
        bench.iter(|| {
            let err = Assert::that(
                black_box(long_actual.as_str()),
                Is::equal_to(long_expected.as_str()),
            );
            black_box(err.is_err());
        });
    });

    group.bench_function("nested_lists", |bench| {
        let expected = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let actual = vec![vec![1, 2, 3], vec![4, 0, 6]];
        bench.iter(|| {
            let err = Assert::that(black_box(actual.clone()), Is::equal_to(expected.clone()));
            black_box(err.is_err());
        });
    });

    group.finish();
}

fn bench_diff_utilities(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");

    let expected = "a".repeat(1000);
    let actual = format!("{}b", "a".repeat(999));

    group.bench_function("find_mismatch", |bench| {
        bench.iter(|| black_box(find_mismatch_position(&expected, &actual, 0, false)));
    });

    group.bench_function("clip", |bench| {
        bench.iter(|| black_box(clip_expected_and_actual(&expected, &actual, 64, 999)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_equality,
    bench_equivalence,
    bench_message_rendering,
    bench_diff_utilities
);
criterion_main!(benches);
