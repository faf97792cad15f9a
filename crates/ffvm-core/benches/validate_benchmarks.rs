//! Benchmarks for tag compilation and record traversal
//!
//! Compares cold pipeline compilation against validation with a warm cache,
//! and measures traversal cost as sequences grow.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ffvm_core::tag::{compile_tag, parse_tag};
use ffvm_core::{record, Engine, Registry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Line {
    sku: String,
    quantity: u32,
}

record!(Line {
    sku: "upper,len=8;regex=^[A-Z0-9-]+$",
    quantity: "min=1;max=500",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Order {
    customer: String,
    status: String,
    lines: Vec<Line>,
}

record!(Order {
    customer: "lower,required;max_len=64",
    status: "lower,enum=open&paid&shipped&closed",
    lines,
});

fn create_order(lines: usize) -> Order {
    Order {
        customer: "Ada@Example.com".to_string(),
        status: "OPEN".to_string(),
        lines: (0..lines)
            .map(|i| Line {
                sku: format!("sku-{:04}", i),
                quantity: (i % 600) as u32,
            })
            .collect(),
    }
}

fn bench_tags(c: &mut Criterion) {
    let mut group = c.benchmark_group("tags");
    let registry = Registry::new();

    let tags = vec![
        "required",
        "upper,len=8",
        "upper;lower,min_len=3",
        "lower,enum=open&paid&shipped&closed",
        "upper,len=8;regex=^[A-Z0-9-]+$",
    ];

    for tag in tags {
        group.bench_with_input(BenchmarkId::new("parse", tag), tag, |b, tag| {
            b.iter(|| black_box(parse_tag(black_box(tag))))
        });
        group.bench_with_input(BenchmarkId::new("compile", tag), tag, |b, tag| {
            b.iter(|| black_box(compile_tag(black_box(tag), &registry)))
        });
    }

    group.finish();
}

fn bench_caching(c: &mut Criterion) {
    let mut group = c.benchmark_group("caching");
    let order = create_order(10);

    group.bench_function("cold_engine", |b| {
        b.iter(|| {
            let engine = Engine::with_defaults();
            let mut order = order.clone();
            black_box(engine.validate(&mut order))
        })
    });

    group.bench_function("warm_engine", |b| {
        let engine = Engine::with_defaults();
        b.iter(|| {
            let mut order = order.clone();
            black_box(engine.validate(&mut order))
        })
    });

    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");
    let engine = Engine::with_defaults();

    for size in [1usize, 100, 1000] {
        let order = create_order(size);
        group.bench_with_input(BenchmarkId::new("lines", size), &order, |b, order| {
            b.iter(|| {
                let mut order = order.clone();
                black_box(engine.validate(&mut order))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tags, bench_caching, bench_traversal);

criterion_main!(benches);
