//! Benchmarks for topology reconstruction.
//!
//! Run with: cargo bench -p mesh-topology
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-topology -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-topology -- --baseline main

#![allow(missing_docs, clippy::cast_possible_truncation, clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_topology::{
    MeshBuilder, NodeLookup, RebuildParams, auto_partition_surface, build_edges, build_faces,
    update_element_neighbors, validate_topology,
};
use mesh_types::{ElementRegistry, FeMesh, hex_block};

// =============================================================================
// Test Mesh Generation
// =============================================================================

fn test_cases() -> [(&'static str, FeMesh); 4] {
    [
        ("hex_1", hex_block(1, 1, 1)),
        ("hex_512", hex_block(8, 8, 8)),
        ("hex_4096", hex_block(16, 16, 16)),
        ("hex_13824", hex_block(24, 24, 24)),
    ]
}

/// A block split into two parts along x.
fn two_part_block(n: usize) -> FeMesh {
    let mut mesh = hex_block(n, n, n);
    for (i, el) in mesh.elements.iter_mut().enumerate() {
        el.gid = i32::from(i % n >= n / 2);
    }
    mesh
}

fn rebuilt(mut mesh: FeMesh) -> FeMesh {
    MeshBuilder::default().rebuild(&mut mesh).unwrap();
    mesh
}

// =============================================================================
// Full Rebuild Benchmarks
// =============================================================================

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("Rebuild");

    for (name, mesh) in &test_cases() {
        group.throughput(Throughput::Elements(mesh.element_count() as u64));

        group.bench_with_input(BenchmarkId::new("default", name), mesh, |b, mesh| {
            let builder = MeshBuilder::default();
            b.iter(|| {
                let mut m = mesh.clone();
                builder.rebuild(black_box(&mut m)).unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("auto_parts", name), mesh, |b, mesh| {
            let builder = MeshBuilder::default().with_params(RebuildParams::auto_parts());
            b.iter(|| {
                let mut m = mesh.clone();
                builder.rebuild(black_box(&mut m)).unwrap()
            })
        });
    }

    let parts = two_part_block(16);
    group.throughput(Throughput::Elements(parts.element_count() as u64));
    group.bench_function("two_parts_4096", |b| {
        let builder = MeshBuilder::default();
        b.iter(|| {
            let mut m = parts.clone();
            builder.rebuild(black_box(&mut m)).unwrap()
        })
    });

    group.finish();
}

// =============================================================================
// Pass Benchmarks
// =============================================================================

fn bench_passes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Passes");
    let registry = ElementRegistry::standard();

    for (name, mesh) in &test_cases() {
        group.throughput(Throughput::Elements(mesh.element_count() as u64));
        let shapes = registry.resolve(mesh).unwrap();

        group.bench_with_input(BenchmarkId::new("node_lookup", name), mesh, |b, mesh| {
            b.iter(|| NodeLookup::for_elements(black_box(mesh)))
        });

        group.bench_with_input(BenchmarkId::new("element_neighbors", name), mesh, |b, mesh| {
            let mut m = mesh.clone();
            b.iter(|| update_element_neighbors(black_box(&mut m), &shapes))
        });

        group.bench_with_input(BenchmarkId::new("build_faces", name), mesh, |b, mesh| {
            let mut m = mesh.clone();
            update_element_neighbors(&mut m, &shapes);
            b.iter(|| build_faces(black_box(&mut m), &shapes))
        });

        let derived = rebuilt(mesh.clone());
        group.bench_with_input(BenchmarkId::new("surface_and_edges", name), &derived, |b, mesh| {
            let mut m = mesh.clone();
            b.iter(|| {
                auto_partition_surface(black_box(&mut m), 60.0, true);
                build_edges(&mut m)
            })
        });

        group.bench_with_input(BenchmarkId::new("validate", name), &derived, |b, mesh| {
            b.iter(|| validate_topology(black_box(mesh)))
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_rebuild, bench_passes);
criterion_main!(benches);
