//! Placement and simulation benchmarks
//!
//! Compares:
//! - Binpack vs Spread placement throughput as cluster size grows
//! - Pipeline simulation throughput as request count grows

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gpu_cluster_sim::cluster::{Cluster, Node};
use gpu_cluster_sim::resource::{GpuDescriptor, Resource};
use gpu_cluster_sim::scheduler::{schedule, Strategy};
use gpu_cluster_sim::sim::{simulate, Scenario, Stage, StageKind, Target, Workload};
use gpu_cluster_sim::workload::Pod;

fn create_cluster(node_count: usize) -> Cluster {
    let nodes = (0..node_count)
        .map(|i| {
            if i % 4 == 0 {
                Node::new(
                    format!("gpu-{i}"),
                    Resource::new(16000, 65536, 4),
                    GpuDescriptor {
                        gpu_type: "A100".into(),
                        memory_mb: 80000,
                        count: 4,
                        tflops: 312.0,
                        mem_gbps: 2039.0,
                    },
                )
            } else {
                Node::new(
                    format!("cpu-{i}"),
                    Resource::new(8000, 32768, 0),
                    GpuDescriptor::default(),
                )
            }
        })
        .collect();
    Cluster::new(nodes)
}

fn create_pods(count: usize) -> Vec<Pod> {
    (0..count)
        .map(|i| {
            let gpus = if i % 5 == 0 { 1 } else { 0 };
            let mut pod = Pod::new(
                format!("pod-{i}"),
                "bench",
                (i % 10) as i64,
                Resource::new(500 + (i as i64 % 10) * 100, 512 + (i as i64 % 8) * 256, gpus),
            );
            if gpus > 0 {
                pod.gpu_type = Some("A100".into());
            }
            pod
        })
        .collect()
}

fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    for node_count in [10, 50, 200] {
        let cluster = create_cluster(node_count);
        let pods = create_pods(node_count * 5);

        group.bench_with_input(
            BenchmarkId::new("binpack", node_count),
            &(cluster.clone(), pods.clone()),
            |b, (cluster, pods)| {
                b.iter(|| black_box(schedule(cluster, pods, Strategy::Binpack)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("spread", node_count),
            &(cluster, pods),
            |b, (cluster, pods)| {
                b.iter(|| black_box(schedule(cluster, pods, Strategy::Spread)));
            },
        );
    }
    group.finish();
}

fn create_scenario(rps: f64, duration_s: f64) -> Scenario {
    Scenario {
        name: "bench".into(),
        workload: Workload {
            name: "w".into(),
            rps,
            duration_s,
            batch_size: 1,
            jitter_pct: 10.0,
        },
        pipeline: vec![
            Stage {
                name: "pre".into(),
                kind: StageKind::FixedMs,
                value: 1.0,
            },
            Stage {
                name: "h2d".into(),
                kind: StageKind::Bytes,
                value: 2_000_000.0,
            },
            Stage {
                name: "compute".into(),
                kind: StageKind::Tokens,
                value: 100.0,
            },
            Stage {
                name: "d2h".into(),
                kind: StageKind::Bytes,
                value: 2_000_000.0,
            },
        ],
        target: Target {
            name: "A100".into(),
            tflops: 312.0,
            mem_gbps: 2039.0,
            ms_per_token: 1.0,
            h2d_gbps: 25.0,
            d2h_gbps: 25.0,
            concurrency: 8,
        },
    }
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    for rps in [10.0, 100.0, 1000.0] {
        let scenario = create_scenario(rps, 5.0);
        group.bench_with_input(BenchmarkId::new("simulate", rps as u64), &scenario, |b, s| {
            b.iter(|| black_box(simulate(s, 42).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_placement, bench_simulation);
criterion_main!(benches);
