//! Metrics & Roofline Projector
//!
//! ## Table of Contents
//! - **ClusterMetrics**: pure aggregation over decisions and final cluster state
//! - **RooflineResult**: per-pod projected runtime for GPU-bound pods
//! - **SimMetrics**: ambient Prometheus export mirroring the above

use crate::cluster::Cluster;
use crate::error::Result;
use crate::workload::Decision;
use prometheus::{Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry};
use serde::{Deserialize, Serialize};

/// Pure aggregation over a scheduling run's decisions and final
/// cluster state. No floating point; counts and resource totals only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetrics {
    /// Total pods considered.
    pub total_pods: i64,
    /// Pods that received a node.
    pub scheduled_pods: i64,
    /// Pods that did not.
    pub unscheduled_pods: i64,
    /// Cluster-wide CPU capacity, in milli-cores.
    pub cpu_capacity_milli: i64,
    /// Cluster-wide allocated CPU, in milli-cores.
    pub cpu_used_milli: i64,
    /// Cluster-wide memory capacity, in megabytes.
    pub mem_capacity_mb: i64,
    /// Cluster-wide allocated memory, in megabytes.
    pub mem_used_mb: i64,
    /// Cluster-wide GPU device capacity.
    pub gpu_capacity: i64,
    /// Cluster-wide allocated GPU devices.
    pub gpu_used: i64,
}

/// Scan `decisions` and the post-placement `cluster` and aggregate
/// counts and resource totals.
pub fn compute_metrics(cluster: &Cluster, decisions: &[Decision]) -> ClusterMetrics {
    let mut m = ClusterMetrics {
        total_pods: decisions.len() as i64,
        ..Default::default()
    };

    for d in decisions {
        if d.is_scheduled() {
            m.scheduled_pods += 1;
        } else {
            m.unscheduled_pods += 1;
        }
    }

    for node in &cluster.nodes {
        m.cpu_capacity_milli += node.capacity.cpu_milli;
        m.cpu_used_milli += node.allocated.cpu_milli;
        m.mem_capacity_mb += node.capacity.memory_mb;
        m.mem_used_mb += node.allocated.memory_mb;
        m.gpu_capacity += node.gpu.count;
        m.gpu_used += node.allocated.gpus;
    }

    m
}

/// Whether a pod bound to `"memory"` or `"compute"` for a scheduled
/// decision's roofline projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    /// Memory-bandwidth-bound.
    Memory,
    /// Compute-throughput-bound.
    Compute,
}

/// The roofline projector's output for one scheduled, GPU-bound pod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RooflineResult {
    /// Pod full name (`namespace/name`).
    pub pod_name: String,
    /// Node the pod landed on.
    pub node: String,
    /// Projected wall-clock runtime, in seconds.
    pub runtime_sec: f64,
    /// Which term of the roofline model dominated.
    pub bound: Bound,
    /// Effective TFLOPS used in the compute-time term.
    pub used_tflops: f64,
    /// Effective GB/s used in the memory-time term.
    pub used_mem_gbps: f64,
    /// `simFLOPs` input.
    pub flops: f64,
    /// `simBytes` input.
    pub bytes: f64,
    /// GPU type tag of the node.
    pub gpu_type: String,
    /// GPU devices actually used by this pod (`min(requested, node.count)`).
    pub gpu_count: i64,
}

/// Project runtime for every scheduled, GPU-bound decision in
/// `decisions` against `cluster`.
///
/// A pod is projected only if it carries non-zero `sim_flops`,
/// `sim_bytes`, and `requests.gpus`, and its node has a GPU with
/// non-zero `tflops` and `mem_gbps`. All other pods are silently
/// skipped — this projector is best-effort and never fails.
pub fn project_roofline(cluster: &Cluster, decisions: &[Decision]) -> Vec<RooflineResult> {
    let mut out = Vec::new();

    for d in decisions {
        if !d.is_scheduled() {
            continue;
        }
        let Some(flops) = d.pod.sim_flops else {
            continue;
        };
        let Some(bytes) = d.pod.sim_bytes else {
            continue;
        };
        if d.pod.requests.gpus <= 0 || flops <= 0.0 || bytes <= 0.0 {
            continue;
        }
        let Some(node) = cluster.find(&d.node) else {
            continue;
        };
        if node.gpu.count <= 0 || node.gpu.tflops <= 0.0 || node.gpu.mem_gbps <= 0.0 {
            continue;
        }

        let gpus_used = d.pod.requests.gpus.min(node.gpu.count).max(1) as f64;
        let t_compute = (flops / gpus_used) / (node.gpu.tflops * 1e12);
        let t_memory = (bytes / gpus_used) / (node.gpu.mem_gbps * 1e9);
        let runtime = t_compute.max(t_memory);
        let bound = if t_memory > t_compute {
            Bound::Memory
        } else {
            Bound::Compute
        };

        out.push(RooflineResult {
            pod_name: d.pod.full_name(),
            node: d.node.clone(),
            runtime_sec: runtime,
            bound,
            used_tflops: node.gpu.tflops,
            used_mem_gbps: node.gpu.mem_gbps,
            flops,
            bytes,
            gpu_type: node.gpu.gpu_type.clone(),
            gpu_count: gpus_used as i64,
        });
    }

    out
}

/// Sum of [`RooflineResult::runtime_sec`] across a projection.
pub fn total_runtime(results: &[RooflineResult]) -> f64 {
    results.iter().map(|r| r.runtime_sec).sum()
}

/// Ambient Prometheus export mirroring [`ClusterMetrics`] and the
/// pipeline engine's [`crate::sim::scenario::Summary`], so a host
/// process can scrape scheduling and simulation outcomes the same way
/// it scrapes any other gauge-based service.
pub struct SimMetrics {
    registry: Registry,

    pods_total: Gauge,
    pods_scheduled: Gauge,
    pods_unscheduled: Gauge,
    resource_capacity: GaugeVec,
    resource_used: GaugeVec,

    sim_throughput_rps: Gauge,
    sim_latency_ms: GaugeVec,
    sim_avg_queue_ms: Gauge,
    sim_gpu_util_percent: Gauge,
    sim_request_latency: HistogramVec,
}

impl SimMetrics {
    /// Create a new metrics instance, registering all series.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let pods_total = Gauge::new("sim_pods_total", "Total pods considered")?;
        let pods_scheduled = Gauge::new("sim_pods_scheduled", "Pods that received a node")?;
        let pods_unscheduled = Gauge::new("sim_pods_unscheduled", "Pods left unscheduled")?;
        let resource_capacity = GaugeVec::new(
            Opts::new("sim_resource_capacity", "Cluster-wide resource capacity"),
            &["resource"],
        )?;
        let resource_used = GaugeVec::new(
            Opts::new("sim_resource_used", "Cluster-wide allocated resource"),
            &["resource"],
        )?;

        let sim_throughput_rps = Gauge::new("sim_throughput_rps", "Simulated throughput")?;
        let sim_latency_ms = GaugeVec::new(
            Opts::new("sim_latency_ms", "Latency percentile, in milliseconds"),
            &["quantile"],
        )?;
        let sim_avg_queue_ms = Gauge::new("sim_avg_queue_ms", "Average queue time")?;
        let sim_gpu_util_percent = Gauge::new("sim_gpu_util_percent", "GPU utilization proxy")?;
        let sim_request_latency = HistogramVec::new(
            HistogramOpts::new("sim_request_latency_seconds", "Per-request latency")
                .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["scenario"],
        )?;

        registry.register(Box::new(pods_total.clone()))?;
        registry.register(Box::new(pods_scheduled.clone()))?;
        registry.register(Box::new(pods_unscheduled.clone()))?;
        registry.register(Box::new(resource_capacity.clone()))?;
        registry.register(Box::new(resource_used.clone()))?;
        registry.register(Box::new(sim_throughput_rps.clone()))?;
        registry.register(Box::new(sim_latency_ms.clone()))?;
        registry.register(Box::new(sim_avg_queue_ms.clone()))?;
        registry.register(Box::new(sim_gpu_util_percent.clone()))?;
        registry.register(Box::new(sim_request_latency.clone()))?;

        Ok(Self {
            registry,
            pods_total,
            pods_scheduled,
            pods_unscheduled,
            resource_capacity,
            resource_used,
            sim_throughput_rps,
            sim_latency_ms,
            sim_avg_queue_ms,
            sim_gpu_util_percent,
            sim_request_latency,
        })
    }

    /// The underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a [`ClusterMetrics`] snapshot.
    pub fn record_cluster_metrics(&self, m: &ClusterMetrics) {
        self.pods_total.set(m.total_pods as f64);
        self.pods_scheduled.set(m.scheduled_pods as f64);
        self.pods_unscheduled.set(m.unscheduled_pods as f64);
        self.resource_capacity
            .with_label_values(&["cpu_milli"])
            .set(m.cpu_capacity_milli as f64);
        self.resource_used
            .with_label_values(&["cpu_milli"])
            .set(m.cpu_used_milli as f64);
        self.resource_capacity
            .with_label_values(&["memory_mb"])
            .set(m.mem_capacity_mb as f64);
        self.resource_used
            .with_label_values(&["memory_mb"])
            .set(m.mem_used_mb as f64);
        self.resource_capacity
            .with_label_values(&["gpus"])
            .set(m.gpu_capacity as f64);
        self.resource_used
            .with_label_values(&["gpus"])
            .set(m.gpu_used as f64);
    }

    /// Record a simulation [`crate::sim::scenario::Summary`].
    pub fn record_summary(&self, scenario_name: &str, summary: &crate::sim::scenario::Summary) {
        self.sim_throughput_rps.set(summary.throughput_rps);
        self.sim_latency_ms
            .with_label_values(&["p50"])
            .set(summary.p50_latency_ms);
        self.sim_latency_ms
            .with_label_values(&["p90"])
            .set(summary.p90_latency_ms);
        self.sim_latency_ms
            .with_label_values(&["p99"])
            .set(summary.p99_latency_ms);
        self.sim_avg_queue_ms.set(summary.avg_queue_ms);
        self.sim_gpu_util_percent.set(summary.gpu_util_percent);
        self.sim_request_latency
            .with_label_values(&[scenario_name])
            .observe(summary.p50_latency_ms / 1000.0);
    }

    /// Gather all registered series as Prometheus text exposition
    /// format.
    pub fn gather_text(&self) -> Result<String> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Node;
    use crate::resource::{GpuDescriptor, Resource};
    use crate::scheduler::{schedule, Strategy};
    use crate::workload::Pod;

    fn gpu_node(name: &str) -> Node {
        Node::new(
            name,
            Resource::new(8000, 16000, 2),
            GpuDescriptor {
                gpu_type: "A100".into(),
                memory_mb: 80000,
                count: 2,
                tflops: 312.0,
                mem_gbps: 2039.0,
            },
        )
    }

    #[test]
    fn compute_metrics_totals_capacity_and_usage() {
        let cluster = Cluster::new(vec![gpu_node("gpu-a")]);
        let mut pod = Pod::new("p1", "default", 1, Resource::new(2000, 2000, 1));
        pod.sim_flops = None;
        let (decisions, final_cluster) = schedule(&cluster, &[pod], Strategy::Binpack);
        let m = compute_metrics(&final_cluster, &decisions);
        assert_eq!(m.total_pods, 1);
        assert_eq!(m.scheduled_pods, 1);
        assert_eq!(m.cpu_capacity_milli, 8000);
        assert_eq!(m.cpu_used_milli, 2000);
        assert_eq!(m.gpu_capacity, 2);
        assert_eq!(m.gpu_used, 1);
    }

    #[test]
    fn roofline_skips_pods_without_sim_fields() {
        let cluster = Cluster::new(vec![gpu_node("gpu-a")]);
        let pod = Pod::new("p1", "default", 1, Resource::new(2000, 2000, 1));
        let (decisions, final_cluster) = schedule(&cluster, &[pod], Strategy::Binpack);
        let results = project_roofline(&final_cluster, &decisions);
        assert!(results.is_empty());
    }

    #[test]
    fn roofline_picks_larger_of_compute_and_memory_time() {
        let cluster = Cluster::new(vec![gpu_node("gpu-a")]);
        let mut pod = Pod::new("p1", "default", 1, Resource::new(2000, 2000, 1));
        pod.sim_flops = Some(312e12); // exactly 1 GPU-second of compute
        pod.sim_bytes = Some(1.0); // negligible memory time
        let (decisions, final_cluster) = schedule(&cluster, &[pod], Strategy::Binpack);
        let results = project_roofline(&final_cluster, &decisions);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].bound, Bound::Compute);
        assert!((results[0].runtime_sec - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sim_metrics_gather_text_includes_pod_counts() {
        let metrics = SimMetrics::new().unwrap();
        metrics.record_cluster_metrics(&ClusterMetrics {
            total_pods: 3,
            scheduled_pods: 2,
            unscheduled_pods: 1,
            ..Default::default()
        });
        let text = metrics.gather_text().unwrap();
        assert!(text.contains("sim_pods_total 3"));
        assert!(text.contains("sim_pods_scheduled 2"));
    }
}
