//! Placement Engine
//!
//! A priority-ordered, multi-resource bin-packing/spreading scheduler
//! with GPU-type and GPU-memory affinity constraints.

pub mod strategy;

pub use strategy::Strategy;

use crate::cluster::Cluster;
use crate::config::EngineConfig;
use crate::scheduler::strategy::GPU_SCORE_WEIGHT;
use crate::workload::{Decision, Pod};
use tracing::{debug, info};

const REASON_NO_GPU_NODES: &str = "no GPU nodes available";
const REASON_INSUFFICIENT_CAPACITY: &str = "insufficient capacity";

/// Why a candidate node was rejected for a pod, used only to compute
/// the final unscheduled reason once every node has been tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    NoGpu,
    Capacity,
}

/// Place `pods` onto a clone of `cluster` using `strategy`.
///
/// Pods are placed in descending priority order, stable with respect
/// to input order on ties. Returns one [`Decision`] per input pod, in
/// placement order, plus the mutated cluster clone.
pub fn schedule(cluster: &Cluster, pods: &[Pod], strategy: Strategy) -> (Vec<Decision>, Cluster) {
    schedule_with_weight(cluster, pods, strategy, GPU_SCORE_WEIGHT)
}

/// Same public operation as [`schedule`], but driven by an
/// [`EngineConfig`] so callers can override the GPU score weight `K`
/// (see [`crate::config::PlacementConfig::gpu_weight`]) instead of
/// scattering the magic number across call sites. `config.placement.strategy`
/// is used in place of an explicit `Strategy` argument.
pub fn schedule_with_config(
    cluster: &Cluster,
    pods: &[Pod],
    config: &EngineConfig,
) -> (Vec<Decision>, Cluster) {
    schedule_with_weight(
        cluster,
        pods,
        config.placement.strategy,
        config.placement.gpu_weight,
    )
}

fn schedule_with_weight(
    cluster: &Cluster,
    pods: &[Pod],
    strategy: Strategy,
    gpu_weight: i64,
) -> (Vec<Decision>, Cluster) {
    let mut working = cluster.clone();
    let cluster_has_gpu = working.has_any_gpu_node();

    let mut order: Vec<usize> = (0..pods.len()).collect();
    order.sort_by(|&a, &b| pods[b].priority.cmp(&pods[a].priority).then(a.cmp(&b)));

    let mut decisions = Vec::with_capacity(pods.len());

    for idx in order {
        let pod = &pods[idx];
        let decision = place_one(&mut working, pod, strategy, cluster_has_gpu, gpu_weight);
        if decision.is_scheduled() {
            info!(pod = %pod.full_name(), node = %decision.node, "pod scheduled");
        } else {
            debug!(pod = %pod.full_name(), reason = %decision.reason, "pod unscheduled");
        }
        decisions.push(decision);
    }

    (decisions, working)
}

fn place_one(
    cluster: &mut Cluster,
    pod: &Pod,
    strategy: Strategy,
    cluster_has_gpu: bool,
    gpu_weight: i64,
) -> Decision {
    if pod.requests.gpus > 0 && !cluster_has_gpu {
        return Decision::unscheduled(pod.clone(), REASON_NO_GPU_NODES);
    }

    let mut eligible = Vec::new();
    let mut worst_rejection: Option<Rejection> = None;

    for (i, node) in cluster.nodes.iter().enumerate() {
        if let Some(rejection) = reject_reason(node, pod) {
            worst_rejection = Some(match worst_rejection {
                None => rejection,
                Some(prev) => worse(prev, rejection),
            });
            continue;
        }
        eligible.push(i);
    }

    if eligible.is_empty() {
        let reason = match worst_rejection {
            Some(Rejection::NoGpu) => REASON_NO_GPU_NODES,
            _ => REASON_INSUFFICIENT_CAPACITY,
        };
        return Decision::unscheduled(pod.clone(), reason);
    }

    // GPU-preference rule: when the pod doesn't request GPUs, restrict
    // scoring to the non-GPU nodes whenever at least one is eligible,
    // so GPU capacity is preserved for pods that actually need it.
    // A sort-based tie-break would only apply on exact score ties,
    // which binpack in particular almost never produces (a GPU node's
    // large remaining-GPU term usually dominates), so this must
    // partition the candidate set, not merely reorder it.
    if pod.requests.gpus == 0 {
        let non_gpu: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|&i| !cluster.nodes[i].has_gpu())
            .collect();
        if !non_gpu.is_empty() {
            eligible = non_gpu;
        }
    }

    let chosen = strategy
        .pick_weighted(&cluster.nodes, &eligible, &pod.requests, gpu_weight)
        .expect("eligible list is non-empty");

    cluster.nodes[chosen].allocate(&pod.requests);
    let node_name = cluster.nodes[chosen].name.clone();
    Decision::scheduled(pod.clone(), node_name, "placed")
}

/// First eligibility-filter failure for `pod` against `node`, applied
/// in the order spec'd: GPU presence, GPU type, GPU memory, capacity.
fn reject_reason(node: &crate::cluster::Node, pod: &Pod) -> Option<Rejection> {
    if pod.requests.gpus > 0 && !node.has_gpu() {
        return Some(Rejection::NoGpu);
    }
    if let Some(gpu_type) = &pod.gpu_type {
        if &node.gpu.gpu_type != gpu_type {
            return Some(Rejection::Capacity);
        }
    }
    if pod.gpu_mem_mb > 0 && node.gpu.memory_mb < pod.gpu_mem_mb {
        return Some(Rejection::Capacity);
    }
    if !node.can_schedule(&pod.requests) {
        return Some(Rejection::Capacity);
    }
    None
}

/// The cluster-wide unscheduled reason takes `NoGpu` over any other
/// rejection kind only when every node in the cluster rejected the
/// pod for lacking a GPU.
fn worse(a: Rejection, b: Rejection) -> Rejection {
    if a == Rejection::NoGpu && b == Rejection::NoGpu {
        Rejection::NoGpu
    } else {
        Rejection::Capacity
    }
}
