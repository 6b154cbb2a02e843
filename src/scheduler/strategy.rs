//! Placement strategies
//!
//! Binpack and Spread share the eligibility filter pipeline in
//! [`super::schedule`] and differ only in score sign and tie-break, so
//! they are expressed here as a tagged choice rather than as
//! implementations of a trait.

use crate::cluster::Node;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};

/// Large weight applied to GPU count in the scalar placement score, so
/// that GPU fragmentation dominates CPU/memory fragmentation.
pub const GPU_SCORE_WEIGHT: i64 = 1_000_000;

/// A placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Prefer the node with the smallest remaining resource after
    /// hypothetical placement, concentrating load.
    Binpack,
    /// Prefer the node with the largest remaining resource after
    /// hypothetical placement, spreading load.
    Spread,
}

/// Scalar score for a node's remaining resource: `cpuMilli + memoryMB +
/// K·gpus`, using the default weight [`GPU_SCORE_WEIGHT`].
pub fn score(remaining: &Resource) -> i64 {
    score_weighted(remaining, GPU_SCORE_WEIGHT)
}

/// Scalar score for a node's remaining resource with an explicit GPU
/// weight `K`, as exposed through [`crate::config::PlacementConfig::gpu_weight`].
pub fn score_weighted(remaining: &Resource, gpu_weight: i64) -> i64 {
    remaining.cpu_milli + remaining.memory_mb + gpu_weight * remaining.gpus
}

/// Remaining resource on `node` after hypothetically placing `req`.
fn remaining_after(node: &Node, req: &Resource) -> Resource {
    node.remaining().minus(req)
}

impl Strategy {
    /// Pick the best node among `candidates` (indices into the
    /// cluster's node list, already filtered for eligibility) for
    /// placing `req`, using the default GPU score weight.
    ///
    /// Ties are broken by the first-listed candidate, which preserves
    /// cluster order since `candidates` is expected to already be
    /// sorted by the GPU-preference rule and original index.
    pub fn pick(&self, nodes: &[Node], candidates: &[usize], req: &Resource) -> Option<usize> {
        self.pick_weighted(nodes, candidates, req, GPU_SCORE_WEIGHT)
    }

    /// Same as [`Strategy::pick`], with an explicit GPU score weight.
    pub fn pick_weighted(
        &self,
        nodes: &[Node],
        candidates: &[usize],
        req: &Resource,
        gpu_weight: i64,
    ) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for &idx in candidates {
            let s = score_weighted(&remaining_after(&nodes[idx], req), gpu_weight);
            let better = match best {
                None => true,
                Some((_, best_score)) => match self {
                    Strategy::Binpack => s < best_score,
                    Strategy::Spread => s > best_score,
                },
            };
            if better {
                best = Some((idx, s));
            }
        }
        best.map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::GpuDescriptor;

    fn node(name: &str, cpu: i64, mem: i64) -> Node {
        Node::new(name, Resource::new(cpu, mem, 0), GpuDescriptor::default())
    }

    #[test]
    fn binpack_prefers_smallest_remaining() {
        let nodes = vec![node("a", 8000, 16000), node("b", 2000, 4000)];
        let picked = Strategy::Binpack
            .pick(&nodes, &[0, 1], &Resource::new(0, 0, 0))
            .unwrap();
        assert_eq!(nodes[picked].name, "b");
    }

    #[test]
    fn spread_prefers_largest_remaining() {
        let nodes = vec![node("a", 8000, 16000), node("b", 2000, 4000)];
        let picked = Strategy::Spread
            .pick(&nodes, &[0, 1], &Resource::new(0, 0, 0))
            .unwrap();
        assert_eq!(nodes[picked].name, "a");
    }

    #[test]
    fn ties_break_by_candidate_order() {
        let nodes = vec![node("a", 1000, 1000), node("b", 1000, 1000)];
        let picked = Strategy::Binpack
            .pick(&nodes, &[0, 1], &Resource::new(0, 0, 0))
            .unwrap();
        assert_eq!(nodes[picked].name, "a");
    }
}
