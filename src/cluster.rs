//! Cluster State
//!
//! A mutable collection of nodes with capacity, allocations, and
//! attached GPU descriptors. `Cluster` supports cloning so the
//! placement engine never mutates the caller's input.

use crate::resource::{can_schedule, remaining, GpuDescriptor, Resource};
use serde::{Deserialize, Serialize};

/// A single machine: capacity, an optional GPU descriptor, and the
/// resources currently allocated to placed pods.
///
/// Invariant: `0 ≤ allocated ≤ capacity` component-wise, and
/// `allocated.gpus ≤ gpu.count` whenever the node has GPUs. Node names
/// are unique within a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node name.
    pub name: String,
    /// Total resource capacity.
    pub capacity: Resource,
    /// GPU descriptor. Absent GPUs are represented by a zero `count`.
    #[serde(default)]
    pub gpu: GpuDescriptor,
    /// Resources currently allocated to placed pods.
    #[serde(default)]
    pub allocated: Resource,
}

impl Node {
    /// Construct a node with zero allocation.
    pub fn new(name: impl Into<String>, capacity: Resource, gpu: GpuDescriptor) -> Self {
        Self {
            name: name.into(),
            capacity,
            gpu,
            allocated: Resource::default(),
        }
    }

    /// `capacity − allocated`.
    pub fn remaining(&self) -> Resource {
        remaining(&self.capacity, &self.allocated)
    }

    /// Whether this node can additionally accommodate `req`.
    pub fn can_schedule(&self, req: &Resource) -> bool {
        can_schedule(&self.capacity, &self.allocated, &self.gpu, req)
    }

    /// Whether this node has any attached GPUs.
    pub fn has_gpu(&self) -> bool {
        self.gpu.has_gpu()
    }

    /// Increment `allocated` by `req`. Callers must have already
    /// verified [`Node::can_schedule`]; this method does not check.
    pub fn allocate(&mut self, req: &Resource) {
        self.allocated = self.allocated.add(req);
    }
}

/// An ordered sequence of [`Node`]s.
///
/// Order is preserved across [`Cluster::clone`] and through scheduling;
/// tie-breaks among equally-scoring nodes during placement use this
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Nodes, in cluster order.
    pub nodes: Vec<Node>,
}

impl Cluster {
    /// Construct a cluster from an ordered node list.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Look up a node by name.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Whether any node in the cluster has attached GPUs.
    pub fn has_any_gpu_node(&self) -> bool {
        self.nodes.iter().any(|n| n.has_gpu())
    }
}
