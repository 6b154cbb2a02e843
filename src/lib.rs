//! # gpu-cluster-sim
//!
//! A deterministic placement scheduler and pipeline simulator for
//! GPU-bearing compute clusters.
//!
//! Two coupled engines make up the core:
//!
//! - **Placement Engine** ([`scheduler::schedule`]): priority-ordered,
//!   multi-resource bin-packing/spreading with GPU-type and GPU-memory
//!   affinity constraints.
//! - **Pipeline Simulation Engine** ([`sim::simulate`]): a deterministic
//!   queueing simulator that replays a staged request pipeline over a
//!   bounded-concurrency GPU, producing per-request traces and latency
//!   percentiles.
//!
//! ## Quick Start
//!
//! ```rust
//! use gpu_cluster_sim::cluster::{Cluster, Node};
//! use gpu_cluster_sim::resource::{GpuDescriptor, Resource};
//! use gpu_cluster_sim::scheduler::{schedule, Strategy};
//! use gpu_cluster_sim::workload::Pod;
//!
//! let cluster = Cluster::new(vec![Node::new(
//!     "gpu-a",
//!     Resource::new(8000, 16000, 1),
//!     GpuDescriptor {
//!         gpu_type: "A100".into(),
//!         memory_mb: 80000,
//!         count: 1,
//!         tflops: 312.0,
//!         mem_gbps: 2039.0,
//!     },
//! )]);
//! let pods = vec![Pod::new("infer", "default", 10, Resource::new(2000, 2000, 1))];
//! let (decisions, final_cluster) = schedule(&cluster, &pods, Strategy::Binpack);
//! assert_eq!(decisions[0].node, "gpu-a");
//! assert_eq!(final_cluster.nodes[0].allocated.gpus, 1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cluster;
pub mod config;
pub mod error;
pub mod metrics;
pub mod resource;
pub mod scheduler;
pub mod sim;
pub mod workload;

pub use config::{EngineConfig, EngineConfigBuilder, PlacementConfig};
pub use error::{Result, SimError};
pub use metrics::{compute_metrics, project_roofline, ClusterMetrics, RooflineResult, SimMetrics};
pub use scheduler::{schedule, schedule_with_config, Strategy};
pub use sim::{simulate, summarize, Scenario, Summary};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cluster::{Cluster, Node};
    pub use crate::config::{EngineConfig, EngineConfigBuilder};
    pub use crate::error::{Result, SimError};
    pub use crate::resource::{GpuDescriptor, Resource};
    pub use crate::scheduler::{schedule, Strategy};
    pub use crate::sim::{simulate, Scenario};
    pub use crate::workload::{Decision, Pod};
}
