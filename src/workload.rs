//! Pod and Decision data model
//!
//! A `Pod` is a unit of workload carrying a resource request, an
//! optional GPU affinity, and optional roofline hints. A `Decision` is
//! the placement engine's per-pod output.

use crate::resource::Resource;
use serde::{Deserialize, Serialize};

/// A schedulable unit of workload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pod {
    /// Pod name, unique within its namespace.
    pub name: String,
    /// Namespace.
    pub namespace: String,
    /// Scheduling priority; higher values are placed earlier.
    pub priority: i64,
    /// Requested resources.
    pub requests: Resource,
    /// Required GPU type tag, if any.
    #[serde(rename = "gpuType", default, skip_serializing_if = "Option::is_none")]
    pub gpu_type: Option<String>,
    /// Minimum required per-device GPU memory, in megabytes.
    #[serde(rename = "gpuMemMB", default)]
    pub gpu_mem_mb: i64,
    /// Roofline hint: floating point operations this pod will perform.
    #[serde(rename = "simFLOPs", default, skip_serializing_if = "Option::is_none")]
    pub sim_flops: Option<f64>,
    /// Roofline hint: bytes this pod will move.
    #[serde(rename = "simBytes", default, skip_serializing_if = "Option::is_none")]
    pub sim_bytes: Option<f64>,
}

impl Pod {
    /// Construct a pod with the given name, namespace, priority, and
    /// request; all optional fields are left unset.
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        priority: i64,
        requests: Resource,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            priority,
            requests,
            gpu_type: None,
            gpu_mem_mb: 0,
            sim_flops: None,
            sim_bytes: None,
        }
    }

    /// `namespace/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// The placement engine's per-pod output.
///
/// Exactly one `Decision` is produced per input pod, in placement
/// order (priority-sorted). `node` is empty when the pod could not be
/// scheduled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// The pod this decision covers.
    pub pod: Pod,
    /// Node the pod was placed on, or an empty string if unscheduled.
    pub node: String,
    /// Human-readable placement reason.
    pub reason: String,
}

impl Decision {
    /// A successful placement.
    pub fn scheduled(pod: Pod, node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pod,
            node: node.into(),
            reason: reason.into(),
        }
    }

    /// A failed placement.
    pub fn unscheduled(pod: Pod, reason: impl Into<String>) -> Self {
        Self {
            pod,
            node: String::new(),
            reason: reason.into(),
        }
    }

    /// Whether this pod was placed.
    pub fn is_scheduled(&self) -> bool {
        !self.node.is_empty()
    }
}
