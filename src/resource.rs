//! Resource Algebra
//!
//! Typed addition, subtraction, and capacity tests over (CPU-milli,
//! MemoryMB, GPUs) vectors, plus the GPU-type/memory affinity predicate
//! used by the placement engine.

use serde::{Deserialize, Serialize};

/// A three-component non-negative integer resource vector.
///
/// Arithmetic is integer and component-wise; subtraction may yield
/// negative components (used only to compute "remaining = capacity −
/// allocated") and such a value must never be written back into a
/// [`crate::cluster::Node`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Milli-cores of CPU.
    #[serde(rename = "cpuMilli")]
    pub cpu_milli: i64,
    /// Memory in megabytes.
    #[serde(rename = "memoryMB")]
    pub memory_mb: i64,
    /// Number of GPU devices.
    pub gpus: i64,
}

impl Resource {
    /// Construct a resource vector.
    pub fn new(cpu_milli: i64, memory_mb: i64, gpus: i64) -> Self {
        Self {
            cpu_milli,
            memory_mb,
            gpus,
        }
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Resource) -> Resource {
        Resource::new(
            self.cpu_milli + other.cpu_milli,
            self.memory_mb + other.memory_mb,
            self.gpus + other.gpus,
        )
    }

    /// Component-wise difference. May be negative; callers must check
    /// before treating the result as a capacity.
    pub fn minus(&self, other: &Resource) -> Resource {
        Resource::new(
            self.cpu_milli - other.cpu_milli,
            self.memory_mb - other.memory_mb,
            self.gpus - other.gpus,
        )
    }
}

/// A GPU device descriptor attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuDescriptor {
    /// Opaque type tag, e.g. "A100".
    #[serde(rename = "type")]
    pub gpu_type: String,
    /// Per-device memory, in megabytes.
    #[serde(rename = "memoryMB")]
    pub memory_mb: i64,
    /// Number of physical devices of this type on the node.
    pub count: i64,
    /// Peak FP32 throughput, in TFLOPS.
    pub tflops: f64,
    /// Memory bandwidth, in GB/s.
    #[serde(rename = "memGBps")]
    pub mem_gbps: f64,
}

impl GpuDescriptor {
    /// A node has GPUs iff `count > 0`.
    pub fn has_gpu(&self) -> bool {
        self.count > 0
    }
}

/// `remaining = capacity − allocated`, with the GPU-aware capacity
/// predicate from spec §4.A.
pub fn remaining(capacity: &Resource, allocated: &Resource) -> Resource {
    capacity.minus(allocated)
}

/// Whether a node with the given capacity/allocation/GPU descriptor can
/// additionally accommodate `req`.
///
/// `canSchedule(node, req)` is the conjunction of CPU and memory
/// headroom plus a GPU predicate: nodes with attached GPUs are checked
/// against `gpu.count − allocated.gpus`; GPU-less nodes fall back to
/// `remaining.gpus`, which is only ever non-negative for a zero GPU
/// request.
pub fn can_schedule(
    capacity: &Resource,
    allocated: &Resource,
    gpu: &GpuDescriptor,
    req: &Resource,
) -> bool {
    let rem = remaining(capacity, allocated);
    if rem.cpu_milli < req.cpu_milli {
        return false;
    }
    if rem.memory_mb < req.memory_mb {
        return false;
    }
    if gpu.has_gpu() {
        (gpu.count - allocated.gpus) >= req.gpus
    } else {
        rem.gpus >= req.gpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpu(gpu_type: &str, memory_mb: i64, count: i64) -> GpuDescriptor {
        GpuDescriptor {
            gpu_type: gpu_type.to_string(),
            memory_mb,
            count,
            tflops: 312.0,
            mem_gbps: 2000.0,
        }
    }

    #[test]
    fn add_and_minus_are_component_wise() {
        let a = Resource::new(1000, 2000, 1);
        let b = Resource::new(500, 1000, 1);
        assert_eq!(a.add(&b), Resource::new(1500, 3000, 2));
        assert_eq!(a.minus(&b), Resource::new(500, 1000, 0));
    }

    #[test]
    fn minus_can_go_negative() {
        let a = Resource::new(100, 100, 0);
        let b = Resource::new(200, 50, 0);
        assert_eq!(a.minus(&b), Resource::new(-100, 50, 0));
    }

    #[test]
    fn can_schedule_checks_cpu_and_memory() {
        let capacity = Resource::new(8000, 16000, 0);
        let allocated = Resource::new(7000, 15000, 0);
        let no_gpu = GpuDescriptor::default();
        assert!(can_schedule(
            &capacity,
            &allocated,
            &no_gpu,
            &Resource::new(1000, 1000, 0)
        ));
        assert!(!can_schedule(
            &capacity,
            &allocated,
            &no_gpu,
            &Resource::new(1001, 1000, 0)
        ));
    }

    #[test]
    fn can_schedule_uses_gpu_count_not_remaining_gpus() {
        let capacity = Resource::new(8000, 16000, 1);
        let allocated = Resource::new(0, 0, 0);
        let g = gpu("A100", 80000, 2);
        // gpu.count=2, allocated.gpus=0 -> 2 available even though
        // capacity.gpus only tracked 1.
        assert!(can_schedule(
            &capacity,
            &allocated,
            &g,
            &Resource::new(0, 0, 2)
        ));
        assert!(!can_schedule(
            &capacity,
            &allocated,
            &g,
            &Resource::new(0, 0, 3)
        ));
    }

    #[test]
    fn gpu_less_node_rejects_any_gpu_request() {
        let capacity = Resource::new(8000, 16000, 0);
        let allocated = Resource::default();
        let no_gpu = GpuDescriptor::default();
        assert!(!can_schedule(
            &capacity,
            &allocated,
            &no_gpu,
            &Resource::new(0, 0, 1)
        ));
    }
}
