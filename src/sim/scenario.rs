//! Scenario data model and validation
//!
//! A `Scenario` bundles a `Workload` (arrival rate, duration, jitter),
//! a `Pipeline` (ordered stages), and a `Target` GPU profile. Together
//! they are the sole input to [`crate::sim::engine::simulate`].

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// The kind of work a [`Stage`] performs, which determines its
/// duration formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// A fixed duration in milliseconds, independent of the target.
    FixedMs,
    /// A byte transfer, timed against the target's bandwidth fields.
    Bytes,
    /// A token-generation step, timed against the target's per-token
    /// cost or TFLOPS.
    Tokens,
}

/// One segment of a request's pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Stage name; also used to select bandwidth/category by
    /// substring match (see [`crate::sim::engine`]).
    pub name: String,
    /// Stage kind.
    pub kind: StageKind,
    /// Magnitude: milliseconds, bytes, or tokens depending on `kind`.
    pub value: f64,
}

/// Request arrival and batching parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    /// Workload name.
    pub name: String,
    /// Requests per second.
    pub rps: f64,
    /// Simulated duration, in seconds.
    pub duration_s: f64,
    /// Batch size (recorded; does not affect request count in this
    /// engine's current model).
    pub batch_size: i64,
    /// Multiplicative jitter percentage applied to arrivals and stage
    /// durations, in `[0, 100]`.
    pub jitter_pct: f64,
}

/// A GPU profile that stages are timed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Profile name, e.g. "A100-80GB".
    pub name: String,
    /// Peak FP32 throughput, in TFLOPS.
    pub tflops: f64,
    /// Memory bandwidth, in GB/s.
    pub mem_gbps: f64,
    /// Per-token cost, in milliseconds. Zero means "derive from
    /// TFLOPS instead".
    pub ms_per_token: f64,
    /// Host-to-device bandwidth, in GB/s.
    pub h2d_gbps: f64,
    /// Device-to-host bandwidth, in GB/s.
    pub d2h_gbps: f64,
    /// Number of abstract compute lanes available concurrently.
    pub concurrency: i64,
}

/// A complete pipeline simulation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Arrival/duration/jitter parameters.
    pub workload: Workload,
    /// Ordered, non-empty sequence of stages.
    pub pipeline: Vec<Stage>,
    /// Target GPU profile.
    pub target: Target,
}

/// Aggregate statistics over a completed simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// `totalRequests / max(duration_s, 1)`.
    pub throughput_rps: f64,
    /// 50th percentile latency, in milliseconds.
    pub p50_latency_ms: f64,
    /// 90th percentile latency, in milliseconds.
    pub p90_latency_ms: f64,
    /// 99th percentile latency, in milliseconds.
    pub p99_latency_ms: f64,
    /// Mean queue time across all requests, in milliseconds.
    pub avg_queue_ms: f64,
    /// `min(100, throughput * 100 / concurrency)`, a coarse proxy (see
    /// design notes — a future revision should track compute busy
    /// time directly instead).
    pub gpu_util_percent: f64,
    /// Number of simulated requests.
    pub total_requests: i64,
    /// Simulated duration, in seconds, as given on the workload.
    pub duration_s: f64,
}

/// Validate a [`Scenario`] against the invariants in the data model.
/// A scenario that passes this check cannot crash the simulation
/// engine; all divide-by-zero and empty-collection paths are
/// rejected here.
pub fn validate_scenario(s: &Scenario) -> Result<()> {
    validate_workload(&s.workload)?;
    if s.pipeline.is_empty() {
        return Err(SimError::invalid("pipeline must not be empty"));
    }
    for stage in &s.pipeline {
        validate_stage(stage)?;
    }
    validate_target(&s.target)?;
    Ok(())
}

fn validate_workload(w: &Workload) -> Result<()> {
    if w.rps <= 0.0 {
        return Err(SimError::invalid("workload.rps must be > 0"));
    }
    if w.duration_s < 1.0 {
        return Err(SimError::invalid("workload.duration_s must be >= 1"));
    }
    if w.batch_size < 1 {
        return Err(SimError::invalid("workload.batch_size must be >= 1"));
    }
    if !(0.0..=100.0).contains(&w.jitter_pct) {
        return Err(SimError::invalid("workload.jitter_pct must be in [0, 100]"));
    }
    Ok(())
}

fn validate_stage(stage: &Stage) -> Result<()> {
    if stage.name.trim().is_empty() {
        return Err(SimError::invalid("stage.name must not be empty"));
    }
    if stage.value <= 0.0 {
        return Err(SimError::invalid(format!(
            "stage '{}' value must be > 0",
            stage.name
        )));
    }
    Ok(())
}

fn validate_target(t: &Target) -> Result<()> {
    if t.tflops <= 0.0 {
        return Err(SimError::invalid("target.tflops must be > 0"));
    }
    if t.mem_gbps <= 0.0 {
        return Err(SimError::invalid("target.mem_gbps must be > 0"));
    }
    if t.ms_per_token < 0.0 {
        return Err(SimError::invalid("target.ms_per_token must be >= 0"));
    }
    if t.h2d_gbps <= 0.0 {
        return Err(SimError::invalid("target.h2d_gbps must be > 0"));
    }
    if t.d2h_gbps <= 0.0 {
        return Err(SimError::invalid("target.d2h_gbps must be > 0"));
    }
    if t.concurrency < 1 {
        return Err(SimError::invalid("target.concurrency must be >= 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_scenario() -> Scenario {
        Scenario {
            name: "s".into(),
            workload: Workload {
                name: "w".into(),
                rps: 2.0,
                duration_s: 2.0,
                batch_size: 1,
                jitter_pct: 0.0,
            },
            pipeline: vec![Stage {
                name: "prep".into(),
                kind: StageKind::FixedMs,
                value: 5.0,
            }],
            target: Target {
                name: "t".into(),
                tflops: 100.0,
                mem_gbps: 1000.0,
                ms_per_token: 1.0,
                h2d_gbps: 10.0,
                d2h_gbps: 10.0,
                concurrency: 1,
            },
        }
    }

    #[test]
    fn valid_scenario_passes() {
        assert!(validate_scenario(&valid_scenario()).is_ok());
    }

    #[test]
    fn rejects_zero_rps() {
        let mut s = valid_scenario();
        s.workload.rps = 0.0;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn rejects_empty_pipeline() {
        let mut s = valid_scenario();
        s.pipeline.clear();
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn rejects_zero_concurrency() {
        let mut s = valid_scenario();
        s.target.concurrency = 0;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn rejects_jitter_out_of_range() {
        let mut s = valid_scenario();
        s.workload.jitter_pct = 150.0;
        assert!(validate_scenario(&s).is_err());
    }
}
