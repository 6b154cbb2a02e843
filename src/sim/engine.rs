//! Pipeline Simulation Engine
//!
//! A deterministic single-server/multi-slot queueing simulator that
//! replays a staged request pipeline over a bounded-concurrency GPU,
//! producing per-request traces and latency percentiles.

use super::scenario::{validate_scenario, Scenario, Stage, StageKind, Summary, Target};
use super::trace::Trace;
use crate::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Trace lane / GPU-classification category for a [`StageTiming`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageCategory {
    /// A `fixed_ms` stage.
    Cpu,
    /// A generic `bytes` stage whose name matched neither `h2d` nor `d2h`.
    Mem,
    /// A `bytes` stage whose name contains `"h2d"`.
    H2d,
    /// A `bytes` stage whose name contains `"d2h"`.
    D2h,
    /// A `tokens` stage.
    Compute,
    /// A synthetic stage emitted while a request waits for a GPU slot.
    Queue,
}

/// One timed segment of a request's execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTiming {
    /// Stage name (empty for the synthetic queue stage — callers can
    /// distinguish it by category).
    pub name: String,
    /// Trace/GPU category.
    pub category: StageCategory,
    /// Start time, in milliseconds since the simulation began.
    pub start_ms: f64,
    /// End time, in milliseconds since the simulation began.
    pub end_ms: f64,
}

/// Per-request outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestResult {
    /// 0-indexed request id.
    pub id: i64,
    /// Nominal (jittered) arrival time, in milliseconds.
    pub arrival_ms: f64,
    /// Time the first stage began, in milliseconds.
    pub start_ms: f64,
    /// Time the last stage ended, in milliseconds.
    pub end_ms: f64,
    /// Total time spent in synthetic queue stages, in milliseconds.
    pub queue_ms: f64,
    /// `end_ms - arrival_ms`.
    pub latency_ms: f64,
    /// Stage timings, including synthetic queue stages, in emission order.
    pub stages: Vec<StageTiming>,
}

fn is_gpu_stage_name(name: &str) -> bool {
    name.to_lowercase().contains("compute")
}

fn stage_category(stage: &Stage) -> StageCategory {
    match stage.kind {
        StageKind::FixedMs => StageCategory::Cpu,
        StageKind::Tokens => StageCategory::Compute,
        StageKind::Bytes => {
            let lower = stage.name.to_lowercase();
            if lower.contains("h2d") {
                StageCategory::H2d
            } else if lower.contains("d2h") {
                StageCategory::D2h
            } else {
                StageCategory::Mem
            }
        }
    }
}

fn uses_gpu(stage: &Stage, category: StageCategory) -> bool {
    category == StageCategory::Compute || is_gpu_stage_name(&stage.name)
}

/// Duration of `stage` against `target`, in seconds, before jitter.
fn stage_duration_seconds(stage: &Stage, target: &Target) -> f64 {
    match stage.kind {
        StageKind::FixedMs => stage.value / 1000.0,
        StageKind::Bytes => {
            let lower = stage.name.to_lowercase();
            let bw_gbps = if lower.contains("h2d") {
                target.h2d_gbps
            } else if lower.contains("d2h") {
                target.d2h_gbps
            } else {
                target.mem_gbps
            };
            (stage.value / 1e9) / bw_gbps
        }
        StageKind::Tokens => {
            if target.ms_per_token > 0.0 {
                (stage.value * target.ms_per_token) / 1000.0
            } else {
                stage.value / (target.tflops * 1e6)
            }
        }
    }
}

fn jitter_multiplier(rng: &mut StdRng, jitter_pct: f64) -> f64 {
    if jitter_pct <= 0.0 {
        return 1.0;
    }
    let u: f64 = rng.gen();
    1.0 + (u * 2.0 - 1.0) * jitter_pct / 100.0
}

/// Replay `scenario` deterministically, given `seed`, producing one
/// [`RequestResult`] per request and a complete [`Trace`].
///
/// `scenario` must already satisfy [`validate_scenario`]; this
/// function re-validates defensively and returns
/// [`crate::error::SimError::InputValidation`] rather than panicking
/// or dividing by zero.
pub fn simulate(scenario: &Scenario, seed: u64) -> Result<(Vec<RequestResult>, Trace)> {
    validate_scenario(scenario)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let workload = &scenario.workload;
    let target = &scenario.target;

    let req_count = (workload.duration_s * workload.rps).round().max(1.0) as i64;
    let concurrency = target.concurrency.max(1) as usize;
    let mut slot_free = vec![0.0_f64; concurrency];

    let mut results = Vec::with_capacity(req_count as usize);
    let mut trace = Trace::new();

    for i in 0..req_count {
        let nominal_arrival_ms = (i as f64 / workload.rps) * 1000.0;
        let arrival_mult = jitter_multiplier(&mut rng, workload.jitter_pct);
        let arrival_ms = nominal_arrival_ms * arrival_mult;

        let mut cursor_ms = arrival_ms;
        let mut queue_ms = 0.0_f64;
        let mut stages = Vec::with_capacity(scenario.pipeline.len() + 1);

        for stage in &scenario.pipeline {
            let category = stage_category(stage);
            let base_secs = stage_duration_seconds(stage, target);
            let mult = jitter_multiplier(&mut rng, workload.jitter_pct);
            let dur_ms = base_secs * 1000.0 * mult;

            let start_ms = if uses_gpu(stage, category) {
                let k = argmin(&slot_free);
                if slot_free[k] > cursor_ms {
                    let queue_start = cursor_ms;
                    let queue_end = slot_free[k];
                    trace.add_complete("queue", "queue", queue_start, queue_end);
                    stages.push(StageTiming {
                        name: String::new(),
                        category: StageCategory::Queue,
                        start_ms: queue_start,
                        end_ms: queue_end,
                    });
                    queue_ms += queue_end - queue_start;
                    queue_end
                } else {
                    cursor_ms
                }
            } else {
                cursor_ms
            };

            let end_ms = start_ms + dur_ms;

            if uses_gpu(stage, category) {
                let k = argmin(&slot_free);
                slot_free[k] = end_ms;
            }

            trace.add_complete(&stage.name, category_label(category), start_ms, end_ms);
            stages.push(StageTiming {
                name: stage.name.clone(),
                category,
                start_ms,
                end_ms,
            });

            cursor_ms = end_ms;
        }

        let end_ms = cursor_ms;
        results.push(RequestResult {
            id: i,
            arrival_ms,
            start_ms: arrival_ms,
            end_ms,
            queue_ms,
            latency_ms: end_ms - arrival_ms,
            stages,
        });
    }

    trace.finalize();
    Ok((results, trace))
}

/// Index of the smallest value in `slots`; ties resolve to the
/// smallest index.
fn argmin(slots: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in slots.iter().enumerate() {
        if v < slots[best] {
            best = i;
        }
    }
    best
}

fn category_label(category: StageCategory) -> &'static str {
    match category {
        StageCategory::Cpu => "cpu",
        StageCategory::Mem => "mem",
        StageCategory::H2d => "h2d",
        StageCategory::D2h => "d2h",
        StageCategory::Compute => "compute",
        StageCategory::Queue => "queue",
    }
}

/// Summarize a completed simulation's `results`.
pub fn summarize(results: &[RequestResult], duration_s: f64, concurrency: i64) -> Summary {
    let n = results.len();
    if n == 0 {
        return Summary {
            duration_s,
            ..Default::default()
        };
    }

    let mut latencies: Vec<f64> = results.iter().map(|r| r.latency_ms).collect();
    latencies.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let percentile = |q: f64| -> f64 {
        let idx = ((q / 100.0) * n as f64).ceil() as i64 - 1;
        let idx = idx.clamp(0, n as i64 - 1) as usize;
        latencies[idx]
    };

    let total_queue_ms: f64 = results.iter().map(|r| r.queue_ms).sum();
    let throughput_rps = n as f64 / duration_s.max(1.0);
    let gpu_util_percent = (throughput_rps * 100.0 / concurrency.max(1) as f64).min(100.0);

    Summary {
        throughput_rps,
        p50_latency_ms: percentile(50.0),
        p90_latency_ms: percentile(90.0),
        p99_latency_ms: percentile(99.0),
        avg_queue_ms: total_queue_ms / n as f64,
        gpu_util_percent,
        total_requests: n as i64,
        duration_s,
    }
}
