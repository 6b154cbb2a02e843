//! Pipeline Simulation Engine
//!
//! Deterministic event simulator replaying a staged [`scenario::Scenario`]
//! through a bounded-concurrency GPU, emitting per-request timings
//! ([`engine::RequestResult`]), a Chrome-compatible [`trace::Trace`], and a
//! [`scenario::Summary`] distribution.

pub mod breakdown;
pub mod engine;
pub mod scenario;
pub mod trace;

pub use breakdown::{breakdown, Breakdown};
pub use engine::{simulate, summarize, RequestResult, StageCategory, StageTiming};
pub use scenario::{validate_scenario, Scenario, Stage, StageKind, Summary, Target, Workload};
pub use trace::{Event, Trace};
