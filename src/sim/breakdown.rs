//! Optional per-stage breakdown of a completed simulation
//!
//! Not part of the core public operation (`simulate`), but a
//! supplementary aggregation useful to API callers that want
//! per-stage totals without re-scanning `RequestResult`s themselves.

use super::engine::{RequestResult, StageCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals and averages for one stage name across all requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageAggregate {
    /// Stage name.
    pub name: String,
    /// Category, as recorded on the first occurrence seen.
    pub category: StageCategory,
    /// Number of times this stage occurred.
    pub count: i64,
    /// Sum of durations across all occurrences, in milliseconds.
    pub total_ms: f64,
    /// `total_ms / count`.
    pub avg_ms: f64,
}

/// A single request's stage durations, flattened for tabular display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBreakdown {
    /// Request id.
    pub id: i64,
    /// `(stage name, duration_ms)` pairs in emission order, including
    /// synthetic queue stages (named `"queue"`).
    pub stages: Vec<(String, f64)>,
}

/// Per-stage aggregates and per-request flattened tables over a
/// completed simulation's results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Aggregates, in first-seen stage-name order.
    pub stages: Vec<StageAggregate>,
    /// One entry per request, in request-index order.
    pub requests: Vec<RequestBreakdown>,
}

/// Compute a [`Breakdown`] over `results`.
pub fn breakdown(results: &[RequestResult]) -> Breakdown {
    let mut order: Vec<String> = Vec::new();
    let mut totals: BTreeMap<String, (StageCategory, i64, f64)> = BTreeMap::new();
    let mut requests = Vec::with_capacity(results.len());

    for r in results {
        let mut flattened = Vec::with_capacity(r.stages.len());
        for st in &r.stages {
            let name = if st.category == StageCategory::Queue {
                "queue".to_string()
            } else {
                st.name.clone()
            };
            let dur = st.end_ms - st.start_ms;
            flattened.push((name.clone(), dur));

            let entry = totals
                .entry(name.clone())
                .or_insert_with(|| {
                    order.push(name.clone());
                    (st.category, 0, 0.0)
                });
            entry.1 += 1;
            entry.2 += dur;
        }
        requests.push(RequestBreakdown { id: r.id, stages: flattened });
    }

    let stages = order
        .into_iter()
        .map(|name| {
            let (category, count, total_ms) = totals[&name];
            StageAggregate {
                name,
                category,
                count,
                total_ms,
                avg_ms: if count > 0 { total_ms / count as f64 } else { 0.0 },
            }
        })
        .collect();

    Breakdown { stages, requests }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::engine::StageTiming;

    fn result(id: i64, stages: Vec<StageTiming>) -> RequestResult {
        RequestResult {
            id,
            arrival_ms: 0.0,
            start_ms: 0.0,
            end_ms: stages.last().map(|s| s.end_ms).unwrap_or(0.0),
            queue_ms: 0.0,
            latency_ms: 0.0,
            stages,
        }
    }

    #[test]
    fn aggregates_total_and_average_per_stage() {
        let results = vec![
            result(
                0,
                vec![StageTiming {
                    name: "prep".into(),
                    category: StageCategory::Cpu,
                    start_ms: 0.0,
                    end_ms: 10.0,
                }],
            ),
            result(
                1,
                vec![StageTiming {
                    name: "prep".into(),
                    category: StageCategory::Cpu,
                    start_ms: 0.0,
                    end_ms: 20.0,
                }],
            ),
        ];
        let b = breakdown(&results);
        assert_eq!(b.stages.len(), 1);
        assert_eq!(b.stages[0].count, 2);
        assert_eq!(b.stages[0].total_ms, 30.0);
        assert_eq!(b.stages[0].avg_ms, 15.0);
        assert_eq!(b.requests.len(), 2);
    }
}
