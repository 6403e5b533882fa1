//! Run helpers over the scheduling engine.

use crate::Trace;
use mlfq_core::{EngineError, StatisticsSnapshot, TraceEvent};
use mlfq_scheduler::{SchedulerConfig, SchedulerState};
use mlfq_types::{ConfigError, ProcessRegistry};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from a complete run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("scheduler aborted: {0}")]
    Engine(#[from] EngineError),

    #[error("trace ended without a statistics record")]
    MissingStatistics,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    /// Events in emission order, excluding the final STATISTICS record.
    pub events: Vec<TraceEvent>,
    pub statistics: StatisticsSnapshot,
}

/// Start a lazy run over `registry`.
///
/// Configuration is validated here, before any event is produced. The
/// registry is only read; other runs may share it.
pub fn run_scheduler(
    registry: Arc<ProcessRegistry>,
    config: SchedulerConfig,
) -> Result<Trace<SchedulerState>, ConfigError> {
    info!(
        processes = registry.len(),
        total_burst = registry.total_burst(),
        quantum = config.quantum,
        aging_threshold = config.aging_threshold,
        demotion_threshold = config.demotion_threshold,
        preemptive_sjf = config.preemptive_sjf,
        "Starting simulation"
    );
    Ok(Trace::new(SchedulerState::new(registry, config)?))
}

/// Drive a run to the end and split off the statistics.
pub fn run_to_completion(
    registry: Arc<ProcessRegistry>,
    config: SchedulerConfig,
) -> Result<SimulationOutcome, SimulationError> {
    let mut events = run_scheduler(registry, config)?.collect::<Result<Vec<_>, _>>()?;

    match events.pop() {
        Some(TraceEvent::Statistics(statistics)) => Ok(SimulationOutcome { events, statistics }),
        _ => Err(SimulationError::MissingStatistics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlfq_core::StateMachine;
    use mlfq_test_helpers::{
        check_trace, reference_workload, registry, scenario_workload, TraceLimits,
    };
    use mlfq_types::{ProcessId, ProcessSpec};
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_reference_run_completes_every_process() {
        let shared = registry(reference_workload());
        let outcome = run_to_completion(Arc::clone(&shared), SchedulerConfig::default()).unwrap();

        assert_eq!(outcome.statistics.len(), 7);
        assert_eq!(outcome.statistics.completed().count(), 7);
        assert!(!outcome.events.iter().any(TraceEvent::is_statistics));

        let mut full = outcome.events.clone();
        full.push(TraceEvent::Statistics(outcome.statistics.clone()));
        check_trace(
            &full,
            &shared,
            TraceLimits {
                quantum: 3,
                demotion_threshold: 6,
            },
        )
        .unwrap();
        assert!(logs_contain("Starting simulation"));
        assert!(logs_contain("total_burst=66"));
    }

    #[test]
    fn test_invalid_config_fails_before_first_event() {
        let result = run_scheduler(
            registry(scenario_workload()),
            SchedulerConfig::default().with_aging_threshold(0),
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "aging_threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_trace_is_lazy() {
        let mut trace =
            run_scheduler(registry(scenario_workload()), SchedulerConfig::default()).unwrap();

        // Tick 0 idles, so the first pull only jumps the clock.
        let first = trace.next().unwrap().unwrap();
        assert_eq!(
            first,
            TraceEvent::Idle {
                tick: 0,
                next_arrival: Some(1)
            }
        );
        assert_eq!(trace.machine().now(), 1);
        assert_eq!(trace.machine().completed_count(), 0);
    }

    #[test]
    fn test_dropping_trace_leaves_registry_reusable() {
        let shared = registry(scenario_workload());
        let partial: Vec<_> = run_scheduler(Arc::clone(&shared), SchedulerConfig::default())
            .unwrap()
            .take(5)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(partial.len(), 5);

        let first = run_to_completion(Arc::clone(&shared), SchedulerConfig::default()).unwrap();
        let second = run_to_completion(shared, SchedulerConfig::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.events[..5], partial[..]);
    }

    #[test]
    fn test_identical_inputs_render_identically() {
        let render = || {
            run_scheduler(registry(reference_workload()), SchedulerConfig::default())
                .unwrap()
                .map(|event| event.unwrap().to_string())
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_empty_workload_yields_only_statistics() {
        let outcome = run_to_completion(registry(Vec::new()), SchedulerConfig::default()).unwrap();
        assert!(outcome.events.is_empty());
        assert!(outcome.statistics.is_empty());
    }

    #[test]
    fn test_scenario_response_times() {
        let outcome =
            run_to_completion(registry(scenario_workload()), SchedulerConfig::default()).unwrap();
        let response = |id: &str| {
            outcome
                .statistics
                .get(&ProcessId::from(id))
                .map(|s| s.response_time())
        };
        assert_eq!(response("P1"), Some(0));
        assert_eq!(response("P2"), Some(1));
        assert_eq!(response("P3"), Some(9));
    }

    #[test]
    fn test_late_single_process() {
        let outcome = run_to_completion(
            registry(vec![ProcessSpec::new("Z", 3, 2, 4)]),
            SchedulerConfig::default(),
        )
        .unwrap();
        let stats = outcome.statistics.get(&ProcessId::from("Z")).unwrap();
        assert_eq!(stats.completion_time, Some(5));
        assert_eq!(stats.total_waiting_time, 0);
    }
}
