//! The scheduling state machine.

use crate::policy::{self, SliceOutcome};
use crate::{
    EnqueueOutcome, ProcessRuntime, ProcessState, QueueManager, SchedulerConfig,
    StatisticsCollector,
};
use mlfq_core::{EngineError, StateMachine, TraceEvent};
use mlfq_types::{ConfigError, ProcessId, ProcessRegistry, QueueLevel, Tick};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// The process currently holding the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dispatch {
    slot: usize,
    level: QueueLevel,
    /// Units executed since this dispatch.
    used: Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Between run segments: admit, age, then dispatch or idle.
    Schedule,
    /// Mid run segment.
    Running(Dispatch),
    /// Terminal idle was reached with processes still incomplete.
    Stalled,
    /// Statistics emitted.
    Finished,
}

/// Complete state of one simulation run.
///
/// Every call to [`StateMachine::step`] performs either one scheduling
/// decision or one CPU unit and returns the events it produced. All state
/// is owned here; the registry is shared read-only.
pub struct SchedulerState {
    /// Processes being simulated (never mutated).
    registry: Arc<ProcessRegistry>,

    /// Policy parameters.
    config: SchedulerConfig,

    /// Simulation clock.
    clock: Tick,

    /// The four ready queues.
    queues: QueueManager,

    /// Per-process runtime state, indexed by registry slot.
    runtime: Vec<ProcessRuntime>,

    /// Per-process statistics, indexed by registry slot.
    collector: StatisticsCollector,

    /// Slots sorted by (arrival, registry order).
    arrival_order: Vec<usize>,

    /// Next entry of `arrival_order` not yet admitted.
    next_arrival: usize,

    /// Number of completed processes.
    completed: usize,

    phase: Phase,

    /// First invariant violation; sticky.
    failure: Option<EngineError>,
}

impl SchedulerState {
    /// Create a run over `registry`.
    ///
    /// Fails if `config` has a parameter below 1.
    pub fn new(
        registry: Arc<ProcessRegistry>,
        config: SchedulerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let runtime: Vec<_> = registry.iter().map(ProcessRuntime::new).collect();
        let mut arrival_order: Vec<usize> = (0..registry.len()).collect();
        arrival_order.sort_by_key(|&slot| (registry.get(slot).map(|p| p.arrival), slot));

        Ok(Self {
            queues: QueueManager::new(registry.len()),
            collector: StatisticsCollector::new(&registry),
            runtime,
            arrival_order,
            next_arrival: 0,
            completed: 0,
            clock: 0,
            phase: Phase::Schedule,
            failure: None,
            registry,
            config,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    /// Get the configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Get the registry.
    pub fn registry(&self) -> &Arc<ProcessRegistry> {
        &self.registry
    }

    /// Runtime state of a process.
    pub fn runtime(&self, pid: &ProcessId) -> Option<&ProcessRuntime> {
        self.registry
            .index_of(pid)
            .and_then(|slot| self.runtime.get(slot))
    }

    /// Ids queued at `level`, front to back.
    pub fn queued(&self, level: QueueLevel) -> Vec<&ProcessId> {
        self.queues
            .queued(level)
            .filter_map(|slot| self.registry.get(slot).map(|p| &p.id))
            .collect()
    }

    /// Id of the process holding the CPU, if any.
    pub fn running(&self) -> Option<&ProcessId> {
        match self.phase {
            Phase::Running(dispatch) => self.registry.get(dispatch.slot).map(|p| &p.id),
            _ => None,
        }
    }

    /// Number of completed processes.
    pub fn completed_count(&self) -> usize {
        self.completed
    }

    fn pid(&self, slot: usize) -> Result<ProcessId, EngineError> {
        self.registry
            .get(slot)
            .map(|p| p.id.clone())
            .ok_or(EngineError::UnknownSlot { slot })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Queue transitions
    // ═══════════════════════════════════════════════════════════════════════════

    /// Place a slot in `level`.
    ///
    /// A process that was not already waiting (newly arrived, or just taken
    /// off the CPU) starts a waiting interval now. Aging moves keep the open
    /// interval.
    fn enqueue(
        &mut self,
        slot: usize,
        level: QueueLevel,
        reset_run_time: bool,
        reset_wait_tracking: bool,
    ) -> Result<(), EngineError> {
        if let EnqueueOutcome::Conflict(current) = self.queues.enqueue(slot, level) {
            return Err(EngineError::DuplicateMembership {
                pid: self.pid(slot)?,
                current,
                requested: level,
            });
        }

        let clock = self.clock;
        let rt = &mut self.runtime[slot];
        rt.state = ProcessState::Queued;
        rt.level = level;
        if reset_run_time {
            rt.proc_time = 0;
        }
        if reset_wait_tracking {
            rt.wait_time = 0;
            rt.queue_entry_time = Some(clock);
        }
        rt.last_wait_start.get_or_insert(clock);
        Ok(())
    }

    /// Admit every process arriving at the current tick.
    fn admit_arrivals(&mut self, events: &mut Vec<TraceEvent>) -> Result<(), EngineError> {
        while let Some(&slot) = self.arrival_order.get(self.next_arrival) {
            let process = self
                .registry
                .get(slot)
                .ok_or(EngineError::UnknownSlot { slot })?;
            if process.arrival != self.clock {
                break;
            }
            let (pid, level) = (process.id.clone(), process.priority);
            self.next_arrival += 1;

            self.enqueue(slot, level, true, true)?;
            debug!(pid = %pid, tick = self.clock, level = %level, "Process arrived");
            events.push(TraceEvent::Arrival {
                tick: self.clock,
                pid,
                level,
            });
        }
        Ok(())
    }

    /// Recompute wait time for every queued process.
    fn refresh_waiting(&mut self) {
        let clock = self.clock;
        for rt in &mut self.runtime {
            if rt.state == ProcessState::Queued {
                if let Some(entry) = rt.queue_entry_time {
                    rt.wait_time = clock.saturating_sub(entry);
                }
            }
        }
    }

    /// Promote every process that waited past the aging threshold.
    fn apply_aging(&mut self, events: &mut Vec<TraceEvent>) -> Result<(), EngineError> {
        let promotions =
            policy::aging_candidates(&self.queues, &self.runtime, self.config.aging_threshold);

        for promotion in promotions {
            self.queues.remove_if_present(promotion.slot);
            self.enqueue(promotion.slot, promotion.to, false, true)?;

            let pid = self.pid(promotion.slot)?;
            debug!(
                pid = %pid,
                tick = self.clock,
                from = %promotion.from,
                to = %promotion.to,
                "Aged process promoted"
            );
            events.push(TraceEvent::Aging {
                tick: self.clock,
                pid,
                from: promotion.from,
                to: promotion.to,
            });
        }
        Ok(())
    }

    /// Arrivals, waiting refresh, aging: the per-tick housekeeping.
    fn housekeeping(&mut self, events: &mut Vec<TraceEvent>) -> Result<(), EngineError> {
        self.admit_arrivals(events)?;
        self.refresh_waiting();
        self.apply_aging(events)
    }

    /// Earliest arrival tick not yet admitted.
    fn pending_arrival(&self) -> Option<Tick> {
        self.arrival_order
            .get(self.next_arrival)
            .and_then(|&slot| self.registry.get(slot))
            .map(|p| p.arrival)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Phases
    // ═══════════════════════════════════════════════════════════════════════════

    fn schedule(&mut self, events: &mut Vec<TraceEvent>) -> Result<(), EngineError> {
        if self.completed == self.registry.len() {
            info!(
                tick = self.clock,
                processes = self.completed,
                "All processes completed"
            );
            self.phase = Phase::Finished;
            events.push(TraceEvent::Statistics(self.collector.snapshot()));
            return Ok(());
        }

        self.housekeeping(events)?;

        let Some(level) = self.queues.highest_non_empty() else {
            return self.idle(events);
        };

        let runtime = &self.runtime;
        let slot = self
            .queues
            .select_next(level, |s| runtime[s].remaining)
            .ok_or(EngineError::EmptySelection {
                level,
                tick: self.clock,
            })?;

        let clock = self.clock;
        let rt = &mut self.runtime[slot];
        if rt.state != ProcessState::Queued {
            return Err(EngineError::EmptySelection { level, tick: clock });
        }
        rt.state = ProcessState::Running;
        rt.wait_time = 0;
        rt.queue_entry_time = None;
        let wait_start = rt.last_wait_start.take();
        self.collector.record_dispatch(slot, clock, wait_start)?;

        debug!(
            pid = %self.pid(slot)?,
            tick = clock,
            level = %level,
            "Dispatched"
        );
        self.phase = Phase::Running(Dispatch {
            slot,
            level,
            used: 0,
        });
        Ok(())
    }

    fn idle(&mut self, events: &mut Vec<TraceEvent>) -> Result<(), EngineError> {
        let next_arrival = self.pending_arrival();
        events.push(TraceEvent::Idle {
            tick: self.clock,
            next_arrival,
        });

        match next_arrival {
            Some(next) => {
                trace!(tick = self.clock, next, "CPU idle, jumping to next arrival");
                self.clock = next;
            }
            None => {
                self.clock += 1;
                self.phase = Phase::Stalled;
            }
        }
        Ok(())
    }

    fn run_unit(
        &mut self,
        mut dispatch: Dispatch,
        events: &mut Vec<TraceEvent>,
    ) -> Result<(), EngineError> {
        let slot = dispatch.slot;
        if self.runtime[slot].remaining == 0 {
            return Err(EngineError::BurstUnderflow {
                pid: self.pid(slot)?,
                tick: self.clock,
            });
        }

        let rt = &mut self.runtime[slot];
        rt.remaining -= 1;
        rt.proc_time += 1;
        dispatch.used += 1;
        self.clock += 1;

        self.housekeeping(events)?;

        let rt = &self.runtime[slot];
        let (remaining, proc_time) = (rt.remaining, rt.proc_time);
        let pid = self.pid(slot)?;
        trace!(pid = %pid, tick = self.clock, remaining, proc_time, "Executed one unit");
        events.push(TraceEvent::Run {
            tick: self.clock,
            pid,
            remaining,
            level: dispatch.level,
            discipline: dispatch.level.discipline(self.config.preemptive_sjf),
            proc_time,
        });

        self.phase = Phase::Schedule;
        if remaining == 0 {
            return self.complete(slot, events);
        }

        if dispatch.level.is_round_robin() {
            if dispatch.used >= self.config.quantum {
                return self.expire_slice(slot, dispatch.level, events);
            }
        } else {
            let runtime = &self.runtime;
            let shortest = self
                .queues
                .shortest_remaining(dispatch.level, |s| runtime[s].remaining);
            if policy::should_preempt(
                self.config.preemptive_sjf,
                dispatch.level,
                remaining,
                shortest,
            ) {
                return self.preempt(slot, dispatch.level, events);
            }
        }

        self.phase = Phase::Running(dispatch);
        Ok(())
    }

    fn complete(&mut self, slot: usize, events: &mut Vec<TraceEvent>) -> Result<(), EngineError> {
        self.runtime[slot].finish();
        self.completed += 1;
        let stats = self.collector.record_completion(slot, self.clock)?;

        let pid = self.pid(slot)?;
        debug!(
            pid = %pid,
            tick = self.clock,
            turnaround = stats.turnaround_time(),
            waiting = stats.waiting_time(),
            "Process completed"
        );
        events.push(TraceEvent::Completed {
            tick: self.clock,
            pid,
        });
        Ok(())
    }

    fn expire_slice(
        &mut self,
        slot: usize,
        level: QueueLevel,
        events: &mut Vec<TraceEvent>,
    ) -> Result<(), EngineError> {
        let pid = self.pid(slot)?;
        let proc_time = self.runtime[slot].proc_time;

        match policy::on_quantum_expiry(level, proc_time, self.config.demotion_threshold) {
            SliceOutcome::Demote { from, to } => {
                self.enqueue(slot, to, true, true)?;
                debug!(pid = %pid, tick = self.clock, from = %from, to = %to, proc_time, "Demoted");
                events.push(TraceEvent::Demotion {
                    tick: self.clock,
                    pid,
                    from,
                    to,
                    threshold: self.config.demotion_threshold,
                });
            }
            SliceOutcome::Requeue { level } => {
                self.enqueue(slot, level, false, true)?;
                debug!(pid = %pid, tick = self.clock, level = %level, "Quantum expired");
                events.push(TraceEvent::QuantumExpired {
                    tick: self.clock,
                    pid,
                    level,
                });
            }
        }
        Ok(())
    }

    fn preempt(
        &mut self,
        slot: usize,
        level: QueueLevel,
        events: &mut Vec<TraceEvent>,
    ) -> Result<(), EngineError> {
        self.enqueue(slot, level, false, true)?;

        let pid = self.pid(slot)?;
        debug!(pid = %pid, tick = self.clock, "Preempted by shorter job");
        events.push(TraceEvent::Preemption {
            tick: self.clock,
            pid,
            level,
        });
        Ok(())
    }
}

impl StateMachine for SchedulerState {
    fn step(&mut self) -> Result<Vec<TraceEvent>, EngineError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let mut events = Vec::new();
        let result = match self.phase {
            Phase::Schedule => self.schedule(&mut events),
            Phase::Running(dispatch) => self.run_unit(dispatch, &mut events),
            Phase::Stalled => Err(EngineError::Stalled {
                tick: self.clock,
                incomplete: self.registry.len() - self.completed,
            }),
            Phase::Finished => Ok(()),
        };

        match result {
            Ok(()) => Ok(events),
            Err(err) => {
                warn!(error = %err, tick = self.clock, "Scheduler invariant violated");
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    fn now(&self) -> Tick {
        self.clock
    }

    fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlfq_core::StatisticsSnapshot;
    use mlfq_test_helpers::{
        check_trace, reference_workload, registry, scenario_workload, TraceLimits,
    };
    use mlfq_types::{Discipline, ProcessSpec};
    use tracing_test::traced_test;

    fn make_state(specs: Vec<ProcessSpec>, config: SchedulerConfig) -> SchedulerState {
        SchedulerState::new(registry(specs), config).unwrap()
    }

    fn drain(state: &mut SchedulerState) -> Result<Vec<TraceEvent>, EngineError> {
        let mut events = Vec::new();
        while !state.is_finished() {
            events.extend(state.step()?);
        }
        Ok(events)
    }

    fn statistics(events: &[TraceEvent]) -> &StatisticsSnapshot {
        events
            .last()
            .and_then(TraceEvent::as_statistics)
            .expect("trace must end with statistics")
    }

    fn config_matrix() -> [SchedulerConfig; 5] {
        [
            SchedulerConfig::default(),
            SchedulerConfig::default().with_preemptive_sjf(false),
            SchedulerConfig::new()
                .with_quantum(1)
                .with_aging_threshold(1)
                .with_demotion_threshold(1),
            SchedulerConfig::new()
                .with_quantum(5)
                .with_aging_threshold(20)
                .with_demotion_threshold(3),
            SchedulerConfig::new()
                .with_quantum(2)
                .with_aging_threshold(100)
                .with_demotion_threshold(2),
        ]
    }

    fn limits(config: &SchedulerConfig) -> TraceLimits {
        TraceLimits {
            quantum: config.quantum,
            demotion_threshold: config.demotion_threshold,
        }
    }

    fn pid(id: &str) -> ProcessId {
        ProcessId::from(id)
    }

    #[traced_test]
    #[test]
    fn test_scenario_opening_sequence() {
        let mut state = make_state(scenario_workload(), SchedulerConfig::default());
        let events = drain(&mut state).unwrap();

        let run = |tick, id: &str, remaining, level, discipline, proc_time| TraceEvent::Run {
            tick,
            pid: pid(id),
            remaining,
            level,
            discipline,
            proc_time,
        };
        let sjf = Discipline::Sjf { preemptive: true };

        assert_eq!(
            events[..10].to_vec(),
            vec![
                TraceEvent::Idle {
                    tick: 0,
                    next_arrival: Some(1)
                },
                TraceEvent::Arrival {
                    tick: 1,
                    pid: pid("P1"),
                    level: QueueLevel::RR_HIGH
                },
                run(2, "P1", 19, QueueLevel::RR_HIGH, Discipline::RoundRobin, 1),
                TraceEvent::Arrival {
                    tick: 3,
                    pid: pid("P2"),
                    level: QueueLevel::SJF
                },
                run(3, "P1", 18, QueueLevel::RR_HIGH, Discipline::RoundRobin, 2),
                run(4, "P1", 17, QueueLevel::RR_HIGH, Discipline::RoundRobin, 3),
                TraceEvent::QuantumExpired {
                    tick: 4,
                    pid: pid("P1"),
                    level: QueueLevel::RR_HIGH
                },
                TraceEvent::Arrival {
                    tick: 5,
                    pid: pid("P3"),
                    level: QueueLevel::FCFS
                },
                run(5, "P2", 9, QueueLevel::SJF, sjf, 1),
                run(6, "P2", 8, QueueLevel::SJF, sjf, 2),
            ]
        );
        assert!(logs_contain("All processes completed"));
    }

    #[traced_test]
    #[test]
    fn test_scenario_statistics() {
        let mut state = make_state(scenario_workload(), SchedulerConfig::default());
        let events = drain(&mut state).unwrap();
        let stats = statistics(&events);

        // P1 waits in Q3 from 4, ages to Q2 at 9 and to Q1 at 14.
        let agings: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Aging { .. }))
            .cloned()
            .collect();
        assert_eq!(
            agings,
            vec![
                TraceEvent::Aging {
                    tick: 9,
                    pid: pid("P1"),
                    from: QueueLevel::RR_HIGH,
                    to: QueueLevel::SJF
                },
                TraceEvent::Aging {
                    tick: 14,
                    pid: pid("P1"),
                    from: QueueLevel::SJF,
                    to: QueueLevel::FCFS
                },
            ]
        );

        // P2 holds the CPU from 4 to completion; level 2 is not interrupted by
        // level-1 arrivals, so P3 is first served when P2 finishes.
        let p1 = stats.get(&pid("P1")).unwrap();
        assert_eq!(p1.first_response_time, Some(1));
        assert_eq!(p1.completion_time, Some(33));
        assert_eq!(p1.total_waiting_time, 12);

        let p2 = stats.get(&pid("P2")).unwrap();
        assert_eq!(p2.first_response_time, Some(4));
        assert_eq!(p2.completion_time, Some(14));
        assert_eq!(p2.total_waiting_time, 1);
        assert_eq!(p2.response_time(), 1);

        let p3 = stats.get(&pid("P3")).unwrap();
        assert_eq!(p3.first_response_time, Some(14));
        assert_eq!(p3.completion_time, Some(16));
        assert_eq!(p3.total_waiting_time, 9);

        check_trace(&events, state.registry(), limits(state.config())).unwrap();
    }

    #[traced_test]
    #[test]
    fn test_reference_workload_properties_across_configs() {
        for config in config_matrix() {
            let mut state = make_state(reference_workload(), config);
            let events = drain(&mut state).unwrap();

            check_trace(&events, state.registry(), limits(&config))
                .unwrap_or_else(|e| panic!("{config:?}: {e}"));
            assert_eq!(state.completed_count(), 7);
            assert_eq!(statistics(&events).completed().count(), 7);
        }
    }

    #[test]
    fn test_aging_bound_holds_every_step() {
        for config in config_matrix() {
            let mut state = make_state(reference_workload(), config);

            while !state.is_finished() {
                state.step().unwrap();
                for level in [QueueLevel::SJF, QueueLevel::RR_HIGH, QueueLevel::RR_LOW] {
                    for id in state.queued(level) {
                        let rt = state.runtime(id).unwrap();
                        assert!(
                            rt.wait_time < config.aging_threshold,
                            "{config:?} TIME {}: {id} waited {} in {level}",
                            state.now(),
                            rt.wait_time
                        );
                    }
                }
            }
            assert_eq!(state.completed_count(), 7);
        }
    }

    #[test]
    fn test_single_running_process_never_queued() {
        let mut state = make_state(reference_workload(), SchedulerConfig::default());

        while !state.is_finished() {
            state.step().unwrap();
            if let Some(running) = state.running() {
                let running = running.clone();
                for level in QueueLevel::ALL {
                    assert!(!state.queued(level).contains(&&running));
                }
                assert_eq!(
                    state.runtime(&running).unwrap().state,
                    ProcessState::Running
                );
            }
        }
    }

    #[traced_test]
    #[test]
    fn test_preemptive_sjf_interrupts_longer_job() {
        let specs = vec![
            ProcessSpec::new("A", 0, 6, 2),
            ProcessSpec::new("B", 1, 2, 2),
        ];
        let mut state = make_state(specs, SchedulerConfig::default());
        let events = drain(&mut state).unwrap();

        assert!(events.contains(&TraceEvent::Preemption {
            tick: 1,
            pid: pid("A"),
            level: QueueLevel::SJF
        }));

        let stats = statistics(&events);
        assert_eq!(stats.get(&pid("B")).unwrap().completion_time, Some(3));
        assert_eq!(stats.get(&pid("B")).unwrap().response_time(), 0);
        assert_eq!(stats.get(&pid("A")).unwrap().completion_time, Some(8));
        assert_eq!(stats.get(&pid("A")).unwrap().total_waiting_time, 2);
        check_trace(&events, state.registry(), limits(state.config())).unwrap();
    }

    #[traced_test]
    #[test]
    fn test_non_preemptive_sjf_runs_to_completion() {
        let specs = vec![
            ProcessSpec::new("A", 0, 6, 2),
            ProcessSpec::new("B", 1, 2, 2),
        ];
        let config = SchedulerConfig::default().with_preemptive_sjf(false);
        let mut state = make_state(specs, config);
        let events = drain(&mut state).unwrap();

        assert!(!events
            .iter()
            .any(|e| matches!(e, TraceEvent::Preemption { .. })));
        assert!(events.iter().all(|e| match e {
            TraceEvent::Run {
                level, discipline, ..
            } if *level == QueueLevel::SJF => discipline.label() == "SJF",
            _ => true,
        }));

        let stats = statistics(&events);
        assert_eq!(stats.get(&pid("A")).unwrap().completion_time, Some(6));
        assert_eq!(stats.get(&pid("B")).unwrap().completion_time, Some(8));
        assert_eq!(stats.get(&pid("B")).unwrap().total_waiting_time, 5);
    }

    #[test]
    fn test_sjf_tie_goes_to_earliest_enqueue() {
        // Y is registered before X but X is enqueued first (arrives at 0).
        let specs = vec![
            ProcessSpec::new("F", 0, 2, 1),
            ProcessSpec::new("Y", 1, 3, 2),
            ProcessSpec::new("X", 0, 3, 2),
        ];
        let mut state = make_state(specs, SchedulerConfig::default());
        let events = drain(&mut state).unwrap();

        let order: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Completed { pid, .. } => Some(pid.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec!["F", "X", "Y"]);
    }

    #[test]
    fn test_fcfs_serves_in_enqueue_order() {
        let specs = vec![
            ProcessSpec::new("C", 1, 1, 1),
            ProcessSpec::new("A", 0, 3, 1),
            ProcessSpec::new("B", 0, 2, 1),
        ];
        let mut state = make_state(specs, SchedulerConfig::default());
        let events = drain(&mut state).unwrap();

        let first_runs: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Run { pid, .. } => Some(pid.as_str()),
                _ => None,
            })
            .fold(Vec::new(), |mut acc, id| {
                if acc.last() != Some(&id) {
                    acc.push(id);
                }
                acc
            });
        assert_eq!(first_runs, vec!["A", "B", "C"]);
    }

    #[traced_test]
    #[test]
    fn test_round_robin_requeue_then_demotion() {
        let specs = vec![ProcessSpec::new("D", 0, 10, 3)];
        let mut state = make_state(specs, SchedulerConfig::default());
        let events = drain(&mut state).unwrap();

        let transitions: Vec<_> = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    TraceEvent::QuantumExpired { .. }
                        | TraceEvent::Demotion { .. }
                        | TraceEvent::Completed { .. }
                )
            })
            .cloned()
            .collect();

        assert_eq!(
            transitions,
            vec![
                TraceEvent::QuantumExpired {
                    tick: 3,
                    pid: pid("D"),
                    level: QueueLevel::RR_HIGH
                },
                TraceEvent::Demotion {
                    tick: 6,
                    pid: pid("D"),
                    from: QueueLevel::RR_HIGH,
                    to: QueueLevel::RR_LOW,
                    threshold: 6
                },
                TraceEvent::QuantumExpired {
                    tick: 9,
                    pid: pid("D"),
                    level: QueueLevel::RR_LOW
                },
                TraceEvent::Completed {
                    tick: 10,
                    pid: pid("D")
                },
            ]
        );

        // Demotion resets accumulated run time.
        let pt_after_demotion = events.iter().find_map(|e| match e {
            TraceEvent::Run {
                tick: 7, proc_time, ..
            } => Some(*proc_time),
            _ => None,
        });
        assert_eq!(pt_after_demotion, Some(1));
        assert_eq!(
            statistics(&events)
                .get(&pid("D"))
                .unwrap()
                .total_waiting_time,
            0
        );
    }

    #[test]
    fn test_idle_jumps_to_next_arrival() {
        let specs = vec![
            ProcessSpec::new("A", 5, 1, 1),
            ProcessSpec::new("B", 10, 1, 4),
        ];
        let mut state = make_state(specs, SchedulerConfig::default());
        let events = drain(&mut state).unwrap();

        let idles: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Idle { .. }))
            .cloned()
            .collect();
        assert_eq!(
            idles,
            vec![
                TraceEvent::Idle {
                    tick: 0,
                    next_arrival: Some(5)
                },
                TraceEvent::Idle {
                    tick: 6,
                    next_arrival: Some(10)
                },
            ]
        );
        assert_eq!(
            statistics(&events).get(&pid("B")).unwrap().completion_time,
            Some(11)
        );
    }

    #[test]
    fn test_empty_registry_emits_only_statistics() {
        let mut state = make_state(Vec::new(), SchedulerConfig::default());
        let events = state.step().unwrap();

        assert_eq!(events.len(), 1);
        assert!(statistics(&events).is_empty());
        assert!(state.is_finished());
        assert!(state.step().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_before_run() {
        let result = SchedulerState::new(
            registry(scenario_workload()),
            SchedulerConfig::default().with_quantum(0),
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "quantum",
                value: 0
            })
        ));
    }

    #[test]
    fn test_runs_are_deterministic_and_leave_registry_untouched() {
        let shared = registry(reference_workload());
        let before = (*shared).clone();

        let run = || {
            let mut state =
                SchedulerState::new(Arc::clone(&shared), SchedulerConfig::default()).unwrap();
            drain(&mut state)
                .unwrap()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
        assert_eq!(*shared, before);
    }

    #[traced_test]
    #[test]
    fn test_stall_is_reported_as_defect() {
        let mut state = make_state(scenario_workload(), SchedulerConfig::default());
        // Pretend every arrival was already admitted.
        state.next_arrival = state.arrival_order.len();

        let events = state.step().unwrap();
        assert_eq!(
            events,
            vec![TraceEvent::Idle {
                tick: 0,
                next_arrival: None
            }]
        );

        let err = state.step().unwrap_err();
        assert_eq!(
            err,
            EngineError::Stalled {
                tick: 1,
                incomplete: 3
            }
        );
        assert_eq!(state.step().unwrap_err(), err);
        assert!(logs_contain("Scheduler invariant violated"));
    }

    #[test]
    fn test_second_queue_membership_is_defect() {
        let mut state = make_state(scenario_workload(), SchedulerConfig::default());
        state.enqueue(0, QueueLevel::RR_HIGH, true, true).unwrap();

        let err = state.enqueue(0, QueueLevel::FCFS, false, true).unwrap_err();
        assert_eq!(
            err,
            EngineError::DuplicateMembership {
                pid: pid("P1"),
                current: QueueLevel::RR_HIGH,
                requested: QueueLevel::FCFS
            }
        );
    }

    #[test]
    fn test_running_exhausted_process_is_defect() {
        let mut state = make_state(
            vec![ProcessSpec::new("A", 0, 1, 1)],
            SchedulerConfig::default(),
        );
        state.step().unwrap(); // dispatch
        state.runtime[0].remaining = 0;

        let err = state.step().unwrap_err();
        assert!(matches!(err, EngineError::BurstUnderflow { tick: 0, .. }));
    }
}
