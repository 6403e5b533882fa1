//! Trace-level property checks.
//!
//! Verifies a complete trace without access to engine internals:
//!
//! - exactly one STATISTICS record, and it is last
//! - one process per tick (RUN ticks strictly increase)
//! - remaining burst drops by exactly one per RUN and is 0 at COMPLETED
//! - nothing runs before it arrives
//! - round-robin slices never exceed the quantum, and end exactly at it
//!   unless the process completes
//! - demotion only with enough accumulated run time
//! - an idle jump lands exactly on the next arrival
//! - turnaround = waiting + burst for every completed process

use mlfq_core::TraceEvent;
use mlfq_types::{ProcessId, ProcessRegistry, Tick};
use std::collections::{HashMap, HashSet};

/// Policy bounds the trace must respect.
#[derive(Debug, Clone, Copy)]
pub struct TraceLimits {
    pub quantum: Tick,
    pub demotion_threshold: Tick,
}

/// Check every trace property, returning the first violation.
pub fn check_trace(
    events: &[TraceEvent],
    registry: &ProcessRegistry,
    limits: TraceLimits,
) -> Result<(), String> {
    let (last, body) = events.split_last().ok_or("empty trace")?;
    let stats = last
        .as_statistics()
        .ok_or_else(|| format!("last event is {}, not STATISTICS", last.type_name()))?;
    if body.iter().any(TraceEvent::is_statistics) {
        return Err("more than one STATISTICS record".into());
    }

    let mut remaining: HashMap<&ProcessId, Tick> =
        registry.iter().map(|p| (&p.id, p.burst)).collect();
    let mut slice: HashMap<&ProcessId, Tick> = HashMap::new();
    let mut proc_time: HashMap<&ProcessId, Tick> = HashMap::new();
    let mut completed: HashSet<&ProcessId> = HashSet::new();
    let mut last_run_tick: Option<Tick> = None;
    let mut pending_jump: Option<Tick> = None;

    for event in body {
        if let Some(target) = pending_jump.take() {
            match event {
                TraceEvent::Arrival { tick, .. } if *tick == target => {}
                other => return Err(format!("idle jump to {target} followed by `{other}`")),
            }
        }

        match event {
            TraceEvent::Run {
                tick,
                pid,
                remaining: left,
                level,
                proc_time: pt,
                ..
            } => {
                if last_run_tick.is_some_and(|prev| *tick <= prev) {
                    return Err(format!("TIME {tick}: more than one RUN for this tick"));
                }
                last_run_tick = Some(*tick);

                let process = registry
                    .index_of(pid)
                    .and_then(|slot| registry.get(slot))
                    .ok_or_else(|| format!("RUN for unknown process {pid}"))?;
                if *tick <= process.arrival {
                    return Err(format!(
                        "{pid} ran during tick {} before arriving at {}",
                        tick - 1,
                        process.arrival
                    ));
                }

                let before = remaining
                    .get_mut(pid)
                    .ok_or_else(|| format!("RUN for unknown process {pid}"))?;
                if *left + 1 != *before {
                    return Err(format!(
                        "TIME {tick}: {pid} remaining went {before} -> {left}"
                    ));
                }
                *before = *left;

                if level.is_round_robin() {
                    let used = slice.entry(pid).or_insert(0);
                    *used += 1;
                    if *used > limits.quantum {
                        return Err(format!(
                            "TIME {tick}: {pid} ran {used} units in one slice (quantum {})",
                            limits.quantum
                        ));
                    }
                }
                proc_time.insert(pid, *pt);
            }
            TraceEvent::Demotion { tick, pid, .. } => {
                let pt = proc_time.get(pid).copied().unwrap_or(0);
                if pt < limits.demotion_threshold {
                    return Err(format!(
                        "TIME {tick}: {pid} demoted with PT={pt} < {}",
                        limits.demotion_threshold
                    ));
                }
                check_full_slice(&mut slice, pid, *tick, limits.quantum)?;
            }
            TraceEvent::QuantumExpired { tick, pid, .. } => {
                check_full_slice(&mut slice, pid, *tick, limits.quantum)?;
            }
            TraceEvent::Preemption { pid, .. } => {
                slice.remove(pid);
            }
            TraceEvent::Completed { tick, pid } => {
                if remaining.get(pid).copied() != Some(0) {
                    return Err(format!("TIME {tick}: {pid} completed with burst left"));
                }
                if !completed.insert(pid) {
                    return Err(format!("{pid} completed twice"));
                }
                slice.remove(pid);
            }
            TraceEvent::Idle {
                tick,
                next_arrival: Some(next),
            } => {
                if next <= tick {
                    return Err(format!("idle at {tick} jumps backwards to {next}"));
                }
                pending_jump = Some(*next);
            }
            _ => {}
        }
    }

    for process in registry {
        let s = stats
            .get(&process.id)
            .ok_or_else(|| format!("{} missing from statistics", process.id))?;
        if s.is_completed() != completed.contains(&process.id) {
            return Err(format!("{} completion disagrees with trace", process.id));
        }
        if let Some(turnaround) = s.turnaround_time() {
            if turnaround != s.total_waiting_time + s.burst_time {
                return Err(format!(
                    "{}: turnaround {turnaround} != waiting {} + burst {}",
                    process.id, s.total_waiting_time, s.burst_time
                ));
            }
        }
    }

    Ok(())
}

fn check_full_slice<'a>(
    slice: &mut HashMap<&'a ProcessId, Tick>,
    pid: &'a ProcessId,
    tick: Tick,
    quantum: Tick,
) -> Result<(), String> {
    match slice.remove(pid) {
        Some(used) if used == quantum => Ok(()),
        used => Err(format!(
            "TIME {tick}: {pid} slice ended after {} units (quantum {quantum})",
            used.unwrap_or(0)
        )),
    }
}
