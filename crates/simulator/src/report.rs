//! End-of-run summary.

use mlfq_core::Averages;
use mlfq_simulation::{segments, timeline, Segment, SimulationOutcome};
use mlfq_types::{ProcessId, Tick};
use serde::Serialize;
use std::fmt;

/// One line of the per-process table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub pid: ProcessId,
    pub arrival: Tick,
    pub burst: Tick,
    pub completion: Option<Tick>,
    pub turnaround: Option<Tick>,
    pub waiting: Tick,
    pub response: Tick,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Rows sorted by process id.
    pub rows: Vec<ReportRow>,

    /// Averages over completed processes; `None` if nothing completed.
    pub averages: Option<Averages>,

    /// Ticks the CPU spent executing.
    pub busy_ticks: Tick,

    /// Latest completion time.
    pub makespan: Tick,

    /// `(tick, pid)` per executed unit.
    pub timeline: Vec<(Tick, ProcessId)>,

    #[serde(skip)]
    segments: Vec<Segment>,
}

impl SimulationReport {
    /// Build the report from a finished run.
    pub fn new(outcome: &SimulationOutcome) -> Self {
        let stats = &outcome.statistics;

        let mut rows: Vec<ReportRow> = stats
            .iter()
            .map(|(pid, s)| ReportRow {
                pid: pid.clone(),
                arrival: s.arrival_time,
                burst: s.burst_time,
                completion: s.completion_time,
                turnaround: s.turnaround_time(),
                waiting: s.waiting_time(),
                response: s.response_time(),
            })
            .collect();
        rows.sort_by(|a, b| a.pid.cmp(&b.pid));

        let timeline = timeline(&outcome.events);
        Self {
            rows,
            averages: stats.averages(),
            busy_ticks: timeline.len() as Tick,
            makespan: stats.makespan().unwrap_or(0),
            segments: segments(&timeline),
            timeline,
        }
    }

    /// Contiguous execution segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Busy ticks over makespan, as a percentage.
    pub fn cpu_utilisation(&self) -> f64 {
        if self.makespan == 0 {
            return 0.0;
        }
        self.busy_ticks as f64 * 100.0 / self.makespan as f64
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

fn or_dash(value: Option<Tick>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "=== SUMMARY ===")?;
        writeln!(
            f,
            "{:<8} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}",
            "PID", "AT", "BT", "CT", "TAT", "WT", "RT"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<8} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}",
                row.pid.as_str(),
                row.arrival,
                row.burst,
                or_dash(row.completion),
                or_dash(row.turnaround),
                row.waiting,
                row.response
            )?;
        }
        writeln!(f)?;

        match &self.averages {
            Some(avg) => {
                writeln!(f, "Average turnaround time: {:.2}", avg.turnaround)?;
                writeln!(f, "Average waiting time:    {:.2}", avg.waiting)?;
                writeln!(f, "Average response time:   {:.2}", avg.response)?;
            }
            None => writeln!(f, "No process completed")?,
        }
        writeln!(
            f,
            "CPU utilisation:         {:.2}% ({}/{} ticks)",
            self.cpu_utilisation(),
            self.busy_ticks,
            self.makespan
        )?;

        if !self.segments.is_empty() {
            let gantt: Vec<String> = self
                .segments
                .iter()
                .map(|s| format!("{}[{}-{}]", s.pid, s.start, s.end))
                .collect();
            writeln!(f, "Timeline: {}", gantt.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlfq_scheduler::SchedulerConfig;
    use mlfq_simulation::run_to_completion;
    use mlfq_test_helpers::{registry, scenario_workload};
    use mlfq_types::ProcessSpec;

    fn scenario_report() -> SimulationReport {
        let outcome =
            run_to_completion(registry(scenario_workload()), SchedulerConfig::default()).unwrap();
        SimulationReport::new(&outcome)
    }

    #[test]
    fn test_rows_and_averages() {
        let report = scenario_report();

        let p3 = &report.rows[2];
        assert_eq!(p3.pid.as_str(), "P3");
        assert_eq!(p3.completion, Some(16));
        assert_eq!(p3.turnaround, Some(11));
        assert_eq!(p3.waiting, 9);
        assert_eq!(p3.response, 9);

        let avg = report.averages.unwrap();
        assert_eq!(avg.completed, 3);
        assert_eq!(format!("{:.2}", avg.turnaround), "18.00");
        assert_eq!(format!("{:.2}", avg.waiting), "7.33");
        assert_eq!(format!("{:.2}", avg.response), "3.33");
    }

    #[test]
    fn test_utilisation_and_segments() {
        let report = scenario_report();
        assert_eq!(report.busy_ticks, 32);
        assert_eq!(report.makespan, 33);
        assert_eq!(format!("{:.2}", report.cpu_utilisation()), "96.97");

        let gantt: Vec<_> = report
            .segments()
            .iter()
            .map(|s| (s.pid.as_str(), s.start, s.end))
            .collect();
        assert_eq!(
            gantt,
            vec![("P1", 1, 4), ("P2", 4, 14), ("P3", 14, 16), ("P1", 16, 33)]
        );
    }

    #[test]
    fn test_rows_sorted_by_pid() {
        let specs = vec![
            ProcessSpec::new("b", 0, 1, 1),
            ProcessSpec::new("a", 0, 1, 1),
        ];
        let outcome = run_to_completion(registry(specs), SchedulerConfig::default()).unwrap();
        let report = SimulationReport::new(&outcome);

        let ids: Vec<_> = report.rows.iter().map(|r| r.pid.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_text_rendering() {
        let text = scenario_report().to_string();
        assert!(text.contains("=== SUMMARY ==="));
        assert!(text.contains("Average waiting time:    7.33"));
        assert!(text.contains("Timeline: P1[1-4] P2[4-14] P3[14-16] P1[16-33]"));
    }

    #[test]
    fn test_empty_run() {
        let outcome = run_to_completion(registry(Vec::new()), SchedulerConfig::default()).unwrap();
        let report = SimulationReport::new(&outcome);

        assert!(report.rows.is_empty());
        assert_eq!(report.cpu_utilisation(), 0.0);
        assert!(report.to_string().contains("No process completed"));
    }

    #[test]
    fn test_json_has_timeline_pairs() {
        let json = serde_json::to_value(scenario_report()).unwrap();
        assert_eq!(json["timeline"][0], serde_json::json!([2, "P1"]));
        assert_eq!(json["rows"][0]["pid"], "P1");
        assert!(json.get("segments").is_none());
    }
}
