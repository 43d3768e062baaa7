//! Run metrics derived from the transition log
//!
//! Replays the log and charges the time between consecutive transitions of a
//! process to the state it was leaving. Because every tick of CPU execution
//! falls inside exactly one RUNNING interval, a terminated process's
//! `cpu_time` equals its `processing_time`.

use crate::models::event::{Event, EventLog};
use crate::models::process::{Pid, Process, ProcessState};
use serde::Serialize;
use std::collections::HashMap;

/// Per-process timing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub arrival_time: usize,
    pub processing_time: usize,

    /// Tick the process received memory
    pub admitted_at: Option<usize>,

    /// Tick of the first READY -> RUNNING
    pub first_run_at: Option<usize>,

    /// Tick of RUNNING -> TERMINATED
    pub terminated_at: Option<usize>,

    /// Ticks spent RUNNING
    pub cpu_time: usize,

    /// Ticks spent in the ready queue
    pub ready_time: usize,

    /// Ticks spent blocked on I/O
    pub io_time: usize,

    pub num_dispatches: usize,

    /// RUNNING -> READY transitions (preemption or quantum expiry)
    pub num_preemptions: usize,

    pub num_io_requests: usize,
}

impl ProcessMetrics {
    /// Termination minus arrival
    pub fn turnaround_time(&self) -> Option<usize> {
        self.terminated_at.map(|t| t - self.arrival_time)
    }

    /// First dispatch minus arrival
    pub fn response_time(&self) -> Option<usize> {
        self.first_run_at.map(|t| t - self.arrival_time)
    }

    /// Admission minus arrival (time spent waiting for memory)
    pub fn admission_delay(&self) -> Option<usize> {
        self.admitted_at.map(|t| t - self.arrival_time)
    }
}

/// Whole-run metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunMetrics {
    /// In input order
    pub processes: Vec<ProcessMetrics>,

    /// Tick at which the run ended
    pub total_ticks: usize,

    /// Ticks during which the CPU executed a process
    pub busy_ticks: usize,
}

impl RunMetrics {
    /// Derive metrics by replaying `log` for `processes`
    ///
    /// # Example
    ///
    /// ```rust
    /// use cpu_scheduler_core_rs::orchestrator::{run, OrchestratorConfig, RunMetrics};
    /// use cpu_scheduler_core_rs::Process;
    ///
    /// let processes = vec![Process::new(1, 0, 10), Process::new(2, 0, 10)];
    /// let log = run(OrchestratorConfig::default(), processes.clone()).unwrap();
    /// let metrics = RunMetrics::from_log(&log, &processes);
    ///
    /// assert_eq!(metrics.total_ticks, 20);
    /// assert_eq!(metrics.process(2).unwrap().ready_time, 10);
    /// assert_eq!(metrics.cpu_utilization(), 1.0);
    /// ```
    pub fn from_log(log: &EventLog, processes: &[Process]) -> Self {
        let mut metrics: Vec<ProcessMetrics> = processes
            .iter()
            .map(|p| ProcessMetrics {
                pid: p.pid(),
                arrival_time: p.arrival_time(),
                processing_time: p.processing_time(),
                ..ProcessMetrics::default()
            })
            .collect();
        let index: HashMap<Pid, usize> = metrics
            .iter()
            .enumerate()
            .map(|(i, m)| (m.pid, i))
            .collect();

        // Tick each process entered its current state
        let mut entered_at: HashMap<Pid, usize> = HashMap::new();
        let mut total_ticks = 0;

        for event in log.events() {
            match *event {
                Event::Transition {
                    tick,
                    pid,
                    from,
                    to,
                } => {
                    total_ticks = total_ticks.max(tick);
                    let Some(&i) = index.get(&pid) else {
                        continue;
                    };
                    let m = &mut metrics[i];
                    let since = entered_at.insert(pid, tick).unwrap_or(tick);
                    let spent = tick - since;

                    match from {
                        ProcessState::Ready => m.ready_time += spent,
                        ProcessState::Running => m.cpu_time += spent,
                        ProcessState::Waiting => m.io_time += spent,
                        ProcessState::NotAdmitted | ProcessState::Terminated => {}
                    }

                    match (from, to) {
                        (ProcessState::NotAdmitted, ProcessState::Ready) => {
                            m.admitted_at = Some(tick)
                        }
                        (_, ProcessState::Running) => {
                            m.num_dispatches += 1;
                            m.first_run_at.get_or_insert(tick);
                        }
                        (ProcessState::Running, ProcessState::Ready) => m.num_preemptions += 1,
                        (_, ProcessState::Waiting) => m.num_io_requests += 1,
                        (_, ProcessState::Terminated) => m.terminated_at = Some(tick),
                        _ => {}
                    }
                }
                Event::Footer { tick } => total_ticks = total_ticks.max(tick),
                Event::Header => {}
            }
        }

        let busy_ticks = metrics.iter().map(|m| m.cpu_time).sum();

        Self {
            processes: metrics,
            total_ticks,
            busy_ticks,
        }
    }

    /// Look up one process
    pub fn process(&self, pid: Pid) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|m| m.pid == pid)
    }

    /// Fraction of ticks the CPU was busy
    pub fn cpu_utilization(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        self.busy_ticks as f64 / self.total_ticks as f64
    }

    /// Mean turnaround over terminated processes
    pub fn average_turnaround(&self) -> Option<f64> {
        mean(self.processes.iter().filter_map(|m| m.turnaround_time()))
    }

    /// Mean ready-queue time over all processes
    pub fn average_ready_time(&self) -> Option<f64> {
        mean(self.processes.iter().map(|m| m.ready_time))
    }

    /// Mean response time over dispatched processes
    pub fn average_response(&self) -> Option<f64> {
        mean(self.processes.iter().filter_map(|m| m.response_time()))
    }

    /// Terminated processes per 1000 ticks
    pub fn throughput(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        let terminated = self
            .processes
            .iter()
            .filter(|m| m.terminated_at.is_some())
            .count();
        terminated as f64 * 1000.0 / self.total_ticks as f64
    }
}

fn mean(values: impl Iterator<Item = usize>) -> Option<f64> {
    let (sum, count) = values.fold((0usize, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}
