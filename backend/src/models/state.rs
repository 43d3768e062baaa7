//! Simulation State
//!
//! The queue manager: one authoritative table of process records plus the
//! ready queue, the wait set and the running slot, which refer to records by
//! PID only.
//!
//! # Critical Invariants
//!
//! 1. **Partition**: every process is in exactly one of {not admitted, ready
//!    queue, running slot, wait set, terminated}, and that place agrees with
//!    its `ProcessState`
//! 2. **PID Uniqueness**: each PID appears exactly once in the table
//! 3. **Single CPU**: at most one process is RUNNING

use crate::models::process::{Pid, Process, ProcessState};
use crate::models::queues::{ReadyQueue, WaitSet};
use std::collections::HashMap;

/// Complete scheduler state
///
/// # Example
///
/// ```rust
/// use cpu_scheduler_core_rs::{Process, SimulationState};
///
/// let state = SimulationState::new(vec![
///     Process::new(1, 0, 10),
///     Process::new(2, 5, 20),
/// ]);
/// assert_eq!(state.num_processes(), 2);
/// assert!(state.running().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// All processes, in input order
    processes: Vec<Process>,

    /// PID -> position in `processes`
    index: HashMap<Pid, usize>,

    ready: ReadyQueue,

    waiting: WaitSet,

    /// The CPU: `None` when idle
    running: Option<Pid>,

    num_terminated: usize,
}

impl SimulationState {
    /// Create state from an input-ordered process list
    ///
    /// # Panics
    ///
    /// Panics if a PID appears twice (callers validate first)
    pub fn new(processes: Vec<Process>) -> Self {
        let mut index = HashMap::with_capacity(processes.len());
        for (position, process) in processes.iter().enumerate() {
            let previous = index.insert(process.pid(), position);
            assert!(previous.is_none(), "PID {} already exists", process.pid());
        }

        Self {
            processes,
            index,
            ready: ReadyQueue::new(),
            waiting: WaitSet::new(),
            running: None,
            num_terminated: 0,
        }
    }

    /// Get reference to a process by PID
    pub fn get_process(&self, pid: Pid) -> Option<&Process> {
        self.index.get(&pid).map(|&position| &self.processes[position])
    }

    /// Get mutable reference to a process by PID
    pub fn get_process_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        match self.index.get(&pid) {
            Some(&position) => Some(&mut self.processes[position]),
            None => None,
        }
    }

    /// All processes in input order
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn num_processes(&self) -> usize {
        self.processes.len()
    }

    pub fn num_terminated(&self) -> usize {
        self.num_terminated
    }

    /// Check if every process has terminated
    pub fn all_terminated(&self) -> bool {
        self.num_terminated == self.processes.len()
    }

    // ========================================================================
    // Admission
    // ========================================================================

    /// PIDs whose arrival time is exactly `tick`, in input order
    pub fn arrivals_at(&self, tick: usize) -> Vec<Pid> {
        self.processes
            .iter()
            .filter(|p| p.arrival_time() == tick && p.state() == ProcessState::NotAdmitted)
            .map(|p| p.pid())
            .collect()
    }

    /// PIDs that have arrived by `tick` but hold no memory, in input order
    pub fn pending_admission(&self, tick: usize) -> Vec<Pid> {
        self.processes
            .iter()
            .filter(|p| p.has_arrived(tick) && p.state() == ProcessState::NotAdmitted)
            .map(|p| p.pid())
            .collect()
    }

    // ========================================================================
    // Ready Queue
    // ========================================================================

    pub fn ready(&self) -> &ReadyQueue {
        &self.ready
    }

    /// Append a READY process to the ready queue
    pub fn enqueue_ready(&mut self, pid: Pid) {
        self.ready.push_back(pid);
    }

    /// Remove the process at `position` of the ready queue
    pub fn dequeue_ready(&mut self, position: usize) -> Option<Pid> {
        self.ready.remove(position)
    }

    // ========================================================================
    // Wait Set
    // ========================================================================

    pub fn waiting(&self) -> &WaitSet {
        &self.waiting
    }

    /// Block a process until `completion_tick`
    pub fn block(&mut self, pid: Pid, completion_tick: usize) {
        self.waiting.insert(pid, completion_tick);
    }

    /// Remove and return processes whose I/O completes at `tick`
    pub fn take_io_completions(&mut self, tick: usize) -> Vec<Pid> {
        self.waiting.take_completed(tick)
    }

    // ========================================================================
    // Running Slot
    // ========================================================================

    /// PID occupying the CPU
    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    /// Put a process on the idle CPU
    ///
    /// # Panics
    ///
    /// Panics if the CPU is already occupied
    pub fn set_running(&mut self, pid: Pid) {
        assert!(
            self.running.is_none(),
            "CPU already occupied by PID {:?}",
            self.running
        );
        self.running = Some(pid);
    }

    /// Vacate the CPU
    pub fn take_running(&mut self) -> Option<Pid> {
        self.running.take()
    }

    /// Record that a process has reached TERMINATED
    pub fn mark_terminated(&mut self) {
        self.num_terminated += 1;
    }

    /// Number of processes in each state
    pub fn state_counts(&self) -> HashMap<ProcessState, usize> {
        let mut counts = HashMap::new();
        for process in &self.processes {
            *counts.entry(process.state()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "PID 3 already exists")]
    fn test_duplicate_pid_panics() {
        SimulationState::new(vec![Process::new(3, 0, 1), Process::new(3, 1, 1)]);
    }

    #[test]
    fn test_pending_admission_respects_arrival() {
        let state = SimulationState::new(vec![
            Process::new(2, 4, 1),
            Process::new(1, 0, 1),
            Process::new(3, 9, 1),
        ]);

        assert_eq!(state.pending_admission(4), vec![2, 1]);
        assert_eq!(state.arrivals_at(4), vec![2]);
        assert!(state.arrivals_at(5).is_empty());
    }

    #[test]
    #[should_panic(expected = "CPU already occupied")]
    fn test_single_cpu() {
        let mut state = SimulationState::new(vec![Process::new(1, 0, 1), Process::new(2, 0, 1)]);
        state.set_running(1);
        state.set_running(2);
    }
}
