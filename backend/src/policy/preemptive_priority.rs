//! Preemptive External Priority Policy with Round-Robin slicing
//!
//! Dispatch picks the smallest ready PID. At the start of every tick, a ready
//! process with a strictly smaller PID than the running one takes the CPU
//! immediately, mid-slice. Otherwise the running process is demoted when its
//! quantum ends, exactly as under Round-Robin.

use super::SchedulingPolicy;
use crate::models::process::Pid;
use crate::models::queues::ReadyQueue;

/// Smallest PID first, preempting, with a quantum
///
/// # Example
///
/// ```
/// use cpu_scheduler_core_rs::policy::{PreemptivePriorityPolicy, SchedulingPolicy};
/// use cpu_scheduler_core_rs::models::ReadyQueue;
///
/// let policy = PreemptivePriorityPolicy::new(100);
/// let mut ready = ReadyQueue::new();
/// ready.push_back(5);
/// ready.push_back(1);
///
/// assert_eq!(policy.preempt_for(2, &ready), Some(1)); // PID 1 beats PID 2
/// assert_eq!(policy.preempt_for(1, &ready), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PreemptivePriorityPolicy {
    quantum: usize,
}

impl PreemptivePriorityPolicy {
    /// # Panics
    /// Panics if quantum == 0
    pub fn new(quantum: usize) -> Self {
        assert!(quantum > 0, "quantum must be positive");
        Self { quantum }
    }
}

impl SchedulingPolicy for PreemptivePriorityPolicy {
    fn name(&self) -> &'static str {
        "EP_RR"
    }

    fn select_next(&self, ready: &ReadyQueue) -> Option<usize> {
        ready.position_of_min_pid()
    }

    fn preempt_for(&self, running: Pid, ready: &ReadyQueue) -> Option<usize> {
        let position = ready.position_of_min_pid()?;
        match ready.get(position) {
            Some(candidate) if candidate < running => Some(position),
            _ => None,
        }
    }

    fn quantum(&self) -> Option<usize> {
        Some(self.quantum)
    }
}
