//! Non-preemptive External Priority Policy
//!
//! The PID is the priority: the smallest ready PID is dispatched whenever the
//! CPU goes idle. Once running, a process keeps the CPU until it blocks on
//! I/O or terminates, whatever arrives in the meantime.

use super::SchedulingPolicy;
use crate::models::queues::ReadyQueue;

/// Smallest PID first, run to block or completion
///
/// # Example
///
/// ```
/// use cpu_scheduler_core_rs::policy::{ExternalPriorityPolicy, SchedulingPolicy};
/// use cpu_scheduler_core_rs::models::ReadyQueue;
///
/// let policy = ExternalPriorityPolicy::new();
/// let mut ready = ReadyQueue::new();
/// ready.push_back(4);
/// ready.push_back(2);
///
/// assert_eq!(policy.select_next(&ready), Some(1)); // PID 2
/// assert_eq!(policy.preempt_for(3, &ready), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalPriorityPolicy;

impl ExternalPriorityPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingPolicy for ExternalPriorityPolicy {
    fn name(&self) -> &'static str {
        "EP"
    }

    fn select_next(&self, ready: &ReadyQueue) -> Option<usize> {
        ready.position_of_min_pid()
    }
}
