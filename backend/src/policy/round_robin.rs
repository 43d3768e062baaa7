//! Round-Robin Policy
//!
//! Strict FIFO over the ready queue with a fixed time slice. A process whose
//! slice ends without blocking or finishing is put back at the tail and the
//! CPU is left idle for the next tick's dispatch.
//!
//! Every dispatch opens a fresh slice, including a dispatch after an I/O block.

use super::SchedulingPolicy;
use crate::models::queues::ReadyQueue;

/// FIFO with a fixed quantum
///
/// # Example
///
/// ```
/// use cpu_scheduler_core_rs::policy::{RoundRobinPolicy, SchedulingPolicy};
/// use cpu_scheduler_core_rs::models::ReadyQueue;
///
/// let policy = RoundRobinPolicy::new(100);
/// let mut ready = ReadyQueue::new();
/// ready.push_back(9);
/// ready.push_back(1);
///
/// assert_eq!(policy.select_next(&ready), Some(0)); // head, not smallest PID
/// assert!(policy.quantum_expired(100));
/// assert!(!policy.quantum_expired(99));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RoundRobinPolicy {
    quantum: usize,
}

impl RoundRobinPolicy {
    /// # Panics
    /// Panics if quantum == 0
    pub fn new(quantum: usize) -> Self {
        assert!(quantum > 0, "quantum must be positive");
        Self { quantum }
    }
}

impl SchedulingPolicy for RoundRobinPolicy {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn select_next(&self, ready: &ReadyQueue) -> Option<usize> {
        if ready.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn quantum(&self) -> Option<usize> {
        Some(self.quantum)
    }
}
