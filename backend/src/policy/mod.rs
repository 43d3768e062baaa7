//! Scheduling Policy Module
//!
//! This module defines the dispatch interface shared by every scheduling
//! policy. The tick engine owns the queues and the state machine; a policy
//! only answers three questions:
//!
//! - which ready process runs next when the CPU is idle ([`select_next`])
//! - whether a ready process should take the CPU from the running one at the
//!   start of a tick ([`preempt_for`])
//! - whether the running process has used up its quantum at the end of a
//!   tick ([`quantum_expired`])
//!
//! # Policy Interface
//!
//! ```rust
//! use cpu_scheduler_core_rs::policy::SchedulingPolicy;
//! use cpu_scheduler_core_rs::models::ReadyQueue;
//!
//! /// Always runs the most recently readied process
//! struct Lifo;
//!
//! impl SchedulingPolicy for Lifo {
//!     fn name(&self) -> &'static str {
//!         "LIFO"
//!     }
//!
//!     fn select_next(&self, ready: &ReadyQueue) -> Option<usize> {
//!         ready.len().checked_sub(1)
//!     }
//! }
//! ```
//!
//! Available policies:
//! 1. **ExternalPriority**: smallest PID first, never preempted
//! 2. **RoundRobin**: FIFO with a fixed quantum
//! 3. **PreemptivePriority**: smallest PID first, preempts on a smaller-PID
//!    ready process, quantum among the rest
//!
//! [`select_next`]: SchedulingPolicy::select_next
//! [`preempt_for`]: SchedulingPolicy::preempt_for
//! [`quantum_expired`]: SchedulingPolicy::quantum_expired

use crate::models::process::Pid;
use crate::models::queues::ReadyQueue;
use serde::{Deserialize, Serialize};

pub mod external_priority;
pub mod preemptive_priority;
pub mod round_robin;

pub use external_priority::ExternalPriorityPolicy;
pub use preemptive_priority::PreemptivePriorityPolicy;
pub use round_robin::RoundRobinPolicy;

/// Default Round-Robin quantum (ms)
pub const DEFAULT_QUANTUM: usize = 100;

/// Dispatch decisions for the tick engine
pub trait SchedulingPolicy {
    /// Short policy name for logs
    fn name(&self) -> &'static str;

    /// Position in the ready queue of the process to dispatch on an idle CPU
    ///
    /// Returns `None` only when the queue is empty.
    fn select_next(&self, ready: &ReadyQueue) -> Option<usize>;

    /// Position in the ready queue of a process that should preempt `running`
    /// right now, if any
    fn preempt_for(&self, _running: Pid, _ready: &ReadyQueue) -> Option<usize> {
        None
    }

    /// Time slice, if the policy uses one
    fn quantum(&self) -> Option<usize> {
        None
    }

    /// Check whether a running window of `window_length` ticks (counting the
    /// tick just executed) ends the slice
    fn quantum_expired(&self, window_length: usize) -> bool {
        match self.quantum() {
            Some(quantum) => window_length % quantum == 0,
            None => false,
        }
    }
}

/// Policy selection for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Non-preemptive external priority (smaller PID first)
    ExternalPriority,

    /// FIFO Round-Robin
    RoundRobin {
        /// Time slice in ms
        quantum: usize,
    },

    /// Preemptive external priority with Round-Robin time slicing
    PreemptivePriority {
        /// Time slice in ms
        quantum: usize,
    },
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig::ExternalPriority
    }
}

impl PolicyConfig {
    /// Round-Robin with the default quantum
    pub fn round_robin() -> Self {
        PolicyConfig::RoundRobin {
            quantum: DEFAULT_QUANTUM,
        }
    }

    /// Preemptive priority with the default quantum
    pub fn preemptive_priority() -> Self {
        PolicyConfig::PreemptivePriority {
            quantum: DEFAULT_QUANTUM,
        }
    }

    /// Configured quantum, if the policy slices time
    pub fn quantum(&self) -> Option<usize> {
        match self {
            PolicyConfig::ExternalPriority => None,
            PolicyConfig::RoundRobin { quantum } => Some(*quantum),
            PolicyConfig::PreemptivePriority { quantum } => Some(*quantum),
        }
    }

    /// Build the policy
    ///
    /// # Panics
    ///
    /// Panics if a quantum is zero (validated by the orchestrator first)
    pub fn build(&self) -> Box<dyn SchedulingPolicy> {
        match self {
            PolicyConfig::ExternalPriority => Box::new(ExternalPriorityPolicy::new()),
            PolicyConfig::RoundRobin { quantum } => Box::new(RoundRobinPolicy::new(*quantum)),
            PolicyConfig::PreemptivePriority { quantum } => {
                Box::new(PreemptivePriorityPolicy::new(*quantum))
            }
        }
    }
}
