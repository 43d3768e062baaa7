//! Process model
//!
//! Represents one simulated process (a PCB). Each process has:
//! - Static description: PID, memory size, arrival time, CPU demand, I/O behaviour
//! - Mutable simulation state: remaining CPU time, start of the current
//!   RUNNING period, lifecycle state
//!
//! Smaller PID means higher external priority.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Process identifier (unique per run)
pub type Pid = u32;

/// Process lifecycle state
///
/// ```text
/// NotAdmitted -> Ready -> Running -> Waiting -> Ready
///                           |  \
///                           |   -> Terminated
///                           -> Ready (preemption)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Arrived (or not yet arrived) but holding no memory
    NotAdmitted,

    /// Admitted and waiting for the CPU
    Ready,

    /// Occupying the CPU
    Running,

    /// Blocked on I/O
    Waiting,

    /// Finished; memory released
    Terminated,
}

impl ProcessState {
    /// Check whether `self -> to` is an edge of the state machine
    pub fn can_transition_to(self, to: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, to),
            (NotAdmitted, Ready)
                | (Ready, Running)
                | (Running, Waiting)
                | (Running, Terminated)
                | (Running, Ready)
                | (Waiting, Ready)
        )
    }

    /// Label used in the transition table
    pub fn label(self) -> &'static str {
        match self {
            ProcessState::NotAdmitted => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Waiting => "WAITING",
            ProcessState::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors that can occur during process operations
#[derive(Debug, Error, PartialEq)]
pub enum ProcessError {
    #[error("Process {pid}: illegal transition {from} -> {to}")]
    IllegalTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },

    #[error("Process {pid} cannot execute in state {state}")]
    NotRunning { pid: Pid, state: ProcessState },

    #[error("Process {pid} has no CPU time left")]
    AlreadyComplete { pid: Pid },
}

/// A simulated process
///
/// # Example
/// ```
/// use cpu_scheduler_core_rs::{Process, ProcessState};
///
/// let p = Process::new(1, 0, 10)
///     .with_io(3, 2)
///     .with_memory_size(8);
///
/// assert_eq!(p.remaining_time(), 10);
/// assert_eq!(p.state(), ProcessState::NotAdmitted);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Unique identifier, also the external priority
    pid: Pid,

    /// Memory required for admission (MB)
    memory_size: u32,

    /// Tick at which the process enters the system
    arrival_time: usize,

    /// Total CPU ms required
    processing_time: usize,

    /// CPU ms between I/O requests (0 = never blocks)
    io_frequency: usize,

    /// ms of I/O service per request
    io_duration: usize,

    /// CPU ms still to execute
    remaining_time: usize,

    /// Tick at which the most recent RUNNING period began
    start_time: Option<usize>,

    /// Current lifecycle state
    state: ProcessState,
}

impl Process {
    /// Create a new process with no I/O and no memory footprint
    ///
    /// # Panics
    /// Panics if processing_time == 0
    pub fn new(pid: Pid, arrival_time: usize, processing_time: usize) -> Self {
        assert!(processing_time > 0, "processing_time must be positive");

        Self {
            pid,
            memory_size: 0,
            arrival_time,
            processing_time,
            io_frequency: 0,
            io_duration: 0,
            remaining_time: processing_time,
            start_time: None,
            state: ProcessState::NotAdmitted,
        }
    }

    /// Block on I/O for `io_duration` ms after every `io_frequency` ms of CPU
    pub fn with_io(mut self, io_frequency: usize, io_duration: usize) -> Self {
        self.io_frequency = io_frequency;
        self.io_duration = io_duration;
        self
    }

    /// Set the memory needed for admission
    pub fn with_memory_size(mut self, memory_size: u32) -> Self {
        self.memory_size = memory_size;
        self
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn memory_size(&self) -> u32 {
        self.memory_size
    }

    pub fn arrival_time(&self) -> usize {
        self.arrival_time
    }

    pub fn processing_time(&self) -> usize {
        self.processing_time
    }

    pub fn io_frequency(&self) -> usize {
        self.io_frequency
    }

    pub fn io_duration(&self) -> usize {
        self.io_duration
    }

    pub fn remaining_time(&self) -> usize {
        self.remaining_time
    }

    pub fn start_time(&self) -> Option<usize> {
        self.start_time
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// CPU ms executed so far
    pub fn executed_time(&self) -> usize {
        self.processing_time - self.remaining_time
    }

    /// Check if all CPU demand has been served
    pub fn is_complete(&self) -> bool {
        self.remaining_time == 0
    }

    pub fn is_terminated(&self) -> bool {
        self.state == ProcessState::Terminated
    }

    /// Check if the process has arrived by `tick`
    pub fn has_arrived(&self, tick: usize) -> bool {
        self.arrival_time <= tick
    }

    /// Check if the process must block on I/O now
    ///
    /// True when executed time is a positive multiple of `io_frequency` and
    /// there is still CPU work left. `io_frequency == 0` never blocks.
    pub fn io_due(&self) -> bool {
        let executed = self.executed_time();
        self.io_frequency > 0
            && executed > 0
            && executed % self.io_frequency == 0
            && self.remaining_time > 0
    }

    /// Move to `to`, enforcing the state machine
    ///
    /// Entering RUNNING records `tick` as the start of the running window.
    pub fn transition(&mut self, to: ProcessState, tick: usize) -> Result<(), ProcessError> {
        if !self.state.can_transition_to(to) {
            return Err(ProcessError::IllegalTransition {
                pid: self.pid,
                from: self.state,
                to,
            });
        }

        if to == ProcessState::Running {
            self.start_time = Some(tick);
        }
        self.state = to;
        Ok(())
    }

    /// Execute one ms of CPU
    ///
    /// Returns the remaining time after execution.
    pub fn execute_tick(&mut self) -> Result<usize, ProcessError> {
        if self.state != ProcessState::Running {
            return Err(ProcessError::NotRunning {
                pid: self.pid,
                state: self.state,
            });
        }
        if self.remaining_time == 0 {
            return Err(ProcessError::AlreadyComplete { pid: self.pid });
        }

        self.remaining_time -= 1;
        Ok(self.remaining_time)
    }
}
