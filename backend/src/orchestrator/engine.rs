//! Orchestrator Engine
//!
//! Main simulation loop integrating all components:
//! - Arrivals and memory admission (with retry of earlier rejections)
//! - I/O completions
//! - Policy decisions (preemption, dispatch, quantum expiry)
//! - One millisecond of CPU execution per tick
//! - Event logging (complete transition history)
//!
//! # Architecture
//!
//! For each tick `t`, in this fixed order (the log depends on it):
//!
//! ```text
//! 1. Arrivals: admit processes with arrival_time == t
//! 2. Pending retry: re-attempt admission for every arrived, unadmitted process
//! 3. I/O completions: WAITING -> READY for completion_tick == t
//! 4. Preemption check (policy): RUNNING -> READY, READY -> RUNNING, both at t
//! 5. Idle dispatch (policy): READY -> RUNNING at t
//! 6. Execute 1 ms, then at t+1 exactly one of:
//!      a. RUNNING -> WAITING     (I/O due, work left)
//!      b. RUNNING -> TERMINATED  (no work left, memory released)
//!      c. RUNNING -> READY       (quantum expired)
//! 7. Advance time
//! ```
//!
//! The run ends once every process is TERMINATED; the footer is logged then.
//!
//! # Example
//!
//! ```rust
//! use cpu_scheduler_core_rs::orchestrator::{Orchestrator, OrchestratorConfig};
//! use cpu_scheduler_core_rs::{Process, ProcessState};
//!
//! let processes = vec![Process::new(1, 0, 5)];
//! let mut orchestrator = Orchestrator::new(OrchestratorConfig::default(), processes).unwrap();
//! orchestrator.run_to_completion().unwrap();
//!
//! let terminated = orchestrator
//!     .event_log()
//!     .transitions()
//!     .find(|t| t.to == ProcessState::Terminated)
//!     .unwrap();
//! assert_eq!(terminated.tick, 5);
//! ```

use crate::core::time::TimeManager;
use crate::memory::{MemoryConfig, MemoryGateway};
use crate::models::event::{Event, EventLog};
use crate::models::process::{Pid, Process, ProcessError, ProcessState};
use crate::models::state::SimulationState;
use crate::orchestrator::snapshot::{compute_config_hash, StateSnapshot};
use crate::policy::{PolicyConfig, SchedulingPolicy};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete orchestrator configuration
///
/// # Fields
///
/// * `policy` - Scheduling policy and its quantum
/// * `memory` - Memory admission gateway
/// * `max_ticks` - Abort the run if it has not finished by this tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub policy: PolicyConfig,

    pub memory: MemoryConfig,

    /// `None` runs until every process terminates
    pub max_ticks: Option<usize>,
}

impl OrchestratorConfig {
    /// Config for `policy` with default memory and no tick limit
    pub fn with_policy(policy: PolicyConfig) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }
}

/// Simulation error types
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Duplicate PID: {0}")]
    DuplicatePid(Pid),

    #[error("Process {pid} needs {size} MB but the largest admissible request is {max} MB")]
    NeverAdmissible { pid: Pid, size: u32, max: u32 },

    #[error("Process not found: {0}")]
    ProcessNotFound(Pid),

    #[error("Simulation did not finish within {limit} ticks")]
    TickLimitExceeded { limit: usize },

    #[error("Simulation already finished")]
    AlreadyFinished,

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("State validation error: {0}")]
    StateValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result of a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickResult {
    /// Tick number
    pub tick: usize,

    /// Processes that received memory this tick
    pub num_admissions: usize,

    /// WAITING -> READY transitions
    pub num_io_completions: usize,

    /// Running processes displaced by a higher-priority one
    pub num_preemptions: usize,

    /// READY -> RUNNING transitions
    pub num_dispatches: usize,

    /// RUNNING -> WAITING transitions
    pub num_io_requests: usize,

    pub num_terminations: usize,

    /// RUNNING -> READY at the end of a time slice
    pub num_quantum_expiries: usize,

    /// Process that executed during this tick (None = CPU idle)
    pub executed: Option<Pid>,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Tick engine owning the simulation state and the transition log
///
/// # Determinism
///
/// There is no randomness and no wall-clock dependency: same config + same
/// process list = identical log.
pub struct Orchestrator {
    /// Process table and queues
    state: SimulationState,

    /// Time management
    time_manager: TimeManager,

    /// Dispatch decisions
    policy: Box<dyn SchedulingPolicy>,

    /// Memory admission gateway
    memory: Box<dyn MemoryGateway>,

    config: OrchestratorConfig,

    /// SHA-256 of the canonical config, for snapshots
    config_hash: String,

    /// Event log (all transitions)
    event_log: EventLog,

    /// Ticks during which the CPU executed a process
    busy_ticks: usize,
}

impl Orchestrator {
    /// Create new orchestrator using the configured memory gateway
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - header logged, ready for tick 0
    /// * `Err(SimulationError)` - configuration or process list invalid
    pub fn new(config: OrchestratorConfig, processes: Vec<Process>) -> Result<Self, SimulationError> {
        // No partition could ever be granted, so the run would never end
        if matches!(&config.memory, MemoryConfig::FixedPartitions { sizes } if sizes.is_empty()) {
            return Err(SimulationError::InvalidConfig(
                "partition table must not be empty".to_string(),
            ));
        }

        let memory = config.memory.build();
        Self::with_memory(config, processes, memory)
    }

    /// Create new orchestrator with an externally supplied memory gateway
    ///
    /// `config.memory` is ignored apart from the config hash.
    pub fn with_memory(
        config: OrchestratorConfig,
        processes: Vec<Process>,
        memory: Box<dyn MemoryGateway>,
    ) -> Result<Self, SimulationError> {
        Self::validate_config(&config, &processes, memory.as_ref())?;

        let config_hash = compute_config_hash(&config)?;
        let policy = config.policy.build();

        info!(
            "Starting {} simulation of {} processes",
            policy.name(),
            processes.len()
        );

        let mut event_log = EventLog::new();
        event_log.log(Event::Header);

        Ok(Self {
            state: SimulationState::new(processes),
            time_manager: TimeManager::new(),
            policy,
            memory,
            config,
            config_hash,
            event_log,
            busy_ticks: 0,
        })
    }

    /// Validate configuration
    fn validate_config(
        config: &OrchestratorConfig,
        processes: &[Process],
        memory: &dyn MemoryGateway,
    ) -> Result<(), SimulationError> {
        if config.policy.quantum() == Some(0) {
            return Err(SimulationError::InvalidConfig(
                "quantum must be > 0".to_string(),
            ));
        }

        let mut pids = HashSet::new();
        for process in processes {
            if !pids.insert(process.pid()) {
                return Err(SimulationError::DuplicatePid(process.pid()));
            }
        }

        // A process no gateway state could ever fit would keep the run alive forever
        if let Some(max) = memory.max_admissible_size() {
            if let Some(process) = processes.iter().find(|p| p.memory_size() > max) {
                return Err(SimulationError::NeverAdmissible {
                    pid: process.pid(),
                    size: process.memory_size(),
                    max,
                });
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get current tick number
    pub fn current_tick(&self) -> usize {
        self.time_manager.current_tick()
    }

    /// Get reference to simulation state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Get reference to event log
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Consume the orchestrator, keeping only its log
    pub fn into_event_log(self) -> EventLog {
        self.event_log
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Ticks during which a process executed
    pub fn busy_ticks(&self) -> usize {
        self.busy_ticks
    }

    /// Check if the footer has been logged
    pub fn is_finished(&self) -> bool {
        self.event_log.is_closed()
    }

    /// Capture the current state for inspection or validation
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(&self.state, self.current_tick(), self.config_hash.clone())
    }

    // ========================================================================
    // Event Logging
    // ========================================================================

    fn log_event(&mut self, event: Event) {
        self.event_log.log(event);
    }

    /// Apply a checked state change and log it
    fn transition(&mut self, pid: Pid, to: ProcessState, tick: usize) -> Result<(), SimulationError> {
        let process = self
            .state
            .get_process_mut(pid)
            .ok_or(SimulationError::ProcessNotFound(pid))?;
        let from = process.state();
        process.transition(to, tick)?;

        debug!("t={} PID {}: {} -> {}", tick, pid, from, to);
        self.log_event(Event::Transition { tick, pid, from, to });
        Ok(())
    }

    /// Log the footer once every process has terminated
    fn finish(&mut self) {
        let tick = self.current_tick();
        info!(
            "All {} processes terminated at t={} ({} busy ticks)",
            self.state.num_processes(),
            tick,
            self.busy_ticks
        );
        self.log_event(Event::Footer { tick });
    }

    // ========================================================================
    // Tick Loop Implementation
    // ========================================================================

    /// Execute one simulation tick
    ///
    /// # Returns
    ///
    /// * `Ok(TickResult)` - Tick executed successfully
    /// * `Err(SimulationError)` - run already finished, tick limit hit, or an
    ///   internal state machine violation
    pub fn tick(&mut self) -> Result<TickResult, SimulationError> {
        if self.is_finished() {
            return Err(SimulationError::AlreadyFinished);
        }

        let now = self.current_tick();
        if let Some(limit) = self.config.max_ticks {
            if now >= limit {
                return Err(SimulationError::TickLimitExceeded { limit });
            }
        }

        let mut result = TickResult {
            tick: now,
            ..TickResult::default()
        };

        // STEP 1: ARRIVALS
        for pid in self.state.arrivals_at(now) {
            if self.try_admit(pid, now)? {
                result.num_admissions += 1;
            }
        }

        // STEP 2: PENDING RETRY
        // Covers every arrived process still without memory, including the
        // ones rejected in step 1
        for pid in self.state.pending_admission(now) {
            if self.try_admit(pid, now)? {
                result.num_admissions += 1;
            }
        }

        // STEP 3: I/O COMPLETIONS
        for pid in self.state.take_io_completions(now) {
            self.transition(pid, ProcessState::Ready, now)?;
            self.state.enqueue_ready(pid);
            result.num_io_completions += 1;
        }

        // STEP 4: PREEMPTION CHECK
        if let Some(running) = self.state.running() {
            if let Some(position) = self.policy.preempt_for(running, self.state.ready()) {
                let preemptor = self
                    .state
                    .dequeue_ready(position)
                    .ok_or_else(|| {
                        SimulationError::StateValidationError(format!(
                            "ready queue has no position {}",
                            position
                        ))
                    })?;

                self.state.take_running();
                self.transition(running, ProcessState::Ready, now)?;
                self.state.enqueue_ready(running);
                self.dispatch(preemptor, now)?;

                result.num_preemptions += 1;
                result.num_dispatches += 1;
            }
        }

        // STEP 5: IDLE DISPATCH
        if self.state.running().is_none() {
            if let Some(position) = self.policy.select_next(self.state.ready()) {
                if let Some(pid) = self.state.dequeue_ready(position) {
                    self.dispatch(pid, now)?;
                    result.num_dispatches += 1;
                }
            }
        }

        // STEP 6: EXECUTION
        if let Some(pid) = self.state.running() {
            self.execute_running(pid, &mut result)?;
        }

        // STEP 7: ADVANCE TIME
        self.time_manager.advance_tick();

        if self.state.all_terminated() {
            self.finish();
        }

        Ok(result)
    }

    /// Run ticks until every process has terminated
    ///
    /// An empty process list finishes immediately without executing a tick.
    pub fn run_to_completion(&mut self) -> Result<(), SimulationError> {
        if self.state.all_terminated() && !self.is_finished() {
            self.finish();
        }

        while !self.is_finished() {
            self.tick()?;
        }

        Ok(())
    }

    // ========================================================================
    // Tick Steps
    // ========================================================================

    /// Ask the gateway for memory; on success NOT_ADMITTED -> READY
    fn try_admit(&mut self, pid: Pid, now: usize) -> Result<bool, SimulationError> {
        let process = self
            .state
            .get_process(pid)
            .ok_or(SimulationError::ProcessNotFound(pid))?;

        if !self.memory.try_admit(process) {
            trace!(
                "t={} PID {} ({} MB) not admitted, retrying next tick",
                now,
                pid,
                process.memory_size()
            );
            return Ok(false);
        }

        self.transition(pid, ProcessState::Ready, now)?;
        self.state.enqueue_ready(pid);
        Ok(true)
    }

    /// READY -> RUNNING on the (idle) CPU
    fn dispatch(&mut self, pid: Pid, now: usize) -> Result<(), SimulationError> {
        self.transition(pid, ProcessState::Running, now)?;
        self.state.set_running(pid);
        Ok(())
    }

    /// Execute one ms of the running process and apply the end-of-tick outcome
    fn execute_running(&mut self, pid: Pid, result: &mut TickResult) -> Result<(), SimulationError> {
        let now = self.current_tick();
        let end_of_tick = self.time_manager.end_of_tick();

        let process = self
            .state
            .get_process_mut(pid)
            .ok_or(SimulationError::ProcessNotFound(pid))?;
        process.execute_tick()?;
        let io_due = process.io_due();
        let complete = process.is_complete();
        let io_duration = process.io_duration();
        let window_start = process.start_time().unwrap_or(now);

        self.busy_ticks += 1;
        result.executed = Some(pid);

        if io_due {
            self.state.take_running();
            self.transition(pid, ProcessState::Waiting, end_of_tick)?;
            self.state.block(pid, end_of_tick + io_duration);
            result.num_io_requests += 1;
        } else if complete {
            self.state.take_running();
            self.transition(pid, ProcessState::Terminated, end_of_tick)?;
            let process = self
                .state
                .get_process(pid)
                .ok_or(SimulationError::ProcessNotFound(pid))?;
            self.memory.release(process);
            self.state.mark_terminated();
            result.num_terminations += 1;
        } else if self
            .policy
            .quantum_expired(self.time_manager.window_length(window_start))
        {
            self.state.take_running();
            self.transition(pid, ProcessState::Ready, end_of_tick)?;
            self.state.enqueue_ready(pid);
            result.num_quantum_expiries += 1;
        }

        Ok(())
    }
}

/// Run `processes` to completion and return the transition log
///
/// # Example
///
/// ```rust
/// use cpu_scheduler_core_rs::orchestrator::{run, OrchestratorConfig};
/// use cpu_scheduler_core_rs::Process;
///
/// let log = run(OrchestratorConfig::default(), vec![Process::new(1, 0, 5)]).unwrap();
/// assert!(log.is_closed());
/// assert_eq!(log.transitions().count(), 3);
/// ```
pub fn run(config: OrchestratorConfig, processes: Vec<Process>) -> Result<EventLog, SimulationError> {
    let mut orchestrator = Orchestrator::new(config, processes)?;
    orchestrator.run_to_completion()?;
    Ok(orchestrator.into_event_log())
}
