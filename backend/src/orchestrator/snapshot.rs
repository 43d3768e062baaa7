//! Snapshot - Inspect and Validate Simulation State
//!
//! Captures the process table and queues at a tick boundary in a
//! serializable form, and fingerprints configs and logs for determinism
//! checks.
//!
//! # Critical Invariants
//!
//! - **Partition**: each PID is in exactly one place, matching its state
//! - **Single CPU**: at most one RUNNING process
//! - **Monotonic Work**: remaining_time never exceeds processing_time
//! - **Determinism**: same config + input produces the same log digest

use crate::models::event::EventLog;
use crate::models::process::{Pid, Process, ProcessState};
use crate::models::queues::WaitEntry;
use crate::models::state::SimulationState;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Scheduler state at a tick boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Next tick to execute
    pub current_tick: usize,

    /// All processes, in input order
    pub processes: Vec<ProcessSnapshot>,

    /// Ready queue, head first
    pub ready_queue: Vec<Pid>,

    /// Blocked processes with their completion ticks
    pub waiting: Vec<WaitEntry>,

    /// CPU occupant
    pub running: Option<Pid>,

    /// SHA256 hash of the config the run was started with
    pub config_hash: String,
}

/// Process state snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub pid: Pid,
    pub state: ProcessState,
    pub arrival_time: usize,
    pub processing_time: usize,
    pub remaining_time: usize,
    pub start_time: Option<usize>,
}

impl From<&Process> for ProcessSnapshot {
    fn from(process: &Process) -> Self {
        ProcessSnapshot {
            pid: process.pid(),
            state: process.state(),
            arrival_time: process.arrival_time(),
            processing_time: process.processing_time(),
            remaining_time: process.remaining_time(),
            start_time: process.start_time(),
        }
    }
}

impl StateSnapshot {
    /// Capture `state` as of `current_tick`
    pub fn capture(state: &SimulationState, current_tick: usize, config_hash: String) -> Self {
        StateSnapshot {
            current_tick,
            processes: state.processes().iter().map(ProcessSnapshot::from).collect(),
            ready_queue: state.ready().to_vec(),
            waiting: state.waiting().entries().to_vec(),
            running: state.running(),
            config_hash,
        }
    }

    /// Look up one process
    pub fn process(&self, pid: Pid) -> Option<&ProcessSnapshot> {
        self.processes.iter().find(|p| p.pid == pid)
    }
}

// ============================================================================
// Hashing
// ============================================================================

/// Serialize to JSON with every object's keys sorted
fn canonical_json<T: Serialize>(value: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(value).map_err(|e| {
        SimulationError::SerializationError(format!("Serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Serialization failed: {}", e))
    })
}

fn sha256_hex(json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compute deterministic SHA256 hash of config
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    Ok(sha256_hex(&canonical_json(config)?))
}

/// Compute deterministic SHA256 digest of a transition log
///
/// Two runs with the same config and input must produce the same digest.
pub fn compute_log_digest(log: &EventLog) -> Result<String, SimulationError> {
    Ok(sha256_hex(&canonical_json(log)?))
}

// ============================================================================
// Validation Functions
// ============================================================================

fn violation(message: String) -> SimulationError {
    SimulationError::StateValidationError(message)
}

/// Validate snapshot integrity
///
/// Checks critical invariants:
/// - Every queued PID exists and has the state its place implies
/// - No PID is queued twice or in two places
/// - Every READY / WAITING / RUNNING process is actually queued
/// - remaining_time <= processing_time
pub fn validate_snapshot(snapshot: &StateSnapshot) -> Result<(), SimulationError> {
    let states: HashMap<Pid, ProcessState> =
        snapshot.processes.iter().map(|p| (p.pid, p.state)).collect();

    if states.len() != snapshot.processes.len() {
        return Err(violation("duplicate PID in process table".to_string()));
    }

    // 1. Each place holds only processes in the matching state
    let mut seen: HashMap<Pid, &'static str> = HashMap::new();
    let places = snapshot
        .ready_queue
        .iter()
        .map(|pid| (*pid, "ready queue", ProcessState::Ready))
        .chain(
            snapshot
                .waiting
                .iter()
                .map(|entry| (entry.pid, "wait set", ProcessState::Waiting)),
        )
        .chain(
            snapshot
                .running
                .iter()
                .map(|pid| (*pid, "running slot", ProcessState::Running)),
        );

    for (pid, place, expected) in places {
        let state = states
            .get(&pid)
            .ok_or_else(|| violation(format!("unknown PID {} in {}", pid, place)))?;
        if *state != expected {
            return Err(violation(format!(
                "PID {} in {} has state {}",
                pid, place, state
            )));
        }
        if let Some(previous) = seen.insert(pid, place) {
            return Err(violation(format!(
                "PID {} in both {} and {}",
                pid, previous, place
            )));
        }
    }

    // 2. Each queued state is actually in its place
    for process in &snapshot.processes {
        let queued = matches!(
            process.state,
            ProcessState::Ready | ProcessState::Waiting | ProcessState::Running
        );
        if queued && !seen.contains_key(&process.pid) {
            return Err(violation(format!(
                "PID {} is {} but not queued",
                process.pid, process.state
            )));
        }

        if process.remaining_time > process.processing_time {
            return Err(violation(format!(
                "PID {} has {} ms remaining of {} ms",
                process.pid, process.remaining_time, process.processing_time
            )));
        }

        if process.state == ProcessState::Terminated && process.remaining_time != 0 {
            return Err(violation(format!(
                "PID {} terminated with {} ms remaining",
                process.pid, process.remaining_time
            )));
        }
    }

    Ok(())
}
