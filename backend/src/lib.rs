//! CPU Scheduler Simulator Core - Rust Engine
//!
//! Deterministic, tick-driven simulation of CPU scheduling for a fixed batch
//! of processes, producing a timestamped log of every state transition.
//!
//! # Architecture
//!
//! - **core**: Time management
//! - **models**: Domain types (Process, queues, State, Event log)
//! - **memory**: Memory admission gateways
//! - **policy**: Scheduling policies (EP, RR, EP+RR)
//! - **orchestrator**: Main simulation loop, snapshots, metrics
//! - **input**: Process input parsing
//! - **report**: Transition table rendering
//!
//! # Critical Invariants
//!
//! 1. Every process is in exactly one of {not admitted, ready, running,
//!    waiting, terminated} at every tick boundary
//! 2. The per-tick step order is fixed; the log order depends on it
//! 3. The log is append-only
//!
//! # Example
//!
//! ```rust
//! use cpu_scheduler_core_rs::orchestrator::{run, OrchestratorConfig};
//! use cpu_scheduler_core_rs::policy::PolicyConfig;
//! use cpu_scheduler_core_rs::input::parse_processes;
//! use cpu_scheduler_core_rs::report::render_table;
//!
//! let processes = parse_processes("1, 10, 0, 30, 0, 0\n2, 10, 5, 10, 0, 0\n").unwrap();
//! let config = OrchestratorConfig::with_policy(PolicyConfig::preemptive_priority());
//! let log = run(config, processes).unwrap();
//! println!("{}", render_table(&log));
//! ```

// Module declarations
pub mod core;
pub mod input;
pub mod memory;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod report;

// Re-exports for convenience
pub use crate::core::time::TimeManager;
pub use input::{InputError, ProcessSpec};
pub use memory::{FixedPartitionMemory, MemoryConfig, MemoryGateway, UnlimitedMemory};
pub use models::{
    event::{Event, EventLog, Transition},
    process::{Pid, Process, ProcessError, ProcessState},
    state::SimulationState,
};
pub use orchestrator::{
    run, Orchestrator, OrchestratorConfig, RunMetrics, SimulationError, StateSnapshot, TickResult,
};
pub use policy::{PolicyConfig, SchedulingPolicy};
