//! Orchestrator - main simulation loop
//!
//! Implements the tick loop integrating admission, queues, policy and
//! execution. See `engine.rs` for the full implementation.

pub mod engine;
pub mod metrics;
pub mod snapshot;

// Re-export main types for convenience
pub use engine::{run, Orchestrator, OrchestratorConfig, SimulationError, TickResult};
pub use metrics::{ProcessMetrics, RunMetrics};
pub use snapshot::{
    compute_config_hash, compute_log_digest, validate_snapshot, ProcessSnapshot, StateSnapshot,
};
