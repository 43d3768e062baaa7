//! Domain models for the CPU scheduling simulator

pub mod event;
pub mod process;
pub mod queues;
pub mod state;

// Re-exports
pub use event::{Event, EventLog, Transition};
pub use process::{Pid, Process, ProcessError, ProcessState};
pub use queues::{ReadyQueue, WaitEntry, WaitSet};
pub use state::SimulationState;
