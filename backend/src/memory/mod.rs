//! Memory Admission
//!
//! A process becomes schedulable only once it holds memory. The engine asks a
//! [`MemoryGateway`] for a yes/no decision every tick the process is pending,
//! and hands the memory back when the process terminates.
//!
//! # Admission Flow
//!
//! ```text
//! arrival_time <= now ──► try_admit ──► true  ──► READY (memory held)
//!                             │
//!                             └──────► false ──► stay NOT_ADMITTED, retry next tick
//!
//! TERMINATED ──► release (memory returned to the pool)
//! ```
//!
//! # Critical Invariants
//!
//! - **No side effects on failure**: a rejected `try_admit` leaves the pool untouched
//! - **One holding per PID**: a process holds at most one allocation at a time
//!
//! # Example
//!
//! ```rust
//! use cpu_scheduler_core_rs::memory::{FixedPartitionMemory, MemoryGateway};
//! use cpu_scheduler_core_rs::Process;
//!
//! let mut memory = FixedPartitionMemory::new(vec![10, 4]);
//! let small = Process::new(1, 0, 5).with_memory_size(3);
//! let large = Process::new(2, 0, 5).with_memory_size(9);
//!
//! assert!(memory.try_admit(&small));
//! assert_eq!(memory.partition_of(1), Some(2)); // smallest partition that fits
//! assert!(memory.try_admit(&large));
//! assert!(!memory.try_admit(&Process::new(3, 0, 5)));
//!
//! memory.release(&small);
//! assert!(memory.try_admit(&Process::new(3, 0, 5)));
//! ```

pub mod partitions;

pub use partitions::{FixedPartitionMemory, Partition, DEFAULT_PARTITION_SIZES};

use crate::models::process::Process;
use serde::{Deserialize, Serialize};

/// Yes/no memory admission plus release on termination
pub trait MemoryGateway {
    /// Try to give `process` memory; `false` leaves all state unchanged
    fn try_admit(&mut self, process: &Process) -> bool;

    /// Return the memory held by `process`
    fn release(&mut self, process: &Process);

    /// Largest request this gateway could ever satisfy, if bounded
    ///
    /// Used to reject processes that could never be admitted.
    fn max_admissible_size(&self) -> Option<u32> {
        None
    }
}

/// Gateway that admits every process
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlimitedMemory;

impl MemoryGateway for UnlimitedMemory {
    fn try_admit(&mut self, _process: &Process) -> bool {
        true
    }

    fn release(&mut self, _process: &Process) {}
}

/// Memory gateway selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemoryConfig {
    /// Fixed partitions, listed largest first; numbered from 1
    FixedPartitions { sizes: Vec<u32> },

    /// Every process is admitted on arrival
    Unlimited,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig::FixedPartitions {
            sizes: DEFAULT_PARTITION_SIZES.to_vec(),
        }
    }
}

impl MemoryConfig {
    /// Build the configured gateway
    pub fn build(&self) -> Box<dyn MemoryGateway> {
        match self {
            MemoryConfig::FixedPartitions { sizes } => {
                Box::new(FixedPartitionMemory::new(sizes.clone()))
            }
            MemoryConfig::Unlimited => Box::new(UnlimitedMemory),
        }
    }
}
