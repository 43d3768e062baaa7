//! Fixed-partition memory
//!
//! Memory is pre-split into numbered partitions of fixed size. Admission takes
//! the smallest free partition that fits by scanning from the last partition
//! towards the first, so partition tables should be listed largest first.

use super::MemoryGateway;
use crate::models::process::{Pid, Process};
use serde::{Deserialize, Serialize};

/// Partition sizes (MB), largest first
pub const DEFAULT_PARTITION_SIZES: [u32; 6] = [40, 25, 15, 10, 8, 2];

/// One fixed partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// 1-based partition number
    pub number: usize,
    pub size: u32,
    /// PID holding the partition, if any
    pub occupant: Option<Pid>,
}

impl Partition {
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Fixed-partition memory gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedPartitionMemory {
    partitions: Vec<Partition>,
}

impl FixedPartitionMemory {
    /// Create memory with one partition per size, numbered from 1
    pub fn new(sizes: Vec<u32>) -> Self {
        let partitions = sizes
            .into_iter()
            .enumerate()
            .map(|(i, size)| Partition {
                number: i + 1,
                size,
                occupant: None,
            })
            .collect();

        Self { partitions }
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Partition number held by `pid`
    pub fn partition_of(&self, pid: Pid) -> Option<usize> {
        self.partitions
            .iter()
            .find(|p| p.occupant == Some(pid))
            .map(|p| p.number)
    }

    /// Total size of free partitions
    pub fn free_memory(&self) -> u32 {
        self.partitions
            .iter()
            .filter(|p| p.is_free())
            .map(|p| p.size)
            .sum()
    }

    /// Total size of occupied partitions
    pub fn used_memory(&self) -> u32 {
        self.partitions
            .iter()
            .filter(|p| !p.is_free())
            .map(|p| p.size)
            .sum()
    }
}

impl Default for FixedPartitionMemory {
    fn default() -> Self {
        Self::new(DEFAULT_PARTITION_SIZES.to_vec())
    }
}

impl MemoryGateway for FixedPartitionMemory {
    fn try_admit(&mut self, process: &Process) -> bool {
        if self.partition_of(process.pid()).is_some() {
            return true;
        }

        let slot = self
            .partitions
            .iter_mut()
            .rev()
            .find(|p| p.is_free() && process.memory_size() <= p.size);

        match slot {
            Some(partition) => {
                partition.occupant = Some(process.pid());
                log::trace!(
                    "PID {} admitted into partition {} ({} MB)",
                    process.pid(),
                    partition.number,
                    partition.size
                );
                true
            }
            None => false,
        }
    }

    fn release(&mut self, process: &Process) {
        for partition in &mut self.partitions {
            if partition.occupant == Some(process.pid()) {
                partition.occupant = None;
            }
        }
    }

    fn max_admissible_size(&self) -> Option<u32> {
        Some(self.partitions.iter().map(|p| p.size).max().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_picks_smallest_fitting_partition() {
        let mut memory = FixedPartitionMemory::default();
        let p = Process::new(7, 0, 1).with_memory_size(9);

        assert!(memory.try_admit(&p));
        assert_eq!(memory.partition_of(7), Some(4)); // the 10 MB partition
    }

    #[test]
    fn test_failed_admission_changes_nothing() {
        let mut memory = FixedPartitionMemory::new(vec![4]);
        let before = memory.clone();

        assert!(!memory.try_admit(&Process::new(1, 0, 1).with_memory_size(5)));
        assert_eq!(memory, before);
    }

    #[test]
    fn test_free_and_used_totals() {
        let mut memory = FixedPartitionMemory::default();
        assert_eq!(memory.free_memory(), 100);

        assert!(memory.try_admit(&Process::new(1, 0, 1).with_memory_size(30)));
        assert_eq!(memory.used_memory(), 40);
        assert_eq!(memory.free_memory(), 60);
        assert_eq!(memory.max_admissible_size(), Some(40));
    }
}
