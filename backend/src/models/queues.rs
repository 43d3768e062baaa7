//! Ready queue and wait set
//!
//! Both hold PIDs only. The process records themselves live in
//! [`SimulationState`](crate::models::state::SimulationState), so there is a
//! single authoritative copy of every record.
//!
//! The ready queue always keeps insertion order. Policies that order by
//! priority pick a position out of it rather than re-sorting it, which keeps
//! FIFO order available for Round-Robin and for ties.

use crate::models::process::Pid;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Processes in state READY, in the order they entered the queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyQueue {
    pids: VecDeque<Pid>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail
    pub fn push_back(&mut self, pid: Pid) {
        debug_assert!(!self.contains(pid), "PID {} already ready", pid);
        self.pids.push_back(pid);
    }

    /// Remove and return the PID at `position`
    pub fn remove(&mut self, position: usize) -> Option<Pid> {
        self.pids.remove(position)
    }

    /// PID at `position` (0 = head)
    pub fn get(&self, position: usize) -> Option<Pid> {
        self.pids.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.pids.contains(&pid)
    }

    /// Iterate head to tail
    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.pids.iter().copied()
    }

    /// Position of the smallest PID, if any
    pub fn position_of_min_pid(&self) -> Option<usize> {
        self.pids
            .iter()
            .enumerate()
            .min_by_key(|(_, pid)| **pid)
            .map(|(position, _)| position)
    }

    pub fn to_vec(&self) -> Vec<Pid> {
        self.pids.iter().copied().collect()
    }
}

/// A blocked process and the tick its I/O completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitEntry {
    pub pid: Pid,
    pub completion_tick: usize,
}

/// Processes in state WAITING
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitSet {
    entries: Vec<WaitEntry>,
}

impl WaitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block `pid` until `completion_tick`
    pub fn insert(&mut self, pid: Pid, completion_tick: usize) {
        debug_assert!(!self.contains(pid), "PID {} already waiting", pid);
        self.entries.push(WaitEntry {
            pid,
            completion_tick,
        });
    }

    /// Remove every entry completing at `tick`, in blocking order
    pub fn take_completed(&mut self, tick: usize) -> Vec<Pid> {
        let mut completed = Vec::new();
        self.entries.retain(|entry| {
            if entry.completion_tick == tick {
                completed.push(entry.pid);
                false
            } else {
                true
            }
        });
        completed
    }

    /// Completion tick for a waiting PID
    pub fn completion_tick(&self, pid: Pid) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.pid == pid)
            .map(|entry| entry.completion_tick)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.entries.iter().any(|entry| entry.pid == pid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[WaitEntry] {
        &self.entries
    }
}
