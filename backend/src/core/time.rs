//! Time management for the simulation
//!
//! The simulation operates in discrete 1 ms ticks. Transitions produced by
//! executing a tick are stamped at the *end* of that tick (`current + 1`),
//! everything else at the current tick.

use serde::{Deserialize, Serialize};

/// Manages simulation time in discrete ticks
///
/// # Example
/// ```
/// use cpu_scheduler_core_rs::TimeManager;
///
/// let mut time = TimeManager::new();
/// assert_eq!(time.current_tick(), 0);
///
/// time.advance_tick();
/// assert_eq!(time.current_tick(), 1);
/// assert_eq!(time.end_of_tick(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeManager {
    /// Ticks elapsed since simulation start
    current_tick: usize,
}

impl TimeManager {
    /// Create a new TimeManager positioned at tick 0
    pub fn new() -> Self {
        Self { current_tick: 0 }
    }

    /// Advance time by one tick
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }

    /// Get the current tick
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    /// Timestamp for transitions caused by executing the current tick
    pub fn end_of_tick(&self) -> usize {
        self.current_tick + 1
    }

    /// Number of ticks in the running window that started at `start_tick`,
    /// counting the current tick.
    ///
    /// # Example
    /// ```
    /// use cpu_scheduler_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new();
    /// for _ in 0..99 {
    ///     time.advance_tick();
    /// }
    /// // Dispatched at 0, now executing tick 99: the 100th tick of the window
    /// assert_eq!(time.window_length(0), 100);
    /// ```
    pub fn window_length(&self, start_tick: usize) -> usize {
        debug_assert!(start_tick <= self.current_tick);
        self.current_tick - start_tick + 1
    }
}
