//! Transition log
//!
//! Every process state change is recorded as an [`Event::Transition`]. The
//! log opens with a single [`Event::Header`] and closes with a single
//! [`Event::Footer`] once every process has terminated.
//!
//! The log is append-only: nothing logged is ever corrected or removed, and
//! its order is exactly the order the tick engine produced the transitions.
//!
//! # Example
//!
//! ```rust
//! use cpu_scheduler_core_rs::models::{Event, EventLog, ProcessState};
//!
//! let mut log = EventLog::new();
//! log.log(Event::Header);
//! log.log(Event::Transition {
//!     tick: 0,
//!     pid: 1,
//!     from: ProcessState::NotAdmitted,
//!     to: ProcessState::Ready,
//! });
//!
//! assert_eq!(log.transitions().count(), 1);
//! ```

use crate::models::process::{Pid, ProcessState};
use serde::{Deserialize, Serialize};

/// Simulation event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Start of the log, emitted before the first tick
    Header,

    /// A process changed state at `tick`
    Transition {
        tick: usize,
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },

    /// End of the log; `tick` is the first tick at which nothing remains
    Footer { tick: usize },
}

impl Event {
    /// Get the tick number when this event occurred
    ///
    /// The header has no tick.
    pub fn tick(&self) -> Option<usize> {
        match self {
            Event::Header => None,
            Event::Transition { tick, .. } => Some(*tick),
            Event::Footer { tick } => Some(*tick),
        }
    }

    /// Get the PID if the event is a transition
    pub fn pid(&self) -> Option<Pid> {
        match self {
            Event::Transition { pid, .. } => Some(*pid),
            _ => None,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Header => "Header",
            Event::Transition { .. } => "Transition",
            Event::Footer { .. } => "Footer",
        }
    }
}

/// A transition event, unpacked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub tick: usize,
    pub pid: Pid,
    pub from: ProcessState,
    pub to: ProcessState,
}

/// Append-only event log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events, in emission order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Transitions only, in emission order
    pub fn transitions(&self) -> impl Iterator<Item = Transition> + '_ {
        self.events.iter().filter_map(|event| match *event {
            Event::Transition {
                tick,
                pid,
                from,
                to,
            } => Some(Transition {
                tick,
                pid,
                from,
                to,
            }),
            _ => None,
        })
    }

    /// Transitions of one process, in emission order
    pub fn transitions_for(&self, pid: Pid) -> Vec<Transition> {
        self.transitions().filter(|t| t.pid == pid).collect()
    }

    /// Transitions stamped at `tick`
    pub fn transitions_at(&self, tick: usize) -> Vec<Transition> {
        self.transitions().filter(|t| t.tick == tick).collect()
    }

    /// Check if the footer has been written
    pub fn is_closed(&self) -> bool {
        matches!(self.events.last(), Some(Event::Footer { .. }))
    }
}
