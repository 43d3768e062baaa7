//! Text table rendering of the transition log
//!
//! ```text
//! +-----------------------------------------------+
//! |Time of Transition| PID|  Old State|  New State|
//! +-----------------------------------------------+
//! |                 0|   1|        NEW|      READY|
//! |                 0|   1|      READY|    RUNNING|
//! |                 5|   1|    RUNNING| TERMINATED|
//! +-----------------------------------------------+
//! ```

use crate::models::event::{Event, EventLog};
use crate::models::process::{Pid, ProcessState};

/// Full table width in characters, borders included
pub const TABLE_WIDTH: usize = 49;

fn border() -> String {
    format!("+{}+\n", "-".repeat(TABLE_WIDTH - 2))
}

/// Border plus column titles plus border
pub fn render_header() -> String {
    let mut out = border();
    out.push_str(&format!(
        "|{:>18}|{:>4}|{:>11}|{:>11}|\n",
        "Time of Transition", "PID", "Old State", "New State"
    ));
    out.push_str(&border());
    out
}

/// One transition row
pub fn render_transition(tick: usize, pid: Pid, from: ProcessState, to: ProcessState) -> String {
    format!(
        "|{:>18}|{:>4}|{:>11}|{:>11}|\n",
        tick,
        pid,
        from.label(),
        to.label()
    )
}

/// Closing border
pub fn render_footer() -> String {
    border()
}

/// Render a whole log, one line per event
///
/// # Example
///
/// ```rust
/// use cpu_scheduler_core_rs::orchestrator::{run, OrchestratorConfig};
/// use cpu_scheduler_core_rs::report::{render_table, TABLE_WIDTH};
/// use cpu_scheduler_core_rs::Process;
///
/// let log = run(OrchestratorConfig::default(), vec![Process::new(1, 0, 5)]).unwrap();
/// let table = render_table(&log);
///
/// assert!(table.lines().all(|line| line.len() == TABLE_WIDTH));
/// assert!(table.contains("|                 5|   1|    RUNNING| TERMINATED|"));
/// ```
pub fn render_table(log: &EventLog) -> String {
    let mut out = String::new();
    for event in log.events() {
        let rendered = match *event {
            Event::Header => render_header(),
            Event::Transition {
                tick,
                pid,
                from,
                to,
            } => render_transition(tick, pid, from, to),
            Event::Footer { .. } => render_footer(),
        };
        out.push_str(&rendered);
    }
    out
}
