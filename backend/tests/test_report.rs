//! Transition table rendering tests

use cpu_scheduler_core_rs::orchestrator::{run, OrchestratorConfig};
use cpu_scheduler_core_rs::report::{render_header, render_table, TABLE_WIDTH};
use cpu_scheduler_core_rs::{Event, EventLog, MemoryConfig, PolicyConfig, Process, ProcessState};

#[test]
fn test_single_process_table() {
    let log = run(OrchestratorConfig::default(), vec![Process::new(1, 0, 5)]).unwrap();

    let expected = "\
+-----------------------------------------------+
|Time of Transition| PID|  Old State|  New State|
+-----------------------------------------------+
|                 0|   1|        NEW|      READY|
|                 0|   1|      READY|    RUNNING|
|                 5|   1|    RUNNING| TERMINATED|
+-----------------------------------------------+
";
    assert_eq!(render_table(&log), expected);
}

#[test]
fn test_every_line_has_table_width() {
    let processes = vec![
        Process::new(2, 0, 250).with_io(120, 7),
        Process::new(9_999, 3, 40),
    ];
    let config = OrchestratorConfig {
        policy: PolicyConfig::preemptive_priority(),
        memory: MemoryConfig::Unlimited,
        max_ticks: None,
    };
    let table = render_table(&run(config, processes).unwrap());

    assert!(table.contains("WAITING"));
    for line in table.lines() {
        assert_eq!(line.len(), TABLE_WIDTH, "{:?}", line);
    }
}

#[test]
fn test_open_log_has_no_closing_border() {
    let mut log = EventLog::new();
    log.log(Event::Header);
    log.log(Event::Transition {
        tick: 3,
        pid: 4,
        from: ProcessState::NotAdmitted,
        to: ProcessState::Ready,
    });

    let table = render_table(&log);
    assert!(table.starts_with(&render_header()));
    assert_eq!(table.lines().count(), 4);
    assert!(table.ends_with("|                 3|   4|        NEW|      READY|\n"));
}

#[test]
fn test_empty_run_renders_header_and_border() {
    let log = run(OrchestratorConfig::default(), Vec::new()).unwrap();
    let table = render_table(&log);

    assert_eq!(table.lines().count(), 4);
    assert!(table.lines().last().is_some_and(|l| l.starts_with("+---")));
}
