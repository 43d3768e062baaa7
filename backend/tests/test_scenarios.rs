//! End-to-end scheduling scenarios
//!
//! Each test pins the exact transition sequence (order and timestamps) a run
//! must produce. Unlimited memory unless the test is about admission.

use cpu_scheduler_core_rs::orchestrator::{run, OrchestratorConfig};
use cpu_scheduler_core_rs::{
    Event, EventLog, MemoryConfig, Pid, PolicyConfig, Process, ProcessState,
};

use ProcessState::{NotAdmitted as New, Ready, Running, Terminated, Waiting};

fn config(policy: PolicyConfig) -> OrchestratorConfig {
    OrchestratorConfig {
        policy,
        memory: MemoryConfig::Unlimited,
        max_ticks: Some(100_000),
    }
}

fn rows(log: &EventLog) -> Vec<(usize, Pid, ProcessState, ProcessState)> {
    log.transitions()
        .map(|t| (t.tick, t.pid, t.from, t.to))
        .collect()
}

fn all_policies() -> Vec<PolicyConfig> {
    vec![
        PolicyConfig::ExternalPriority,
        PolicyConfig::round_robin(),
        PolicyConfig::preemptive_priority(),
    ]
}

#[test]
fn test_single_process_no_io() {
    for policy in all_policies() {
        let log = run(config(policy.clone()), vec![Process::new(1, 0, 5)]).unwrap();

        assert_eq!(
            rows(&log),
            vec![
                (0, 1, New, Ready),
                (0, 1, Ready, Running),
                (5, 1, Running, Terminated),
            ],
            "policy {:?}",
            policy
        );
        assert_eq!(log.events().first(), Some(&Event::Header));
        assert_eq!(log.events().last(), Some(&Event::Footer { tick: 5 }));
    }
}

#[test]
fn test_two_processes_non_preemptive_priority() {
    let processes = vec![Process::new(1, 0, 10), Process::new(2, 0, 10)];
    let log = run(config(PolicyConfig::ExternalPriority), processes).unwrap();

    assert_eq!(
        rows(&log),
        vec![
            (0, 1, New, Ready),
            (0, 2, New, Ready),
            (0, 1, Ready, Running),
            (10, 1, Running, Terminated),
            (10, 2, Ready, Running),
            (20, 2, Running, Terminated),
        ]
    );
}

#[test]
fn test_round_robin_short_jobs_match_non_preemptive() {
    let processes = vec![Process::new(1, 0, 10), Process::new(2, 0, 10)];
    let rr = run(config(PolicyConfig::round_robin()), processes.clone()).unwrap();
    let ep = run(config(PolicyConfig::ExternalPriority), processes).unwrap();

    assert_eq!(rows(&rr), rows(&ep));
    assert!(!rows(&rr)
        .iter()
        .any(|&(_, _, from, to)| from == Running && to == Ready));
}

#[test]
fn test_periodic_io() {
    let process = Process::new(1, 0, 10).with_io(3, 2);
    let log = run(config(PolicyConfig::ExternalPriority), vec![process]).unwrap();

    // Blocks after 3, 6 and 9 ms executed; the last ms runs after the third block
    assert_eq!(
        rows(&log),
        vec![
            (0, 1, New, Ready),
            (0, 1, Ready, Running),
            (3, 1, Running, Waiting),
            (5, 1, Waiting, Ready),
            (5, 1, Ready, Running),
            (8, 1, Running, Waiting),
            (10, 1, Waiting, Ready),
            (10, 1, Ready, Running),
            (13, 1, Running, Waiting),
            (15, 1, Waiting, Ready),
            (15, 1, Ready, Running),
            (16, 1, Running, Terminated),
        ]
    );
}

#[test]
fn test_no_io_when_work_ends_on_io_boundary() {
    let process = Process::new(1, 0, 9).with_io(3, 4);
    let log = run(config(PolicyConfig::round_robin()), vec![process]).unwrap();

    let last = rows(&log).last().copied();
    // 3 + 4 + 3 + 4 + 3 ms
    assert_eq!(last, Some((17, 1, Running, Terminated)));
    assert_eq!(
        log.transitions().filter(|t| t.to == Waiting).count(),
        2,
        "no I/O once remaining time hits zero"
    );
}

#[test]
fn test_zero_io_duration_returns_next_tick() {
    let process = Process::new(1, 0, 4).with_io(2, 0);
    let log = run(config(PolicyConfig::ExternalPriority), vec![process]).unwrap();

    assert_eq!(
        rows(&log),
        vec![
            (0, 1, New, Ready),
            (0, 1, Ready, Running),
            (2, 1, Running, Waiting),
            (2, 1, Waiting, Ready),
            (2, 1, Ready, Running),
            (4, 1, Running, Terminated),
        ]
    );
}

#[test]
fn test_late_arrival_preempts_only_under_preemptive_priority() {
    let processes = vec![Process::new(2, 0, 20), Process::new(1, 5, 3)];

    let preemptive = run(config(PolicyConfig::preemptive_priority()), processes.clone()).unwrap();
    assert_eq!(
        rows(&preemptive),
        vec![
            (0, 2, New, Ready),
            (0, 2, Ready, Running),
            (5, 1, New, Ready),
            (5, 2, Running, Ready),
            (5, 1, Ready, Running),
            (8, 1, Running, Terminated),
            (8, 2, Ready, Running),
            (23, 2, Running, Terminated),
        ]
    );

    let expected_without_preemption = vec![
        (0, 2, New, Ready),
        (0, 2, Ready, Running),
        (5, 1, New, Ready),
        (20, 2, Running, Terminated),
        (20, 1, Ready, Running),
        (23, 1, Running, Terminated),
    ];
    for policy in [PolicyConfig::ExternalPriority, PolicyConfig::round_robin()] {
        let log = run(config(policy), processes.clone()).unwrap();
        assert_eq!(rows(&log), expected_without_preemption);
    }
}

#[test]
fn test_round_robin_quantum_expiry() {
    let processes = vec![Process::new(1, 0, 250), Process::new(2, 0, 50)];
    let log = run(config(PolicyConfig::round_robin()), processes).unwrap();

    assert_eq!(
        rows(&log),
        vec![
            (0, 1, New, Ready),
            (0, 2, New, Ready),
            (0, 1, Ready, Running),
            (100, 1, Running, Ready),
            (100, 2, Ready, Running),
            (150, 2, Running, Terminated),
            (150, 1, Ready, Running),
            (250, 1, Running, Ready),
            (250, 1, Ready, Running),
            (300, 1, Running, Terminated),
        ]
    );
}

#[test]
fn test_completion_wins_over_quantum_expiry() {
    let log = run(config(PolicyConfig::round_robin()), vec![Process::new(1, 0, 100)]).unwrap();

    assert_eq!(rows(&log).last(), Some(&(100, 1, Running, Terminated)));
    assert_eq!(log.transitions().count(), 3);
}

#[test]
fn test_dispatch_after_io_gets_fresh_quantum() {
    let process = Process::new(1, 0, 150).with_io(60, 5);
    let log = run(config(PolicyConfig::round_robin()), vec![process]).unwrap();

    assert_eq!(
        rows(&log),
        vec![
            (0, 1, New, Ready),
            (0, 1, Ready, Running),
            (60, 1, Running, Waiting),
            (65, 1, Waiting, Ready),
            (65, 1, Ready, Running),
            (125, 1, Running, Waiting),
            (130, 1, Waiting, Ready),
            (130, 1, Ready, Running),
            (160, 1, Running, Terminated),
        ]
    );
}

#[test]
fn test_priority_policies_ignore_input_order() {
    let processes = vec![
        Process::new(3, 0, 5),
        Process::new(1, 0, 5),
        Process::new(2, 0, 5),
    ];

    for policy in [PolicyConfig::ExternalPriority, PolicyConfig::preemptive_priority()] {
        let log = run(config(policy), processes.clone()).unwrap();
        let dispatch_order: Vec<Pid> = log
            .transitions()
            .filter(|t| t.to == Running)
            .map(|t| t.pid)
            .collect();
        assert_eq!(dispatch_order, vec![1, 2, 3]);
    }

    let log = run(config(PolicyConfig::round_robin()), processes).unwrap();
    let dispatch_order: Vec<Pid> = log
        .transitions()
        .filter(|t| t.to == Running)
        .map(|t| t.pid)
        .collect();
    assert_eq!(dispatch_order, vec![3, 1, 2]);
}

#[test]
fn test_idle_gap_between_arrivals() {
    let processes = vec![Process::new(1, 0, 2), Process::new(2, 10, 2)];
    let log = run(config(PolicyConfig::ExternalPriority), processes).unwrap();

    assert_eq!(
        rows(&log),
        vec![
            (0, 1, New, Ready),
            (0, 1, Ready, Running),
            (2, 1, Running, Terminated),
            (10, 2, New, Ready),
            (10, 2, Ready, Running),
            (12, 2, Running, Terminated),
        ]
    );
    assert_eq!(log.events().last(), Some(&Event::Footer { tick: 12 }));
}
