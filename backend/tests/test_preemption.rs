//! Preemptive priority (EP+RR) tests
//!
//! Covers preemption by new arrivals and by I/O completions, and quantum
//! expiry when the expiring process is still the highest priority.

use cpu_scheduler_core_rs::orchestrator::{run, Orchestrator, OrchestratorConfig};
use cpu_scheduler_core_rs::{
    EventLog, MemoryConfig, Pid, PolicyConfig, Process, ProcessState, Transition,
};

use ProcessState::{NotAdmitted as New, Ready, Running, Terminated};

fn config(policy: PolicyConfig) -> OrchestratorConfig {
    OrchestratorConfig {
        policy,
        memory: MemoryConfig::Unlimited,
        max_ticks: Some(100_000),
    }
}

fn terminated_at(log: &EventLog, pid: Pid) -> Option<usize> {
    log.transitions_for(pid)
        .into_iter()
        .find(|t| t.to == Terminated)
        .map(|t| t.tick)
}

fn preemptions(log: &EventLog) -> Vec<Transition> {
    log.transitions()
        .filter(|t| t.from == Running && t.to == Ready)
        .collect()
}

#[test]
fn test_preemption_logged_demotion_then_dispatch() {
    let processes = vec![Process::new(2, 0, 20), Process::new(1, 5, 3)];
    let log = run(config(PolicyConfig::preemptive_priority()), processes).unwrap();

    let at_five = log.transitions_at(5);
    let pairs: Vec<(Pid, ProcessState, ProcessState)> =
        at_five.iter().map(|t| (t.pid, t.from, t.to)).collect();
    assert_eq!(
        pairs,
        vec![(1, New, Ready), (2, Running, Ready), (1, Ready, Running)]
    );
}

#[test]
fn test_io_completion_preempts_lower_priority() {
    let processes = vec![
        Process::new(1, 0, 10).with_io(2, 3),
        Process::new(2, 0, 20),
    ];
    let log = run(config(PolicyConfig::preemptive_priority()), processes).unwrap();

    // P1 returns from I/O at 5, 10, 15 and 20 and takes the CPU back each time
    let preempted_at: Vec<usize> = preemptions(&log).iter().map(|t| t.tick).collect();
    assert_eq!(preempted_at, vec![5, 10, 15, 20]);
    assert!(preemptions(&log).iter().all(|t| t.pid == 2));

    assert_eq!(terminated_at(&log, 1), Some(22));
    assert_eq!(terminated_at(&log, 2), Some(30));
}

#[test]
fn test_io_completion_does_not_preempt_without_priority_policy() {
    let processes = vec![
        Process::new(1, 0, 10).with_io(2, 3),
        Process::new(2, 0, 20),
    ];

    for policy in [PolicyConfig::ExternalPriority, PolicyConfig::round_robin()] {
        let log = run(config(policy), processes.clone()).unwrap();
        assert!(preemptions(&log).is_empty());
        // P2 holds the CPU from t=2 to completion at t=22
        assert_eq!(terminated_at(&log, 2), Some(22));
    }
}

#[test]
fn test_equal_or_lower_priority_never_preempts() {
    let processes = vec![Process::new(1, 0, 20), Process::new(2, 3, 5), Process::new(3, 4, 5)];
    let log = run(config(PolicyConfig::preemptive_priority()), processes).unwrap();

    assert!(preemptions(&log).is_empty());
    assert_eq!(terminated_at(&log, 1), Some(20));
}

#[test]
fn test_highest_priority_redispatched_after_quantum() {
    let processes = vec![Process::new(1, 0, 150), Process::new(2, 0, 50)];
    let log = run(config(PolicyConfig::preemptive_priority()), processes).unwrap();

    let rows: Vec<(usize, Pid, ProcessState, ProcessState)> = log
        .transitions()
        .map(|t| (t.tick, t.pid, t.from, t.to))
        .collect();
    assert_eq!(
        rows,
        vec![
            (0, 1, New, Ready),
            (0, 2, New, Ready),
            (0, 1, Ready, Running),
            (100, 1, Running, Ready),
            (100, 1, Ready, Running),
            (150, 1, Running, Terminated),
            (150, 2, Ready, Running),
            (200, 2, Running, Terminated),
        ]
    );
}

#[test]
fn test_cascading_preemption() {
    let processes = vec![
        Process::new(3, 0, 10),
        Process::new(2, 2, 10),
        Process::new(1, 4, 10),
    ];
    let log = run(config(PolicyConfig::preemptive_priority()), processes).unwrap();

    let preempted: Vec<(usize, Pid)> = preemptions(&log).iter().map(|t| (t.tick, t.pid)).collect();
    assert_eq!(preempted, vec![(2, 3), (4, 2)]);

    assert_eq!(terminated_at(&log, 1), Some(14));
    assert_eq!(terminated_at(&log, 2), Some(22));
    assert_eq!(terminated_at(&log, 3), Some(30));
}

#[test]
fn test_tick_result_counts_preemption() {
    let processes = vec![Process::new(2, 0, 20), Process::new(1, 5, 3)];
    let mut orchestrator =
        Orchestrator::new(config(PolicyConfig::preemptive_priority()), processes).unwrap();

    for _ in 0..5 {
        assert_eq!(orchestrator.tick().unwrap().num_preemptions, 0);
    }
    let result = orchestrator.tick().unwrap();

    assert_eq!(result.tick, 5);
    assert_eq!(result.num_admissions, 1);
    assert_eq!(result.num_preemptions, 1);
    assert_eq!(result.num_dispatches, 1);
    assert_eq!(result.executed, Some(1));
    assert_eq!(orchestrator.state().ready().to_vec(), vec![2]);
}

#[test]
fn test_custom_quantum() {
    let processes = vec![Process::new(1, 0, 25), Process::new(2, 0, 25)];
    let log = run(config(PolicyConfig::RoundRobin { quantum: 10 }), processes).unwrap();

    let slices: Vec<(usize, Pid)> = log
        .transitions()
        .filter(|t| t.to == Running)
        .map(|t| (t.tick, t.pid))
        .collect();
    assert_eq!(
        slices,
        vec![(0, 1), (10, 2), (20, 1), (30, 2), (40, 1), (45, 2)]
    );
    assert_eq!(terminated_at(&log, 2), Some(50));
}
