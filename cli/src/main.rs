//! cpu-scheduler: simulate CPU scheduling over a process file
//!
//! ```text
//! cpu-scheduler processes.txt --policy ep-rr -o execution.txt --summary
//! ```
//!
//! Writes the transition table (or the JSON event log with `--format json`)
//! to the output file, `-` meaning stdout.

mod logger;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use cpu_scheduler_core_rs::input::{parse_processes, parse_processes_json, InputError};
use cpu_scheduler_core_rs::orchestrator::{
    Orchestrator, OrchestratorConfig, RunMetrics, SimulationError,
};
use cpu_scheduler_core_rs::policy::DEFAULT_QUANTUM;
use cpu_scheduler_core_rs::report::render_table;
use cpu_scheduler_core_rs::{MemoryConfig, PolicyConfig, Process};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Input { path: PathBuf, source: InputError },

    #[error("invalid partition list '{0}': expected comma separated sizes in MB")]
    Partitions(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("cannot encode event log: {0}")]
    Json(#[from] serde_json::Error),
}

fn build_cli() -> Command {
    Command::new("cpu-scheduler")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tick-driven CPU scheduling simulator")
        .arg(
            Arg::new("input")
                .help("Process file; a .json extension selects JSON input")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("policy")
                .short('p')
                .long("policy")
                .help("Scheduling policy")
                .value_parser(["ep", "rr", "ep-rr"])
                .default_value("ep"),
        )
        .arg(
            Arg::new("quantum")
                .short('q')
                .long("quantum")
                .help("Time slice in ms for rr and ep-rr")
                .value_parser(value_parser!(usize))
                .default_value("100"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file, '-' for stdout")
                .value_parser(value_parser!(PathBuf))
                .default_value("execution.txt"),
        )
        .arg(
            Arg::new("memory")
                .long("memory")
                .help("Memory admission model")
                .value_parser(["fixed", "unlimited"])
                .default_value("fixed"),
        )
        .arg(
            Arg::new("partitions")
                .long("partitions")
                .help("Fixed partition sizes in MB, largest first (default 40,25,15,10,8,2)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format")
                .value_parser(["table", "json"])
                .default_value("table"),
        )
        .arg(
            Arg::new("max-ticks")
                .long("max-ticks")
                .help("Abort if the run has not finished by this tick")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .help("Print per-process timing to stdout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More logging (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("No logging")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

fn parse_partitions(raw: &str) -> Result<Vec<u32>, CliError> {
    let sizes = raw
        .split(',')
        .map(|s| s.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| CliError::Partitions(raw.to_string()))?;

    if sizes.is_empty() || sizes.iter().all(|&s| s == 0) {
        return Err(CliError::Partitions(raw.to_string()));
    }
    Ok(sizes)
}

fn config_from_matches(matches: &ArgMatches) -> Result<OrchestratorConfig, CliError> {
    let quantum = matches.get_one::<usize>("quantum").copied().unwrap_or(DEFAULT_QUANTUM);
    let policy = match matches.get_one::<String>("policy").map(String::as_str) {
        Some("rr") => PolicyConfig::RoundRobin { quantum },
        Some("ep-rr") => PolicyConfig::PreemptivePriority { quantum },
        _ => PolicyConfig::ExternalPriority,
    };

    let memory = match matches.get_one::<String>("memory").map(String::as_str) {
        Some("unlimited") => MemoryConfig::Unlimited,
        _ => match matches.get_one::<String>("partitions") {
            Some(raw) => MemoryConfig::FixedPartitions {
                sizes: parse_partitions(raw)?,
            },
            None => MemoryConfig::default(),
        },
    };

    Ok(OrchestratorConfig {
        policy,
        memory,
        max_ticks: matches.get_one::<usize>("max-ticks").copied(),
    })
}

fn read_processes(path: &Path) -> Result<Vec<Process>, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        parse_processes_json(&text)
    } else {
        parse_processes(&text)
    };

    parsed.map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })
}

fn render_summary(metrics: &RunMetrics) -> String {
    let mut out = format!(
        "{:>6} {:>8} {:>6} {:>9} {:>9} {:>11} {:>7} {:>7}\n",
        "PID", "arrival", "cpu", "admitted", "finished", "turnaround", "ready", "io"
    );
    for m in &metrics.processes {
        let show = |v: Option<usize>| v.map_or_else(|| "-".to_string(), |t| t.to_string());
        out.push_str(&format!(
            "{:>6} {:>8} {:>6} {:>9} {:>9} {:>11} {:>7} {:>7}\n",
            m.pid,
            m.arrival_time,
            m.processing_time,
            show(m.admitted_at),
            show(m.terminated_at),
            show(m.turnaround_time()),
            m.ready_time,
            m.io_time
        ));
    }
    out.push_str(&format!(
        "total ticks {}, CPU utilization {:.2}%, avg turnaround {:.2}, avg ready {:.2}, throughput {:.3}/1000 ticks\n",
        metrics.total_ticks,
        metrics.cpu_utilization() * 100.0,
        metrics.average_turnaround().unwrap_or(0.0),
        metrics.average_ready_time().unwrap_or(0.0),
        metrics.throughput()
    ));
    out
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let input = matches
        .get_one::<PathBuf>("input")
        .cloned()
        .unwrap_or_default();
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("execution.txt"));

    let processes = read_processes(&input)?;
    let config = config_from_matches(matches)?;
    info!(
        "Loaded {} processes from {}",
        processes.len(),
        input.display()
    );

    let mut orchestrator = Orchestrator::new(config, processes.clone())?;
    orchestrator.run_to_completion()?;
    let log = orchestrator.event_log();

    let rendered = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => serde_json::to_string_pretty(log)? + "\n",
        _ => render_table(log),
    };

    if output.as_os_str() == "-" {
        print!("{}", rendered);
    } else {
        fs::write(&output, rendered).map_err(|source| CliError::Write {
            path: output.clone(),
            source,
        })?;
        info!(
            "Wrote {} transitions to {}",
            log.transitions().count(),
            output.display()
        );
    }

    if matches.get_flag("summary") {
        print!("{}", render_summary(&RunMetrics::from_log(log, &processes)));
    }

    Ok(())
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();

    let level = logger::level_for(matches.get_count("verbose"), matches.get_flag("quiet"));
    if let Err(e) = logger::init(level) {
        eprintln!("logger unavailable: {}", e);
    }

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
