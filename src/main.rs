use std::process::ExitCode;

use clap::Parser;
use log::debug;
use race_locks::{race, AnyLock, LockKind, RaceConfig, RaceReport};

/// The lock behind this binary is picked at build time, e.g. `cargo run --features cas-mutex`.
const LOCK: LockKind = compiled_lock();

const fn compiled_lock() -> LockKind {
    if cfg!(feature = "std-mutex") {
        LockKind::Reference
    } else if cfg!(feature = "cas-mutex") {
        LockKind::CasMutex
    } else if cfg!(feature = "fetch-add") {
        LockKind::FetchAddBroken
    } else if cfg!(feature = "unfair-spin") {
        LockKind::UnfairSpin
    } else if cfg!(feature = "broken-fence") {
        LockKind::TwoProcessBroken
    } else {
        LockKind::TwoProcessCorrect
    }
}

/// Races workers for a lock around a shared flag and counts how often the flag changed under its holder.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Iterations per worker; not a number or 0 => the lock's default
    iterations: Option<String>,

    /// How long to keep checking the flag while holding the lock, ns (at least 10)
    busy_ns: Option<String>,

    /// Number of racing workers
    #[arg(short, long, default_value_t = RaceConfig::DEFAULT_WORKERS)]
    workers: usize,

    /// Print nothing when there were no errors
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logger() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "race_locks=info");
    }
    env_logger::init();
}

fn main() -> anyhow::Result<ExitCode> {
    setup_logger();
    let args = Args::parse();

    let config = RaceConfig::from_args(LOCK, args.iterations.as_deref(), args.busy_ns.as_deref())
        .with_workers(args.workers);
    debug!("lock {LOCK} (may park: {}), {config:?}", LOCK.may_park());

    let lock = AnyLock::new(LOCK);
    let report = race(&lock, &config)?;

    let (summary, code) = outcome(&report, args.quiet);
    if let Some(summary) = summary {
        println!("{summary}");
    }
    Ok(ExitCode::from(code))
}

/// What to print and the exit status: the summary is always shown on errors, `quiet` only hides a clean run.
fn outcome(report: &RaceReport, quiet: bool) -> (Option<String>, u8) {
    if report.passed() {
        ((!quiet).then(|| report.to_string()), 0)
    } else {
        (Some(report.to_string()), 1)
    }
}
