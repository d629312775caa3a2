use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tamias_core::domain::{
    BankerBuilder, ProcessId, ProductionBanker, RequestError, ResourceId,
};

/// Tamias Resource Steward CLI
/// Deadlock-avoidance demos on the banker's algorithm
#[derive(Parser)]
#[command(name = "tamias")]
#[command(about = "Tamias deadlock-avoidance CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the classic five-process textbook instance
    Scenario {
        /// Emit snapshots as JSON instead of rendered tables
        #[arg(long)]
        json: bool,
    },
    /// Run the dining philosophers on real threads
    Philosophers {
        /// Seats at the table
        #[arg(short, long, default_value_t = 5)]
        seats: usize,
        /// Meals each philosopher eats before leaving
        #[arg(short, long, default_value_t = 3)]
        meals: usize,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("⚡ Tamias Resource Steward");

    match cli.command {
        Commands::Scenario { json } => run_scenario(json),
        Commands::Philosophers { seats, meals } => run_philosophers(seats, meals),
    }
}

fn textbook() -> Result<ProductionBanker> {
    BankerBuilder::new()
        .capacities(&[10, 5, 7])
        .process(&[7, 5, 3], &[0, 1, 0])
        .process(&[3, 2, 2], &[2, 0, 0])
        .process(&[9, 0, 2], &[3, 0, 2])
        .process(&[2, 2, 2], &[2, 1, 1])
        .process(&[4, 3, 3], &[0, 0, 2])
        .build()
        .context("textbook instance failed validation")
}

fn print_state(banker: &ProductionBanker, json: bool) -> Result<()> {
    let snapshot = banker.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", snapshot);
    }
    Ok(())
}

fn run_scenario(json: bool) -> Result<()> {
    let banker = textbook()?;

    info!("🎯 Classic five-process, three-resource instance");
    print_state(&banker, json)?;

    let sequence = banker
        .find_safe_sequence()
        .context("textbook instance must start safe")?;
    info!("✅ Safe sequence: {}", sequence);

    banker.request(ProcessId::new(1), ResourceId::new(0), 1)?;
    info!("✅ Granted: p1 takes 1 of r0");

    match banker.request(ProcessId::new(4), ResourceId::new(1), 3) {
        Err(err @ RequestError::WouldCauseUnsafeState { .. }) => {
            info!("⛔ Refused: {}", err);
        }
        other => bail!("expected an unsafe-state refusal, got {:?}", other),
    }

    banker.request(ProcessId::new(4), ResourceId::new(1), 2)?;
    info!("✅ Granted: p4 takes 2 of r1, one unit inside the boundary");
    print_state(&banker, json)?;

    let sequence = banker
        .find_safe_sequence()
        .context("granted states must remain safe")?;
    info!("✅ Safe sequence after grants: {}", sequence);

    for process in sequence.order() {
        banker.release_all(*process)?;
        info!("↩ {} released everything", process);
    }

    info!("🏁 Drained back to declared capacities");
    print_state(&banker, json)
}

fn run_philosophers(seats: usize, meals: usize) -> Result<()> {
    if seats < 2 {
        bail!("the table needs at least 2 seats, got {}", seats);
    }

    let mut builder = BankerBuilder::new().capacities(&vec![1; seats]);
    for seat in 0..seats {
        let mut claim = vec![0; seats];
        claim[seat] = 1;
        claim[(seat + 1) % seats] = 1;
        builder = builder.process(&claim, &vec![0; seats]);
    }
    let banker = Arc::new(builder.build().context("table failed validation")?);
    let eaten = Arc::new(AtomicUsize::new(0));

    info!("🎯 {} philosophers, {} meals each", seats, meals);

    let handles: Vec<_> = (0..seats)
        .map(|seat| {
            let banker = Arc::clone(&banker);
            let eaten = Arc::clone(&eaten);
            thread::spawn(move || {
                let process = ProcessId::new(seat);
                let left = ResourceId::new(seat);
                let right = ResourceId::new((seat + 1) % seats);
                for meal in 0..meals {
                    acquire(&banker, process, left);
                    acquire(&banker, process, right);
                    eaten.fetch_add(1, Ordering::Relaxed);
                    info!("🍽 {} finished meal {}", process, meal + 1);
                    release_fork(&banker, process, left);
                    release_fork(&banker, process, right);
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            bail!("a philosopher thread panicked");
        }
    }

    let total = eaten.load(Ordering::Relaxed);
    if total != seats * meals {
        bail!("expected {} meals, counted {}", seats * meals, total);
    }
    if banker.snapshot().available() != vec![1; seats] || !banker.is_safe() {
        bail!("the table did not drain back to one fork per slot");
    }
    info!("🏁 All {} meals eaten, no deadlock, forks returned", total);
    Ok(())
}

/// Spin until the banker certifies the grab
fn acquire(banker: &ProductionBanker, process: ProcessId, fork: ResourceId) {
    loop {
        match banker.request(process, fork, 1) {
            Ok(()) => return,
            Err(RequestError::InsufficientAvailable { .. })
            | Err(RequestError::WouldCauseUnsafeState { .. }) => thread::yield_now(),
            Err(err) => panic!("philosopher hit an argument error: {err}"),
        }
    }
}

fn release_fork(banker: &ProductionBanker, process: ProcessId, fork: ResourceId) {
    match banker.release(process, fork, 1) {
        Ok(1) => {}
        other => panic!("fork release went wrong: {other:?}"),
    }
}
