//! Command-line front-end running the bundled models through the checker.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use warden_mc::{CheckConfig, CheckOutcome, Checker, Model, Reporter, Stats};
use warden_models::{JugState, ReplState};

#[derive(Parser)]
#[command(name = "warden", version, about = "Explicit-state model checker for the bundled models")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the two-jug measuring puzzle (finds the measure-four solution)
    Jug {
        #[command(flatten)]
        opts: CheckOpts,
    },
    /// Check the Raft-style replication model
    Repl {
        #[command(flatten)]
        opts: CheckOpts,
        /// Commit on majority replication alone, without the term check
        /// (rediscovers the rollback-of-committed-writes anomaly)
        #[arg(long)]
        unsafe_commit: bool,
    },
}

#[derive(Args)]
struct CheckOpts {
    /// Maximum number of states to admit (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_states: usize,
    /// Depth at which states are no longer expanded (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_depth: usize,
    /// Seconds between stats lines while checking (0 disables them)
    #[arg(long, default_value_t = 1)]
    stats_interval: u64,
    /// Verbose engine logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Jug { opts } | Commands::Repl { opts, .. } => opts.verbose,
    };
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let code = match cli.command {
        Commands::Jug { opts } => check_model(vec![JugState::<4>::empty()], &opts),
        Commands::Repl { opts, unsafe_commit } => {
            if unsafe_commit {
                check_model(vec![ReplState::<false>::initial()], &opts)
            } else {
                check_model(vec![ReplState::<true>::initial()], &opts)
            }
        }
    };
    std::process::exit(code);
}

fn check_model<M: Model>(initial: Vec<M>, opts: &CheckOpts) -> i32 {
    let config = CheckConfig {
        max_states: opts.max_states,
        max_depth: opts.max_depth,
    };
    let mut checker = Checker::new(config);

    let reporter = (opts.stats_interval > 0).then(|| {
        Reporter::spawn(
            checker.stats(),
            Duration::from_secs(opts.stats_interval),
        )
    });

    let start = Instant::now();
    let result = checker.run(initial);
    let elapsed = start.elapsed();

    if let Some(reporter) = reporter {
        reporter.stop();
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return 3;
        }
    };

    report(outcome, checker.stats(), elapsed)
}

fn report<M: Model>(outcome: CheckOutcome<M>, stats: Arc<Stats>, elapsed: Duration) -> i32 {
    match outcome {
        CheckOutcome::Ok {
            states_explored,
            max_depth,
        } => {
            println!("Model checking finished.");
            println!("{}", stats.snapshot());
            info!(
                states_explored,
                max_depth,
                secs = elapsed.as_secs_f64(),
                "run complete"
            );
            0
        }
        CheckOutcome::InvariantViolation { trace } => {
            println!("Violated invariant.");
            for (i, state) in trace.iter().enumerate() {
                println!("State: {i}");
                println!("{state}");
                println!();
            }
            1
        }
        CheckOutcome::StateLimitReached {
            states_explored,
            max_depth,
        } => {
            println!("State limit reached.");
            println!("{}", stats.snapshot());
            info!(
                states_explored,
                max_depth,
                secs = elapsed.as_secs_f64(),
                "run stopped at state limit"
            );
            2
        }
    }
}
