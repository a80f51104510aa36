//! Settle CLI: run settlement-cell scenarios from the command line.
//!
//! Two commands:
//! - **cell**: `settle cell --reject boom --delay-ms 100` settles one cell
//!   from a deferred context and reports what its callbacks received
//! - **all**: `settle all ok:A:30 val:B err:E:10` combines several inputs
//!   and reports the ordered values or the first rejection
//!
//! Exit status is 0 on fulfilment, 1 on rejection, 2 on usage error or
//! timeout. Logs go to stderr and follow `RUST_LOG` (default `warn`).

mod commands;
mod format;
mod parse;

use std::process;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use settle_concurrency::{all, later, SettlementCell};
use settle_core::Outcome;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_outcome, format_timeout};
use parse::{matches_to_action, matches_to_options, CliAction, InputSpec, RunOptions};

const EXIT_FULFILLED: i32 = 0;
const EXIT_REJECTED: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    init_logging();

    let matches = build_cli().get_matches();

    let options = match matches_to_options(&matches) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(EXIT_USAGE);
        }
    };

    let exit_code = match matches_to_action(&matches) {
        Ok(CliAction::Cell { outcome, delay }) => run_cell(outcome, delay, &options),
        Ok(CliAction::All { inputs }) => run_all(inputs, &options),
        Err(e) => {
            eprintln!("(error) {}", e);
            EXIT_USAGE
        }
    };
    process::exit(exit_code);
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Settle one cell after `delay` and report what its callbacks saw.
///
/// The outcome is observed through `then`/`catch`, the way a consumer of
/// the cell would, rather than by reading the cell's state.
fn run_cell(outcome: Outcome<String, String>, delay: Duration, options: &RunOptions) -> i32 {
    tracing::debug!(
        policy = %options.config.policy,
        delay_ms = delay.as_millis() as u64,
        "running cell scenario"
    );
    let cell = SettlementCell::with_config(options.config.clone(), move |fulfill, reject| {
        later(delay, move || match outcome {
            Outcome::Fulfilled(value) => fulfill.fulfill(value),
            Outcome::Rejected(reason) => reject.reject(reason),
        });
    });

    let (tx, rx) = mpsc::channel();
    let tx_reject = tx.clone();
    cell.then(move |value: String| {
        let _ = tx.send(Outcome::Fulfilled(value));
    })
    .catch(move |reason: String| {
        let _ = tx_reject.send(Outcome::Rejected(reason));
    });

    let started = Instant::now();
    match rx.recv_timeout(options.timeout) {
        Ok(observed) => report(&observed, options),
        Err(_) => report_timeout(started, options),
    }
}

/// Combine the inputs with `all` and report the result.
fn run_all(inputs: Vec<InputSpec>, options: &RunOptions) -> i32 {
    tracing::debug!(
        policy = %options.config.policy,
        inputs = inputs.len(),
        "running all scenario"
    );
    let inputs: Vec<_> = inputs
        .into_iter()
        .map(|spec| spec.into_input(&options.config))
        .collect();
    let combined: SettlementCell<Vec<String>, String> = all(inputs);

    let started = Instant::now();
    match combined.wait_timeout(options.timeout) {
        Some(outcome) => report(&outcome, options),
        None => report_timeout(started, options),
    }
}

fn report<T>(outcome: &Outcome<T, String>, options: &RunOptions) -> i32
where
    T: serde::Serialize + std::fmt::Debug,
{
    println!("{}", format_outcome(outcome, options.output));
    match outcome {
        Outcome::Fulfilled(_) => EXIT_FULFILLED,
        Outcome::Rejected(_) => EXIT_REJECTED,
    }
}

fn report_timeout(started: Instant, options: &RunOptions) -> i32 {
    eprintln!(
        "{}",
        format_timeout(started.elapsed().as_millis(), options.output)
    );
    EXIT_USAGE
}
