//! ArgMatches → CliAction conversion.
//!
//! Translates clap's parsed arguments into:
//! - `RunOptions`: cell configuration, output mode, timeout
//! - `CliAction`: the scenario to run

use std::fs;
use std::str::FromStr;
use std::time::Duration;

use clap::ArgMatches;
use settle_concurrency::{later, Input, SettlementCell};
use settle_core::{CellConfig, Outcome, SubscriberPolicy};

use crate::format::OutputMode;

/// Options shared by every scenario.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: CellConfig,
    pub output: OutputMode,
    pub timeout: Duration,
}

/// The scenario requested on the command line.
#[derive(Debug)]
pub enum CliAction {
    /// Settle one cell after `delay` and report what its callbacks saw.
    Cell {
        outcome: Outcome<String, String>,
        delay: Duration,
    },
    /// Combine the described inputs with `all`.
    All { inputs: Vec<InputSpec> },
}

/// One `all` input as written on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSpec {
    /// `ok:<payload>:<ms>`
    Fulfill { payload: String, delay: Duration },
    /// `err:<payload>:<ms>`
    Reject { payload: String, delay: Duration },
    /// `val:<payload>`
    Value(String),
}

impl FromStr for InputSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid input '{}': expected <kind>:<payload>", s))?;

        if kind == "val" {
            return Ok(InputSpec::Value(rest.to_string()));
        }

        let (payload, ms) = rest
            .rsplit_once(':')
            .ok_or_else(|| format!("Invalid input '{}': expected {}:<payload>:<ms>", s, kind))?;
        let delay = ms
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| format!("Invalid delay '{}' in '{}': {}", ms, s, e))?;
        let payload = payload.to_string();

        match kind {
            "ok" => Ok(InputSpec::Fulfill { payload, delay }),
            "err" => Ok(InputSpec::Reject { payload, delay }),
            other => Err(format!(
                "Invalid input kind '{}' in '{}': expected ok, err or val",
                other, s
            )),
        }
    }
}

impl InputSpec {
    /// Build the combinator input this spec describes.
    pub fn into_input(self, config: &CellConfig) -> Input<String, String> {
        match self {
            InputSpec::Fulfill { payload, delay } => {
                Input::cell(SettlementCell::with_config(config.clone(), |fulfill, _| {
                    later(delay, move || fulfill.fulfill(payload));
                }))
            }
            InputSpec::Reject { payload, delay } => {
                Input::cell(SettlementCell::with_config(config.clone(), |_, reject| {
                    later(delay, move || reject.reject(payload));
                }))
            }
            InputSpec::Value(payload) => Input::value(payload),
        }
    }
}

/// Extract the global options.
///
/// Global args are propagated down to the subcommand, so the subcommand's
/// matches see them wherever they were written on the command line.
pub fn matches_to_options(matches: &ArgMatches) -> Result<RunOptions, String> {
    let matches = matches
        .subcommand()
        .map(|(_, sub)| sub)
        .unwrap_or(matches);

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config '{}': {}", path, e))?;
            CellConfig::from_json(&raw).map_err(|e| format!("Config '{}': {}", path, e))?
        }
        None => CellConfig::default(),
    };

    if let Some(policy) = matches.get_one::<String>("policy") {
        let policy = policy
            .parse::<SubscriberPolicy>()
            .map_err(|e| e.to_string())?;
        config = config.with_policy(policy);
    }

    let output = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let timeout = matches
        .get_one::<u64>("timeout-ms")
        .copied()
        .map(Duration::from_millis)
        .ok_or_else(|| "Missing --timeout-ms".to_string())?;

    Ok(RunOptions {
        config,
        output,
        timeout,
    })
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "cell" => parse_cell(sub_matches),
        "all" => parse_all(sub_matches),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn parse_cell(matches: &ArgMatches) -> Result<CliAction, String> {
    let outcome = match (
        matches.get_one::<String>("fulfill"),
        matches.get_one::<String>("reject"),
    ) {
        (Some(value), None) => Outcome::Fulfilled(value.clone()),
        (None, Some(reason)) => Outcome::Rejected(reason.clone()),
        _ => return Err("Exactly one of --fulfill or --reject is required".to_string()),
    };
    let delay = matches
        .get_one::<u64>("delay-ms")
        .copied()
        .map(Duration::from_millis)
        .unwrap_or_default();
    Ok(CliAction::Cell { outcome, delay })
}

fn parse_all(matches: &ArgMatches) -> Result<CliAction, String> {
    let inputs = matches
        .get_many::<String>("inputs")
        .into_iter()
        .flatten()
        .map(|raw| raw.parse::<InputSpec>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CliAction::All { inputs })
}
