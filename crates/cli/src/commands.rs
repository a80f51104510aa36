//! Command tree for the `settle` binary.

use clap::{value_parser, Arg, ArgAction, ArgGroup, Command};

/// Build the clap command tree.
pub fn build_cli() -> Command {
    Command::new("settle")
        .about("Run settlement-cell scenarios from the command line")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("policy")
                .long("policy")
                .global(true)
                .value_parser(["replace", "fanout"])
                .help("Subscriber policy for every created cell (overrides --config)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .help("JSON cell configuration, e.g. {\"policy\":\"fanout\",\"label\":\"demo\"}"),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .global(true)
                .value_parser(value_parser!(u64))
                .default_value("10000")
                .help("Give up waiting after this many milliseconds"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print the outcome as JSON"),
        )
        .subcommand(
            Command::new("cell")
                .about("Settle one cell from a deferred context and report what its callbacks saw")
                .arg(
                    Arg::new("fulfill")
                        .long("fulfill")
                        .value_name("PAYLOAD")
                        .help("Fulfil the cell with PAYLOAD"),
                )
                .arg(
                    Arg::new("reject")
                        .long("reject")
                        .value_name("PAYLOAD")
                        .help("Reject the cell with PAYLOAD"),
                )
                .group(
                    ArgGroup::new("outcome")
                        .args(["fulfill", "reject"])
                        .required(true),
                )
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .value_parser(value_parser!(u64))
                        .default_value("0")
                        .help("Settle after this many milliseconds"),
                ),
        )
        .subcommand(
            Command::new("all")
                .about("Combine several cells and report the ordered values or the first rejection")
                .arg(
                    Arg::new("inputs")
                        .value_name("SPEC")
                        .num_args(0..)
                        .help("ok:<payload>:<ms>, err:<payload>:<ms> or val:<payload>"),
                ),
        )
}
