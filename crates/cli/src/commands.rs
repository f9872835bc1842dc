//! Clap command definition.
//!
//! Flags without a value on the command line fall back to the config file,
//! then to `BenchConfig::default()`. Nothing here sets clap defaults so that
//! an absent flag can be told apart from an explicit one.

use clap::{value_parser, Arg, ArgAction, Command};
use tpcb_core::Durability;

fn bool_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(value_parser!(bool))
        .num_args(0..=1)
        .require_equals(true)
        .default_missing_value("true")
}

/// Build the CLI command.
pub fn build_cli() -> Command {
    Command::new("tpcb")
        .about("TPC-B-like transactional workload generator")
        .arg(
            Arg::new("concurrency")
                .long("concurrency")
                .help("Number of concurrent workers (default: 24)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("benchtime")
                .long("benchtime")
                .help("Run duration, e.g. 60s or 1m30s (default: 60s)")
                .value_parser(humantime::parse_duration),
        )
        .arg(
            Arg::new("scale")
                .long("scale")
                .help("Scaling factor (default: 1000)")
                .value_parser(value_parser!(u64)),
        )
        .arg(bool_arg(
            "rwmode",
            "Read-write transfer mix; --rwmode=false runs balance lookups (default: true)",
        ))
        .arg(bool_arg(
            "init",
            "Seed the dataset before running (default: true)",
        ))
        .arg(
            Arg::new("db")
                .long("db")
                .help("Database file (default: tpcb.redb)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML config file; command-line flags override it"),
        )
        .arg(
            Arg::new("batch-size")
                .long("batch-size")
                .help("Records per seeding transaction (default: 1000)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("durability")
                .long("durability")
                .help(
                    "Commit durability: immediate, eventual or none (default: immediate). \
                     Commits made with none are rolled back on reopen unless a durable \
                     commit follows, so a dataset seeded with none is seeded again next run",
                )
                .value_parser(|s: &str| s.parse::<Durability>()),
        )
        .arg(
            Arg::new("cache-size-mb")
                .long("cache-size-mb")
                .help("Storage engine page cache size")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Base RNG seed for reproducible runs")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("progress")
                .long("progress")
                .help("Log progress at this interval, e.g. 10s")
                .value_parser(humantime::parse_duration),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the result as JSON")
                .action(ArgAction::SetTrue),
        )
}
