//! tpcb: TPC-B-like workload generator.
//!
//! Seeds accounts, tellers and branches into a redb file, drives
//! `--concurrency` workers through balance lookups or transfers for
//! `--benchtime`, and prints one result row.
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); stdout carries only the
//! result.

mod commands;
mod format;
mod parse;

use std::process;

use tpcb_engine::FailFast;
use tracing::error;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::format_report;
use parse::{config_from_matches, output_mode};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}

fn main() {
    init_tracing();

    let matches = build_cli().get_matches();
    let mode = output_mode(&matches);
    let config = match config_from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    let policy = FailFast::new();
    match tpcb_engine::run(&config, &policy) {
        Ok(outcome) => println!("{}", format_report(&outcome.report, mode)),
        Err(e) => {
            error!(error = %e, "benchmark failed");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
