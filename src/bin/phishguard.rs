//! PhishGuard CLI binary.

use std::io::Write;
use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use phishguard::cli::args::*;
use phishguard::cli::commands::*;

fn main() {
    let args = PhishGuardArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: PhishGuardArgs) -> anyhow::Result<()> {
    let command = match &args.command {
        Command::Train(_) => "train",
        Command::Predict(_) => "predict",
        Command::Extract(_) => "extract",
        Command::Info => "info",
    };
    execute_command(args).with_context(|| format!("`{command}` failed"))
}
