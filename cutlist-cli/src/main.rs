// cutlist-cli/src/main.rs
//
// Entry point for the `cutlist` binary: parses arguments, sets up logging,
// dispatches to the subcommand and turns a returned error into a red
// `[ERROR]` line on stderr and exit code 1.

use clap::Parser;
use cutlist_cli::logging::init_logging;
use cutlist_cli::{Cli, CliResult, Commands, run_fix, run_generate, run_scan};
use log::info;
use owo_colors::OwoColorize;
use std::process;

fn run(cli: Cli) -> CliResult<()> {
    let log_path = init_logging(cli.verbose, cli.log_dir.as_deref(), cli.command.name())?;
    if let Some(path) = &log_path {
        info!("Logging to {}", path.display());
    }
    let file_logging = log_path.is_some();

    match cli.command {
        Commands::Scan(args) => run_scan(args, file_logging),
        Commands::Fix(args) => run_fix(args, file_logging),
        Commands::Generate(args) => run_generate(args, file_logging),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        if std::env::var("NO_COLOR").is_err() && console::colors_enabled_stderr() {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
        } else {
            eprintln!("[ERROR] {}", e);
        }
        process::exit(1);
    }
}
