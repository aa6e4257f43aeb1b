//! `gradebook` binary entry point.
//!
//! # Responsibility
//! - Parse flags, start logging when requested, open the database.
//! - Hand stdin/stdout to the menu shell and map failures to the exit code.

mod args;
mod render;
mod shell;

use anyhow::{anyhow, Context, Result};
use args::Args;
use clap::Parser;
use gradebook_core::{default_log_level, init_logging, open_db};
use shell::Shell;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=session module=cli status=error error={err:#}");
            eprintln!("gradebook: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if let Some(log_dir) = args
        .absolute_log_dir()
        .context("failed to resolve log directory")?
    {
        init_logging(log_level(args), &log_dir)
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
    }

    let conn = open_db(&args.db)
        .with_context(|| format!("failed to open database `{}`", args.db.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell =
        Shell::new(&conn, stdin.lock(), stdout.lock())?.with_json_reports(args.json);
    shell.run()
}

fn log_level(args: &Args) -> &str {
    args.log_level.as_deref().unwrap_or(default_log_level())
}
