use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{config::CliConfig, logging::LogTarget};

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// TOML configuration file
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Log file (interactive play defaults to `neontris/neontris.log` in the temp directory)
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Let the advisor play headless games and print statistics as JSON
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let mode = args.mode.unwrap_or(Mode::Play(PlayArg::default()));

    let log_target = match (args.log_file, &mode) {
        (Some(path), _) => LogTarget::File(path),
        (None, Mode::Play(_)) => LogTarget::default_file(),
        (None, Mode::Simulate(_)) => LogTarget::Stderr,
    };
    let _guard = crate::logging::init(&log_target)?;

    // Configuration errors surface here, before the terminal is taken over.
    let config = CliConfig::load(args.config.as_deref())?;

    match mode {
        Mode::Play(arg) => play::run(&arg, &config)?,
        Mode::Simulate(arg) => simulate::run(&arg, &config)?,
    }
    Ok(())
}
