//=====================================================
// File: main.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Scenario CLI entry point
// Objective: Run scenario scripts, evaluate single expressions or open a REPL
//            against the in-memory chain
//=====================================================

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use scenario::config::Settings;
use scenario::contract::MemoryChain;
use scenario::devtools::repl;
use scenario::{Interpreter, World, logging, run_script};

#[derive(Parser, Debug)]
#[command(name = "scenario", about = "Scenario script interpreter")]
pub struct Args {
    /// Settings file (defaults to the user config directory).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a scenario script line by line.
    Run(RunArgs),
    /// Resolve a single expression and print its value.
    Eval(EvalArgs),
    /// Interactive prompt.
    Repl,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// Path to the scenario script.
    pub script: PathBuf,

    /// Seed for the in-memory chain (overrides the settings file).
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct EvalArgs {
    /// Expression, e.g. "(Exp 1.5)".
    pub expr: String,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init(args.verbose);
    let settings = Settings::discover(args.config.as_deref())?;

    match args.command {
        Command::Run(cmd) => run_entry(settings, cmd),
        Command::Eval(cmd) => {
            let interpreter = Interpreter::new(build_world(settings)?);
            let value = interpreter.eval(&cmd.expr)?;
            println!("{value}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Repl => {
            let mut interpreter = Interpreter::new(build_world(settings)?);
            let stdin = io::stdin();
            repl::run(&mut interpreter, stdin.lock(), io::stdout())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_world(settings: Settings) -> Result<World> {
    let chain = MemoryChain::new(settings.chain_seed, settings.accounts.len());
    Ok(World::new(Arc::new(chain), settings)?)
}

fn run_entry(mut settings: Settings, args: RunArgs) -> Result<ExitCode> {
    if let Some(seed) = args.seed {
        settings.chain_seed = seed;
    }
    let print_values = settings.print_values;
    let source = fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read {}", args.script.display()))?;

    let outcome = run_script(build_world(settings)?, &source);
    if print_values {
        for line in outcome.world.output() {
            println!("{line}");
        }
    }
    match &outcome.failure {
        Some(failure) => {
            eprintln!("{}: {failure}", args.script.display());
            Ok(ExitCode::FAILURE)
        }
        None => {
            println!("{} line(s) executed", outcome.executed);
            Ok(ExitCode::SUCCESS)
        }
    }
}

//=====================================================
// End of file
//=====================================================
