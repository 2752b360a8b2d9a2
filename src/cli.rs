use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::STEP_MS_VAR;
use crate::index_block::IndexBlock;

/// Command line interface definition for cancel-bus.
#[derive(Parser, Debug)]
#[command(name = "cancel-bus")]
#[command(about = "Interruptible computations with an interactive Ctrl+C menu")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,

    /// Exit immediately on Ctrl+C instead of showing the menu
    #[arg(long, global = true)]
    pub no_handler: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// `Some(false)` when `--no-handler` was given, otherwise defer to the environment.
    pub fn handler_override(&self) -> Option<bool> {
        self.no_handler.then_some(false)
    }
}

/// Command selected by CLI parsing.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run an interruptible demo computation (Ctrl+C for the menu)
    Run(RunArgs),
    /// Print the SLEP index vector of a group of index blocks
    Blocks(BlocksArgs),
    /// Deserialize a model from a JSON file
    Load(LoadArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of steps to compute
    #[arg(short = 'n', long, default_value_t = 50)]
    pub steps: u32,

    /// Delay between steps in milliseconds
    #[arg(long, env = STEP_MS_VAR)]
    pub step_ms: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BlocksArgs {
    /// Blocks as `min..max[:weight]`, e.g. 0..3 3..5:0.5
    #[arg(value_name = "BLOCK", required = true)]
    pub blocks: Vec<IndexBlock>,
}

#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Path to the model file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}
