use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Parse an input map and build the action table.
    Check {
        /// The input map to check
        map: PathBuf,
    },
    /// List every action with its bound inputs.
    Actions {
        /// The input map to read
        map: PathBuf,
    },
    /// Feed a recorded event trace through an input map.
    Replay {
        /// The input map to build
        map: PathBuf,
        /// The recorded events
        trace: PathBuf,
        /// Only observe this device
        #[clap(short, long)]
        device: Option<usize>,
    },
}

/// Routes keyboard and gamepad input to named actions.
#[derive(Debug, Parser)]
#[command(name = "impulse", version, about, long_about = None)]
pub struct Cli {
    /// Turn debugging information on
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// The command to run
    #[clap(subcommand)]
    pub command: Command,
}
