//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pidlock")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Acquire a PID lock and hold it
    Hold {
        /// Lock file to create and lock
        #[arg(env = "PIDLOCK_FILE")]
        path: PathBuf,

        /// Release after this many seconds instead of waiting for stdin EOF
        #[arg(long)]
        seconds: Option<u64>,
    },

    /// Walk through lock, contention, re-lock and unlock with three handles
    Demo {
        /// Directory for the demo lock files (defaults to a fresh temp dir)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
