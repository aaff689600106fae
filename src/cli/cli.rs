use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// Directory holding oracle.yaml and the repository and working copy areas
    #[clap(long, short, default_value = ".", global = true)]
    pub root: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a repository and working copy for a test and verify the checkout
    Bootstrap { test_name: String },
    /// Verify that a working copy is unmodified and at the given revision
    Status {
        wc: PathBuf,
        #[clap(long, default_value_t = 1)]
        rev: u64,
    },
    /// Print the tree found on disk below a directory
    Scan { dir: PathBuf },
}
