use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hotpuppy",
    version,
    about = "Operator utilities for the HotPuppy evolution chain"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Delete the database; the next server start plants a new seed
    Reset(ResetArgs),
    /// Print the chain, oldest first
    History(HistoryArgs),
    /// Print chain state and the current image
    Status(StatusArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ResetArgs {
    #[arg(long, env = "HOTPUPPY_DB", default_value = "hotpuppy.db")]
    pub db: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct HistoryArgs {
    #[arg(long, env = "HOTPUPPY_DB", default_value = "hotpuppy.db")]
    pub db: PathBuf,

    /// Output format: text | json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, env = "HOTPUPPY_DB", default_value = "hotpuppy.db")]
    pub db: PathBuf,
}
