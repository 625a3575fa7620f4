use clap::{Parser, Subcommand};

pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_NUMBER"));

#[derive(Parser, Debug)]
#[command(name = "ghpc", version = VERSION, about = "GitHub Packages Cleaner TUI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    /// Write debug logs to the state directory
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information and exit
    Version,
    /// Download and install the latest release
    Update,
}
