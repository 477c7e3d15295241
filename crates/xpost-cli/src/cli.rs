use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "xpost",
    about = "Replicate posts between two simulated chains",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Module configuration (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Send one post from mars to venus and relay it
    Send(SendArgs),
    /// Run a success, a rejection, and a timeout, then print every store
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct SendArgs {
    #[arg(long)]
    pub creator: String,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub content: String,
    /// Destination height at which the packet expires
    #[arg(long)]
    pub timeout_height: Option<u64>,
    /// Nanoseconds after the current time at which the packet expires
    #[arg(long)]
    pub timeout_timestamp: Option<u64>,
    /// Blocks the destination produces before the relayer runs
    #[arg(long, default_value = "0")]
    pub dest_height: u64,
}

#[derive(Args)]
pub struct DemoArgs {}
