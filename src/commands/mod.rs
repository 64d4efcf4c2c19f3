pub mod classify;
pub mod config;
pub mod ports;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Watch focus sessions on the connected device")]
    Watch(watch::WatchArgs),
    #[command(about = "List serial ports and the one that would be used")]
    Ports,
    #[command(about = "Ask the classifier whether a window title is distracting", arg_required_else_help = true)]
    Classify(classify::ClassifyArgs),
    #[command(about = "Print the resolved configuration")]
    Config,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Ports => ports::cmd(),
            Commands::Classify(args) => classify::cmd(args).await,
            Commands::Config => config::cmd(),
        }
    }
}
