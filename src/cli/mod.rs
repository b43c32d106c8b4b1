//! Command line interface for the console host

pub mod serve;

use clap::{Parser, Subcommand};

/// S3 Web Console - browse object storage from a server-rendered UI
#[derive(Parser)]
#[command(name = "s3-web-console")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the web host (default)
    Serve(serve::ServeArgs),
}

impl Cli {
    /// `serve` with config-file defaults when no subcommand is given
    pub fn command(self) -> Command {
        self.command
            .unwrap_or(Command::Serve(serve::ServeArgs::default()))
    }
}
