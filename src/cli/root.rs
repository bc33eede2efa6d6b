use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use super::demo::DemoCommand;
use modal_dialogs::config::Config;

/// Modal dialogs with focus capture/restore and awaitable results
#[derive(Parser)]
#[command(
    name = "modal-dialogs",
    version,
    about = "Modal dialogs with focus capture/restore and awaitable results",
    long_about = r#"Runs scripted dialog sessions against the in-process dialog host.

Examples:
  modal-dialogs demo                          # Answer "Yes" to the default question
  modal-dialogs demo --answer dismiss         # Press Escape instead of answering
  modal-dialogs -d demo --question "Quit?"    # Same, with debug logging"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Configuration file to use instead of the default search path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a confirmation dialog and answer it from a script
    Demo(DemoCommand),
}

impl Cli {
    pub async fn execute(self, config: Config) -> Result<()> {
        debug!("Configuration: {:?}", config);

        match self.command {
            Commands::Demo(demo) => demo.execute(&config).await,
        }
    }
}
