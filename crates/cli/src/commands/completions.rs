//! # CLI Completions Command
//!
//! Shell completions generation for the Ladle CLI.

use clap::Command;
use clap_complete::Shell;
use error::Result;

/// Generates shell completions for the CLI and writes them to stdout.
pub fn completions(shell: Shell, cmd: &mut Command) -> Result<()> {
    clap_complete::generate(shell, cmd, "ladle", &mut std::io::stdout());
    Ok(())
}
