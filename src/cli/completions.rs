//! Shell completions for `assemble`.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::Shell;

use crate::error::{AssemblerError, Result};

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    match &args.output {
        Some(path) => {
            let mut file = File::create(path).map_err(|e| AssemblerError::Io {
                path: path.clone(),
                message: format!("Failed to create completions file: {}", e),
            })?;
            write_completions(args.shell, &mut file);
        }
        None => write_completions(args.shell, &mut io::stdout().lock()),
    }
    Ok(())
}

/// Render the completion script for `shell` into `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = super::Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}
