pub mod build;
pub mod completions;
pub mod palette;

use clap::{Parser, Subcommand};

/// assemble - layered pixel template assembler
#[derive(Parser, Debug)]
#[command(name = "assemble")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble canvases, priority masks and export groups from template folders
    Build(build::BuildArgs),

    /// Print the active palette
    Palette(palette::PaletteArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
