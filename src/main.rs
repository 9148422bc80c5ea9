use clap::Parser;
use miette::Result;
use template_assembler::cli::{Cli, Commands};
use template_assembler::output::Printer;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => template_assembler::cli::build::run(args, &printer)?,
        Commands::Palette(args) => template_assembler::cli::palette::run(args, &printer)?,
        Commands::Completions(args) => template_assembler::cli::completions::run(args)?,
    }

    Ok(())
}
