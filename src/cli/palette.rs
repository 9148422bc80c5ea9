use std::path::PathBuf;

use clap::Args;

use crate::config::AssemblerConfig;
use crate::error::Result;
use crate::output::{plural, Printer};

/// Print the palette templates are normalized against
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Config file with a palette override
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<()> {
    let config = match &args.config {
        Some(path) => AssemblerConfig::load(path)?,
        None => AssemblerConfig::default(),
    };
    let palette = config.palette()?;

    printer.status(
        "Palette",
        &format!("'{}' with {}", palette.name, plural(palette.len(), "colour", "colours")),
    );

    for colour in palette.colours() {
        println!("{}", colour);
    }

    Ok(())
}
