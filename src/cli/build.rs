//! Build command implementation.
//!
//! Assembles each template folder and writes its canvases, export group
//! crops and manifest.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::AssemblerConfig;
use crate::discovery::{find_template_dirs, TEMPLATE_FILE_NAME};
use crate::error::{AssemblerError, Result};
use crate::export::write_assembly;
use crate::loader::FileLoader;
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{Assembler, EntryOutcome};
use crate::types::TemplateFile;

/// Assemble canvases, priority masks and export groups from template folders
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Template folders, template.json files, or directories to search
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output directory (defaults to each template folder)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to assembler.yaml in each template folder)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Unix timestamp used for time-gated entries (defaults to now)
    #[arg(long)]
    pub now: Option<i64>,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let folders = find_template_dirs(&args.paths)?;
    if folders.is_empty() {
        return Err(AssemblerError::Build {
            message: format!("No {} found", TEMPLATE_FILE_NAME),
            help: Some("Pass a template folder or a directory containing one".to_string()),
        });
    }

    let outputs = output_dirs(&folders, args.output.as_deref())?;

    for (folder, output) in folders.iter().zip(&outputs) {
        if let Err(e) = build_folder(folder, output, &args, printer) {
            printer.error("Failed", &display_path(folder));
            return Err(e);
        }
    }

    printer.status("Finished", &plural(folders.len(), "template", "templates"));

    Ok(())
}

/// Pick the output directory for each template folder.
///
/// Without `--output` every folder writes into itself. With several folders,
/// each one writes under its path relative to their common ancestor, so
/// folders sharing a basename stay apart.
fn output_dirs(folders: &[PathBuf], output: Option<&Path>) -> Result<Vec<PathBuf>> {
    let Some(dir) = output else {
        return Ok(folders.to_vec());
    };
    if folders.len() == 1 {
        return Ok(vec![dir.to_path_buf()]);
    }

    let canonical = folders
        .iter()
        .map(|f| {
            f.canonicalize().map_err(|e| AssemblerError::Io {
                path: f.clone(),
                message: format!("Failed to resolve template folder: {}", e),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let root = canonical
        .iter()
        .skip(1)
        .fold(canonical[0].clone(), |common, path| common_ancestor(&common, path));

    let mut seen = HashSet::new();
    let mut outputs = Vec::with_capacity(canonical.len());
    for (folder, path) in folders.iter().zip(&canonical) {
        let relative = path.strip_prefix(&root).unwrap_or(path.as_path());
        let target = dir.join(relative);
        if !seen.insert(target.clone()) {
            return Err(AssemblerError::Build {
                message: format!(
                    "{} would overwrite another template's output in {}",
                    display_path(folder),
                    display_path(&target)
                ),
                help: Some("Build these folders separately or without --output".to_string()),
            });
        }
        outputs.push(target);
    }

    Ok(outputs)
}

fn common_ancestor(a: &Path, b: &Path) -> PathBuf {
    a.components()
        .zip(b.components())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect()
}

/// Assemble one folder and write its outputs into `output`.
fn build_folder(folder: &Path, output: &Path, args: &BuildArgs, printer: &Printer) -> Result<()> {
    let template = TemplateFile::load(&folder.join(TEMPLATE_FILE_NAME))?;
    let config = match &args.config {
        Some(path) => AssemblerConfig::load(path)?,
        None => AssemblerConfig::load_or_default(folder)?,
    };

    let mut assembler = Assembler::new(FileLoader::new(folder), &config)?;
    if let Some(now) = args.now {
        assembler = assembler.with_now(now);
    }

    printer.status(
        "Assembling",
        &format!(
            "{} ({})",
            display_path(folder),
            plural(template.templates.len(), "entry", "entries")
        ),
    );

    let assembly = assembler.assemble(&template.templates)?;

    for outcome in &assembly.outcomes {
        match outcome {
            EntryOutcome::Skipped { name, enabled_utc } => {
                printer.info("Skipped", &format!("{} (enabled at {})", name, enabled_utc));
            }
            EntryOutcome::Rendered {
                name,
                autopick: false,
                report: Some(report),
            } if !report.is_clean(config.max_palette_distance) => {
                printer.warning(
                    "Excluded",
                    &format!("{} from autopick (max delta {:.2})", name, report.max_distance),
                );
            }
            EntryOutcome::Rendered { .. } => {}
        }
    }

    let written = write_assembly(&assembly, output, template.export_info.as_ref())?;
    printer.status(
        "Wrote",
        &format!(
            "{} and {} to {}",
            plural(written.len(), "file", "files"),
            plural(assembly.groups.len(), "export group", "export groups"),
            display_path(output)
        ),
    );

    Ok(())
}
