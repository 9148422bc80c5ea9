//! Locating template folders.
//!
//! A template folder is any directory holding a `template.json`. Paths given
//! on the command line may name such a folder, the definition file itself,
//! or a directory to search recursively.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{AssemblerError, Result};

/// Definition file name inside a template folder.
pub const TEMPLATE_FILE_NAME: &str = "template.json";

/// Find every template folder under `root`, sorted.
pub fn scan_directory(root: &Path) -> Vec<PathBuf> {
    let mut folders: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == TEMPLATE_FILE_NAME)
        .filter_map(|e| e.path().parent().map(Path::to_path_buf))
        .collect();

    folders.sort();
    folders
}

/// Resolve user-supplied paths to a de-duplicated list of template folders.
pub fn find_template_dirs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();

    for path in paths {
        if path.is_file() {
            if path.file_name().map_or(true, |n| n != TEMPLATE_FILE_NAME) {
                return Err(AssemblerError::Build {
                    message: format!("{} is not a {}", path.display(), TEMPLATE_FILE_NAME),
                    help: None,
                });
            }
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            folders.push(parent.to_path_buf());
        } else if path.is_dir() {
            folders.extend(scan_directory(path));
        } else {
            return Err(AssemblerError::Io {
                path: path.clone(),
                message: "No such file or directory".to_string(),
            });
        }
    }

    let mut seen = std::collections::HashSet::new();
    folders.retain(|f| seen.insert(f.clone()));
    Ok(folders)
}
