//! Image sources for template entries.
//!
//! The assembler only needs decoded RGBA pixels. Where they come from is
//! behind [`ImageLoader`]; the filesystem loader covers local template
//! folders and [`MemoryLoader`] serves buffers fetched elsewhere.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AssemblerError, Result};
use crate::render::{read_png, Raster};

/// Resolves one candidate source string to pixels.
pub trait ImageLoader {
    fn load(&self, source: &str) -> Result<Raster>;
}

/// Whether a source points at a network location.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads sources as paths relative to a template folder.
///
/// Remote sources are rejected so the next candidate is tried.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageLoader for FileLoader {
    fn load(&self, source: &str) -> Result<Raster> {
        if is_remote(source) {
            return Err(AssemblerError::Io {
                path: PathBuf::from(source),
                message: "remote sources are not fetched by the file loader".to_string(),
            });
        }
        read_png(&self.root.join(source))
    }
}

/// Serves pre-decoded rasters keyed by source string.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    images: HashMap<String, Raster>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image under a source string.
    pub fn insert(&mut self, source: impl Into<String>, image: Raster) {
        self.images.insert(source.into(), image);
    }

    pub fn with(mut self, source: impl Into<String>, image: Raster) -> Self {
        self.insert(source, image);
        self
    }
}

impl ImageLoader for MemoryLoader {
    fn load(&self, source: &str) -> Result<Raster> {
        self.images
            .get(source)
            .cloned()
            .ok_or_else(|| AssemblerError::Io {
                path: PathBuf::from(source),
                message: "no such image".to_string(),
            })
    }
}
