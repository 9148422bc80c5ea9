//! Template definition files (`template.json`).
//!
//! Entries are listed in layer order: earlier entries sit on top and win
//! overlaps. The assembler walks them in reverse so that those entries are
//! composited last.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AssemblerError, Result};

use super::TemplateEntry;

/// Publication details written into the export manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportInfo {
    /// Faction name, prefixed to every exported group name.
    pub name: String,

    #[serde(default)]
    pub contact: String,

    /// URL prefix under which exported group images are published.
    pub source_root: String,
}

/// A parsed template definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateFile {
    /// Entries in layer order (topmost first).
    pub templates: Vec<TemplateEntry>,

    #[serde(default, alias = "endu_info", skip_serializing_if = "Option::is_none")]
    pub export_info: Option<ExportInfo>,
}

impl TemplateFile {
    /// Load a template definition from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AssemblerError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read template: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse and validate a template definition from JSON.
    pub fn parse(content: &str) -> Result<Self> {
        let file: TemplateFile = serde_json::from_str(content).map_err(|e| AssemblerError::Parse {
            message: format!("Invalid template definition: {}", e),
            help: Some("Every entry needs \"name\", \"x\" and \"y\"".to_string()),
        })?;

        for entry in &file.templates {
            entry.validate()?;
        }

        Ok(file)
    }
}
