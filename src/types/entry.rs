//! Template entries: positioned, flagged sub-images.

use serde::{Deserialize, Serialize};

use crate::error::{AssemblerError, Result};

use super::Priority;

/// One positioned sub-image contributing to the shared canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Identifier used in diagnostics.
    pub name: String,

    /// Left edge on the canvas.
    pub x: i64,

    /// Top edge on the canvas.
    pub y: i64,

    /// Candidate image sources, tried in order until one loads.
    #[serde(default)]
    pub images: Vec<String>,

    /// Include in the agent-facing canvases.
    #[serde(default)]
    pub autopick: bool,

    /// Raw placement priority; validated when a mask is generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    /// Name of the export group this entry accumulates into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_group: Option<String>,

    /// Unix timestamp before which the entry is not drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_utc: Option<i64>,

    /// Erase this entry's footprint from every canvas instead of drawing it.
    #[serde(default, rename = "__exclude", skip_serializing_if = "std::ops::Not::not")]
    pub exclude: bool,

    #[serde(default, rename = "forcewidth", skip_serializing_if = "Option::is_none")]
    pub force_width: Option<u32>,

    #[serde(default, rename = "forceheight", skip_serializing_if = "Option::is_none")]
    pub force_height: Option<u32>,
}

impl TemplateEntry {
    /// Create an entry at `(x, y)` with no sources or flags.
    pub fn new(name: impl Into<String>, x: i64, y: i64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            images: Vec::new(),
            autopick: false,
            priority: None,
            export_group: None,
            enabled_utc: None,
            exclude: false,
            force_width: None,
            force_height: None,
        }
    }

    /// Add a candidate image source.
    pub fn with_image(mut self, source: impl Into<String>) -> Self {
        self.images.push(source.into());
        self
    }

    pub fn with_autopick(mut self, autopick: bool) -> Self {
        self.autopick = autopick;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_export_group(mut self, group: impl Into<String>) -> Self {
        self.export_group = Some(group.into());
        self
    }

    pub fn with_enabled_utc(mut self, timestamp: i64) -> Self {
        self.enabled_utc = Some(timestamp);
        self
    }

    /// Mark the entry as an exclusion block of the given size.
    ///
    /// Used for animation frames that must be blanked from static exports.
    pub fn excluded(mut self, width: u32, height: u32) -> Self {
        self.exclude = true;
        self.autopick = false;
        self.force_width = Some(width);
        self.force_height = Some(height);
        self
    }

    /// The validated priority, defaulting to 1.
    pub fn priority(&self) -> Result<Priority> {
        match self.priority {
            Some(value) => Priority::new(&self.name, value),
            None => Ok(Priority::default()),
        }
    }

    /// The export group, if set to a non-empty name.
    pub fn export_group(&self) -> Option<&str> {
        self.export_group.as_deref().filter(|g| !g.is_empty())
    }

    /// Forced erase block size, when both dimensions are given.
    pub fn forced_size(&self) -> Option<(u32, u32)> {
        self.force_width.zip(self.force_height)
    }

    /// Whether the entry should be drawn at `now` (unix seconds).
    pub fn is_enabled_at(&self, now: i64) -> bool {
        self.enabled_utc.map_or(true, |t| t <= now)
    }

    /// Check the entry carries something to draw.
    pub fn validate(&self) -> Result<()> {
        if self.force_width.is_some() != self.force_height.is_some() {
            return Err(AssemblerError::Parse {
                message: format!("'{}' sets only one of forcewidth/forceheight", self.name),
                help: Some("Provide both forcewidth and forceheight".to_string()),
            });
        }
        if self.images.is_empty() && self.forced_size().is_none() {
            return Err(AssemblerError::Parse {
                message: format!("Template entry '{}' has no images", self.name),
                help: Some("Add an \"images\" list with at least one source".to_string()),
            });
        }
        Ok(())
    }
}
