//! Template pipeline: merges ordered entries into the output canvases.
//!
//! Entries arrive in listing order, topmost first. They are drawn in
//! reverse so the topmost entry is composited last and wins overlaps. Each
//! drawn entry touches four kinds of canvas:
//!
//! - the full canvas, where it is composited (or erased, for exclusions)
//! - the autopick canvas and the priority canvas, where it is composited
//!   only if it opted into autopick and its colours passed the quality gate,
//!   and erased otherwise
//! - export groups, where it accumulates into its own group and is erased
//!   from the others
//!
//! Processing is strictly sequential; every step observes all earlier ones.
//! Any fatal error aborts the run and no canvas is returned.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};

use crate::config::AssemblerConfig;
use crate::error::{AssemblerError, Result};
use crate::loader::ImageLoader;
use crate::normalize::{normalize_image, NormalizeReport};
use crate::render::{composite, erase, EraseMode, ExportGroups, GroupCrop, Raster, TransparencyMask};
use crate::shape::generate_priority_mask;
use crate::types::{Colour, Palette, TemplateEntry};

/// Current time as unix seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// What happened to one entry during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Drawn onto the canvases.
    Rendered {
        name: String,
        /// Whether it reached the autopick and priority canvases.
        autopick: bool,
        /// Normalization tally; `None` for forced-size exclusion blocks.
        report: Option<NormalizeReport>,
    },
    /// Not yet enabled at the run's timestamp.
    Skipped { name: String, enabled_utc: i64 },
}

impl EntryOutcome {
    pub fn name(&self) -> &str {
        match self {
            EntryOutcome::Rendered { name, .. } | EntryOutcome::Skipped { name, .. } => name,
        }
    }
}

/// Finished output of a run.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Every drawn entry merged.
    pub canvas: Raster,
    /// Only entries recommended for automatic placement.
    pub autopick: Raster,
    /// Grey priority bands for the autopick entries; black elsewhere.
    pub priority: Raster,
    /// Cropped export groups in creation order.
    pub groups: Vec<GroupCrop>,
    /// Per-entry outcomes in draw order.
    pub outcomes: Vec<EntryOutcome>,
}

/// Canvases mutated while a run is in progress.
struct Canvases {
    canvas: Raster,
    autopick: Raster,
    priority: Raster,
    groups: ExportGroups,
}

impl Canvases {
    fn new(width: usize, height: usize) -> Self {
        Self {
            canvas: Raster::transparent(width, height),
            autopick: Raster::transparent(width, height),
            priority: Raster::filled(width, height, Colour::BLACK),
            groups: ExportGroups::new(width, height),
        }
    }
}

/// Assembles template entries into canvases.
pub struct Assembler<L> {
    loader: L,
    palette: Palette,
    width: usize,
    height: usize,
    max_palette_distance: f64,
    now: i64,
}

impl<L: ImageLoader> Assembler<L> {
    /// Create an assembler using `config` and the current time.
    pub fn new(loader: L, config: &AssemblerConfig) -> Result<Self> {
        Ok(Self {
            loader,
            palette: config.palette()?,
            width: config.canvas_width,
            height: config.canvas_height,
            max_palette_distance: config.max_palette_distance,
            now: unix_now(),
        })
    }

    /// Evaluate time gates against `now` (unix seconds) instead of the clock.
    pub fn with_now(mut self, now: i64) -> Self {
        self.now = now;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Run the pipeline over `entries` given in listing order.
    pub fn assemble(&self, entries: &[TemplateEntry]) -> Result<Assembly> {
        let mut canvases = Canvases::new(self.width, self.height);
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries.iter().rev() {
            outcomes.push(self.draw_entry(&mut canvases, entry)?);
        }

        let Canvases {
            canvas,
            autopick,
            priority,
            groups,
        } = canvases;

        Ok(Assembly {
            canvas,
            autopick,
            priority,
            groups: groups.finalize()?,
            outcomes,
        })
    }

    fn draw_entry(&self, canvases: &mut Canvases, entry: &TemplateEntry) -> Result<EntryOutcome> {
        if let Some(enabled_utc) = entry.enabled_utc.filter(|_| !entry.is_enabled_at(self.now)) {
            info!(
                "skip '{}' due to future animation frame ({:.2}h)",
                entry.name,
                (enabled_utc - self.now) as f64 / 3600.0
            );
            return Ok(EntryOutcome::Skipped {
                name: entry.name.clone(),
                enabled_utc,
            });
        }

        info!("render '{}'", entry.name);
        let clipped;
        let entry = match entry.forced_size() {
            Some(size) if entry.exclude => {
                clipped = self.clip_forced(entry, size);
                &clipped
            }
            _ => entry,
        };
        let (image, report) = self.load_image(entry)?;
        let clean = report
            .as_ref()
            .map_or(true, |r| r.is_clean(self.max_palette_distance));
        let mask = TransparencyMask::from_image(&image);

        if entry.exclude {
            erase(&mut canvases.canvas, entry, &mask, EraseMode::Transparent);
        } else {
            composite(&mut canvases.canvas, entry, &image)?;
        }

        let autopick = entry.autopick && clean;
        if autopick {
            composite(&mut canvases.autopick, entry, &image)?;
            let priority = entry.priority()?;
            let priority_mask = generate_priority_mask(&image, priority);
            composite(&mut canvases.priority, entry, &priority_mask)?;
        } else {
            erase(&mut canvases.autopick, entry, &mask, EraseMode::Transparent);
            erase(&mut canvases.priority, entry, &mask, EraseMode::NoPriority);
        }

        match entry.export_group() {
            Some(group) => canvases.groups.accumulate(group, entry, &image, &mask)?,
            None => canvases.groups.erase_all(entry, &mask),
        }

        Ok(EntryOutcome::Rendered {
            name: entry.name.clone(),
            autopick,
            report,
        })
    }

    /// Load and normalize the entry's image.
    ///
    /// Forced-size entries get an opaque block of that size instead, which
    /// is never normalized.
    fn load_image(&self, entry: &TemplateEntry) -> Result<(Raster, Option<NormalizeReport>)> {
        if let Some((width, height)) = entry.forced_size() {
            let (width, height) = (width as usize, height as usize);
            if width > self.width || height > self.height {
                return Err(AssemblerError::Geometry {
                    message: format!(
                        "'{}' forces a {}x{} block on a {}x{} canvas",
                        entry.name, width, height, self.width, self.height
                    ),
                    help: Some("Shrink forcewidth/forceheight to fit the canvas".to_string()),
                });
            }
            return Ok((Raster::filled(width, height, Colour::BLACK), None));
        }

        let mut failures = Vec::new();
        for source in &entry.images {
            match self.loader.load(source) {
                Ok(mut image) => {
                    let report = normalize_image(&self.palette, &mut image);
                    self.log_report(entry, &report);
                    return Ok((image, Some(report)));
                }
                Err(e) => {
                    warn!("'{}': could not load {}: {}", entry.name, source, e);
                    failures.push(source.as_str());
                }
            }
        }

        Err(AssemblerError::MissingSource {
            entry: entry.name.clone(),
            help: Some(if failures.is_empty() {
                "The entry lists no image sources".to_string()
            } else {
                format!("Tried: {}", failures.join(", "))
            }),
        })
    }

    /// Cut an exclusion block down to the part that lands on the canvas.
    ///
    /// Erasing clips anyway, so only the visible rectangle is kept and the
    /// entry is moved to its top-left corner.
    fn clip_forced(&self, entry: &TemplateEntry, (width, height): (u32, u32)) -> TemplateEntry {
        let visible = |origin: i64, len: u32, limit: usize| {
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            let start = origin.clamp(0, limit);
            let end = origin.saturating_add(i64::from(len)).clamp(0, limit);
            (start, u32::try_from(end - start).unwrap_or(u32::MAX))
        };

        let (x, clipped_width) = visible(entry.x, width, self.width);
        let (y, clipped_height) = visible(entry.y, height, self.height);
        if (x, y, clipped_width, clipped_height) != (entry.x, entry.y, width, height) {
            debug!(
                "'{}': exclusion block clipped to {}x{} at ({}, {})",
                entry.name, clipped_width, clipped_height, x, y
            );
        }

        TemplateEntry {
            x,
            y,
            force_width: Some(clipped_width),
            force_height: Some(clipped_height),
            ..entry.clone()
        }
    }

    fn log_report(&self, entry: &TemplateEntry, report: &NormalizeReport) {
        if report.is_untouched() {
            return;
        }

        warn!(
            "'{}': fixed {} incorrect pixels and {} semi-transparent pixels",
            entry.name, report.fixed_pixels, report.semi_transparent_pixels
        );

        let clean = report.is_clean(self.max_palette_distance);
        for m in &report.mismatches {
            if clean {
                debug!("  {} -> {} (delta = {:.3})", m.original, m.replacement, m.distance);
            } else {
                info!("  {} -> {} (delta = {:.3})", m.original, m.replacement, m.distance);
            }
        }

        if !clean {
            warn!(
                "'{}': too broken with max = {:.3}, excluding from autopick",
                entry.name, report.max_distance
            );
        }
    }
}
