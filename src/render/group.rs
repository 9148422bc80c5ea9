//! Export groups: named canvases cropped to everything drawn into them.

use serde::Serialize;

use crate::error::{AssemblerError, Result};
use crate::types::TemplateEntry;

use super::compose::{composite, erase, span_end, EraseMode, TransparencyMask};
use super::Raster;

/// Bounding box with exclusive maximum edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Extents {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Extents {
    /// The rectangle covered by a `width` x `height` image placed for `entry`.
    pub fn of_entry(entry: &TemplateEntry, width: usize, height: usize) -> Result<Self> {
        match (span_end(entry.x, width), span_end(entry.y, height)) {
            (Some(x2), Some(y2)) => Ok(Self {
                x1: entry.x,
                y1: entry.y,
                x2,
                y2,
            }),
            _ => Err(AssemblerError::Geometry {
                message: format!(
                    "'{}' at ({}, {}) with size {}x{} has no representable extents",
                    entry.name, entry.x, entry.y, width, height
                ),
                help: None,
            }),
        }
    }

    /// Smallest box covering both.
    pub fn union(self, other: Extents) -> Self {
        Self {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }
}

/// A named accumulation canvas and the box of everything placed on it.
#[derive(Debug, Clone)]
pub struct ExportGroup {
    pub name: String,
    canvas: Raster,
    extents: Option<Extents>,
}

impl ExportGroup {
    fn new(name: &str, width: usize, height: usize) -> Self {
        Self {
            name: name.to_string(),
            canvas: Raster::transparent(width, height),
            extents: None,
        }
    }

    pub fn extents(&self) -> Option<Extents> {
        self.extents
    }

    pub fn canvas(&self) -> &Raster {
        &self.canvas
    }

    /// Draw an entry into the group and grow its box.
    pub fn add(&mut self, entry: &TemplateEntry, image: &Raster) -> Result<()> {
        composite(&mut self.canvas, entry, image)?;
        let placed = Extents::of_entry(entry, image.width(), image.height())?;
        self.extents = Some(match self.extents {
            Some(current) => current.union(placed),
            None => placed,
        });
        Ok(())
    }

    /// Remove an unrelated entry's footprint.
    pub fn erase(&mut self, entry: &TemplateEntry, mask: &TransparencyMask) {
        erase(&mut self.canvas, entry, mask, EraseMode::Transparent);
    }

    /// Crop the group canvas to its box.
    pub fn finalize(self) -> Result<GroupCrop> {
        let Some(extents) = self.extents else {
            return Err(AssemblerError::Geometry {
                message: format!("Export group '{}' never received any pixels", self.name),
                help: None,
            });
        };

        if extents.x1 < 0
            || extents.y1 < 0
            || extents.x2 > self.canvas.width() as i64
            || extents.y2 > self.canvas.height() as i64
        {
            return Err(AssemblerError::Geometry {
                message: format!(
                    "Export group '{}' extents ({}, {})-({}, {}) are bigger than the canvas",
                    self.name, extents.x1, extents.y1, extents.x2, extents.y2
                ),
                help: None,
            });
        }

        let image = self.canvas.crop(
            extents.x1 as usize,
            extents.y1 as usize,
            extents.x2 as usize,
            extents.y2 as usize,
        );

        Ok(GroupCrop {
            name: self.name,
            x: extents.x1,
            y: extents.y1,
            image,
        })
    }
}

/// Export groups in creation order.
#[derive(Debug, Clone)]
pub struct ExportGroups {
    width: usize,
    height: usize,
    groups: Vec<ExportGroup>,
}

impl ExportGroups {
    /// Create an empty set whose canvases are `width` x `height`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            groups: Vec::new(),
        }
    }

    /// Fetch a group, creating it on first use.
    pub fn get_or_create(&mut self, name: &str) -> &mut ExportGroup {
        let index = match self.groups.iter().position(|g| g.name == name) {
            Some(index) => index,
            None => {
                self.groups.push(ExportGroup::new(name, self.width, self.height));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    pub fn get(&self, name: &str) -> Option<&ExportGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Draw an entry into `group` and erase its footprint from every other group.
    pub fn accumulate(
        &mut self,
        group: &str,
        entry: &TemplateEntry,
        image: &Raster,
        mask: &TransparencyMask,
    ) -> Result<()> {
        self.get_or_create(group).add(entry, image)?;
        for other in self.groups.iter_mut().filter(|g| g.name != group) {
            other.erase(entry, mask);
        }
        Ok(())
    }

    /// Erase an entry's footprint from every group.
    pub fn erase_all(&mut self, entry: &TemplateEntry, mask: &TransparencyMask) {
        for group in &mut self.groups {
            group.erase(entry, mask);
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Crop every group, in creation order.
    pub fn finalize(self) -> Result<Vec<GroupCrop>> {
        self.groups.into_iter().map(ExportGroup::finalize).collect()
    }
}

/// A finished group image and where it sits on the canvas.
#[derive(Debug, Clone)]
pub struct GroupCrop {
    pub name: String,
    pub x: i64,
    pub y: i64,
    pub image: Raster,
}
