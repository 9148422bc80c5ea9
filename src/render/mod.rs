//! Rendering module.
//!
//! Pixel grids, compositing and erasure onto canvases, export groups, and
//! PNG encoding.

mod compose;
mod group;
mod png;
mod raster;

pub use compose::{composite, erase, placement, EraseMode, TransparencyMask};
pub use group::{ExportGroup, ExportGroups, Extents, GroupCrop};
pub use png::{read_png, write_png};
pub use raster::Raster;
