//! template-assembler - layered pixel template assembler
//!
//! Merges an ordered list of pixel-art template entries into a full canvas,
//! an autopick canvas with its grey priority mask, and cropped export group
//! images. Source images are snapped onto a fixed palette before anything
//! is drawn.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod shape;
pub mod types;

pub use config::AssemblerConfig;
pub use discovery::{find_template_dirs, scan_directory};
pub use error::{AssemblerError, Result};
pub use export::{build_manifest, write_assembly, ExportManifest};
pub use loader::{FileLoader, ImageLoader, MemoryLoader};
pub use normalize::{normalize_image, NormalizeReport};
pub use pipeline::{Assembler, Assembly, EntryOutcome};
pub use render::{GroupCrop, Raster};
pub use shape::{classify, generate_priority_mask, Classification, PixelClass};
pub use types::{Colour, ExportInfo, Palette, Priority, TemplateEntry, TemplateFile};
