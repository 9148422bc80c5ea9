//! Core domain types.
//!
//! - `Colour` - RGBA pixel values
//! - `Palette` - the closed set of allowed colours
//! - `TemplateEntry` / `TemplateFile` - positioned sub-images and their definition file
//! - `Priority` - validated placement priority

mod colour;
mod entry;
mod palette;
mod priority;
mod template;

pub use colour::{Colour, ALPHA_CUTOFF};
pub use entry::TemplateEntry;
pub use palette::Palette;
pub use priority::Priority;
pub use template::{ExportInfo, TemplateFile};
