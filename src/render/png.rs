//! PNG input and output for rasters.

use std::path::Path;

use crate::error::{AssemblerError, Result};

use super::Raster;

/// Write a raster to a PNG file.
pub fn write_png(raster: &Raster, path: &Path) -> Result<()> {
    raster.to_rgba_image().save(path).map_err(|e| AssemblerError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })
}

/// Decode an image file into an RGBA raster.
pub fn read_png(path: &Path) -> Result<Raster> {
    let img = image::open(path)
        .map_err(|e| AssemblerError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read image: {}", e),
        })?
        .to_rgba8();

    Ok(Raster::from_rgba_image(&img))
}
