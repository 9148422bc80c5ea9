//! Writing a finished assembly to disk.
//!
//! Produces the three canvas PNGs, one cropped PNG per export group and,
//! when publication details are known, a manifest describing where each
//! group image sits on the canvas.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AssemblerError, Result};
use crate::pipeline::Assembly;
use crate::render::{write_png, GroupCrop};
use crate::types::ExportInfo;

pub const CANVAS_FILE: &str = "canvas.png";
pub const AUTOPICK_FILE: &str = "autopick.png";
pub const MASK_FILE: &str = "mask.png";
pub const MANIFEST_FILE: &str = "endu_template.json";

/// Manifest listing exported group images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportManifest {
    pub faction: String,
    pub contact: String,
    pub templates: Vec<ExportedGroup>,
}

/// One exported group as seen by consumers of the manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedGroup {
    pub name: String,
    pub sources: Vec<String>,
    pub x: i64,
    pub y: i64,
}

/// Escape a group name for use in a file name or URL (form encoding).
pub fn escape_group_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' => {
                escaped.push(byte as char)
            }
            b' ' => escaped.push('+'),
            _ => escaped.push_str(&format!("%{:02X}", byte)),
        }
    }
    escaped
}

/// File stem of a group's image.
pub fn group_image_stem(group: &str) -> String {
    format!("endu_{}", escape_group_name(group))
}

/// Build the manifest for `groups`.
///
/// Groups are listed newest first, mirroring their layer order in the
/// template definition.
pub fn build_manifest(info: &ExportInfo, groups: &[GroupCrop]) -> ExportManifest {
    let templates = groups
        .iter()
        .rev()
        .map(|group| ExportedGroup {
            name: format!("{} - {}", info.name, group.name),
            sources: vec![format!("{}{}.png", info.source_root, group_image_stem(&group.name))],
            x: group.x,
            y: group.y,
        })
        .collect();

    ExportManifest {
        faction: info.name.clone(),
        contact: info.contact.clone(),
        templates,
    }
}

/// Write every output of `assembly` into `dir`, returning the written paths.
pub fn write_assembly(
    assembly: &Assembly,
    dir: &Path,
    info: Option<&ExportInfo>,
) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| AssemblerError::Io {
            path: dir.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let mut written = Vec::new();
    for (file, raster) in [
        (CANVAS_FILE, &assembly.canvas),
        (AUTOPICK_FILE, &assembly.autopick),
        (MASK_FILE, &assembly.priority),
    ] {
        let path = dir.join(file);
        write_png(raster, &path)?;
        written.push(path);
    }

    for group in &assembly.groups {
        let path = dir.join(format!("{}.png", group_image_stem(&group.name)));
        write_png(&group.image, &path)?;
        written.push(path);
    }

    if let Some(info) = info {
        let manifest = build_manifest(info, &assembly.groups);
        let json = serde_json::to_string_pretty(&manifest).map_err(|e| AssemblerError::Parse {
            message: format!("Failed to serialize export manifest: {}", e),
            help: None,
        })?;
        let path = dir.join(MANIFEST_FILE);
        fs::write(&path, json).map_err(|e| AssemblerError::Io {
            path: path.clone(),
            message: format!("Failed to write manifest: {}", e),
        })?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Raster;
    use crate::types::Colour;
    use tempfile::tempdir;

    fn info() -> ExportInfo {
        ExportInfo {
            name: "Pixel Club".to_string(),
            contact: "admin@example.org".to_string(),
            source_root: "https://example.org/t/".to_string(),
        }
    }

    fn crop(name: &str, x: i64, y: i64) -> GroupCrop {
        GroupCrop {
            name: name.to_string(),
            x,
            y,
            image: Raster::filled(2, 2, Colour::WHITE),
        }
    }

    #[test]
    fn test_escape_group_name() {
        assert_eq!(escape_group_name("plain-name_1.0~"), "plain-name_1.0~");
        assert_eq!(escape_group_name("two words"), "two+words");
        assert_eq!(escape_group_name("a/b&c"), "a%2Fb%26c");
        assert_eq!(escape_group_name("é"), "%C3%A9");
    }

    #[test]
    fn test_manifest_lists_groups_newest_first() {
        let manifest = build_manifest(&info(), &[crop("old", 1, 2), crop("new one", 3, 4)]);

        assert_eq!(manifest.faction, "Pixel Club");
        assert_eq!(manifest.templates.len(), 2);
        assert_eq!(manifest.templates[0].name, "Pixel Club - new one");
        assert_eq!(
            manifest.templates[0].sources,
            vec!["https://example.org/t/endu_new+one.png".to_string()]
        );
        assert_eq!((manifest.templates[1].x, manifest.templates[1].y), (1, 2));
    }

    #[test]
    fn test_write_assembly() {
        let assembly = Assembly {
            canvas: Raster::transparent(4, 4),
            autopick: Raster::transparent(4, 4),
            priority: Raster::filled(4, 4, Colour::BLACK),
            groups: vec![crop("g", 0, 0)],
            outcomes: vec![],
        };

        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let written = write_assembly(&assembly, &out, Some(&info())).unwrap();

        assert_eq!(written.len(), 5);
        for file in [CANVAS_FILE, AUTOPICK_FILE, MASK_FILE, "endu_g.png", MANIFEST_FILE] {
            assert!(out.join(file).exists(), "{} missing", file);
        }

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(MANIFEST_FILE)).unwrap()).unwrap();
        assert_eq!(manifest["templates"][0]["name"], "Pixel Club - g");
    }

    #[test]
    fn test_no_manifest_without_info() {
        let assembly = Assembly {
            canvas: Raster::transparent(1, 1),
            autopick: Raster::transparent(1, 1),
            priority: Raster::transparent(1, 1),
            groups: vec![],
            outcomes: vec![],
        };
        let dir = tempdir().unwrap();
        let written = write_assembly(&assembly, dir.path(), None).unwrap();
        assert_eq!(written.len(), 3);
        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }
}
