//! Anchor map resources.
//!
//! An anchor map describes the fixed UWB anchor layout for one space.
//! Resources live as JSON files under a configured directory and are
//! addressed by name; any extension on the name is ignored, so
//! "testroom" and "testroom.json" resolve to the same file. A missing
//! or unreadable resource is an error the caller downgrades to a
//! warning: the source simply stays uninitialized.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One fixed anchor position, meters, source frame.
#[derive(Debug, Clone, Deserialize)]
pub struct Anchor {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Parsed anchor map document.
#[derive(Debug, Clone, Deserialize)]
pub struct AnchorMap {
    pub anchors: Vec<Anchor>,
}

impl AnchorMap {
    /// Parse an anchor map document.
    pub fn parse(json: &str) -> Result<Self> {
        let map: AnchorMap = serde_json::from_str(json)?;
        Ok(map)
    }
}

/// Resolve an anchor resource name to its file path.
fn resource_path(dir: &str, name: &str) -> Result<PathBuf> {
    let stem = Path::new(name)
        .file_stem()
        .ok_or_else(|| Error::AnchorMap(format!("invalid anchor map name: {:?}", name)))?;
    Ok(PathBuf::from(dir).join(format!("{}.json", stem.to_string_lossy())))
}

/// Read the raw anchor map JSON for `name` from `dir`.
///
/// Returns the document text unparsed; the positioning boundary does
/// its own validation when the map is handed over.
pub fn load_anchor_json(dir: &str, name: &str) -> Result<String> {
    let path = resource_path(dir, name)?;
    std::fs::read_to_string(&path)
        .map_err(|e| Error::AnchorMap(format!("{}: {}", path.display(), e)))
}
