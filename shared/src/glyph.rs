//! Glyph input record.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One glyph as supplied by a front end: source image, character and
/// rendering offsets.
///
/// Dimensions are not part of the record; the exporter measures them from
/// the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphSource {
    /// Path to a readable raster image
    #[serde(alias = "path")]
    pub image_path: PathBuf,

    /// The single character this glyph renders
    pub value: String,

    #[serde(default)]
    pub xoffset: i32,

    #[serde(default)]
    pub yoffset: i32,
}

impl GlyphSource {
    /// Glyph with zero offsets.
    pub fn new(image_path: impl Into<PathBuf>, value: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            value: value.into(),
            xoffset: 0,
            yoffset: 0,
        }
    }

    /// Builder-style offset setter.
    pub fn with_offsets(mut self, xoffset: i32, yoffset: i32) -> Self {
        self.xoffset = xoffset;
        self.yoffset = yoffset;
        self
    }
}
