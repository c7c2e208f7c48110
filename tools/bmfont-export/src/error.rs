//! Error type shared by every export stage.

use std::path::PathBuf;

use crate::session::GlyphId;

/// Failure of a measure, pack, describe or commit step.
///
/// Nothing is retried internally; every variant reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    /// Source image missing, not a raster, or undecodable
    #[error("glyph image {path:?} is unreadable: {source}")]
    AssetUnreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// No glyphs were supplied
    #[error("cannot build an atlas from an empty glyph set")]
    EmptyGlyphSet,

    /// Atlas or preview raster too large to address or allocate
    #[error("canvas {width}x{height} exceeds the image size limit")]
    CanvasTooLarge { width: u64, height: u64 },

    /// Glyph value is not exactly one character
    #[error("glyph value {value:?} must be exactly one character")]
    InvalidCharacterValue { value: String },

    /// Creating the output directory or writing an artifact failed
    #[error("failed to write {path:?}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Session edit referenced a glyph that is no longer present
    #[error("no glyph with id {0} in session")]
    UnknownGlyph(GlyphId),
}

impl AtlasError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::AssetUnreadable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = AtlasError> = std::result::Result<T, E>;
