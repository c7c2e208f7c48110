//! bmfont-export library
//!
//! Packs per-character glyph images into one PNG atlas and writes the
//! matching BMFont text descriptor.
//!
//! ```no_run
//! use bmfont_export::{generate, GlyphSource, OutputTarget};
//!
//! let glyphs = vec![
//!     GlyphSource::new("digits/score_0.png", "0"),
//!     GlyphSource::new("digits/score_1.png", "1").with_offsets(0, 2),
//! ];
//! let font = generate(&glyphs, &OutputTarget::new("assets/fonts", "score"))?;
//! println!("{}", font.files.descriptor.display());
//! # Ok::<(), bmfont_export::AtlasError>(())
//! ```

pub mod atlas;
pub mod descriptor;
pub mod error;
pub mod export;
pub mod glyph;
pub mod manifest;
pub mod output;
pub mod preview;
pub mod session;

#[cfg(test)]
mod test_utils;

pub use atlas::{layout, pack, AtlasCanvas, AtlasLayout, PackedAtlas, PackedGlyph, RowCursor};
pub use descriptor::{DescriptorError, FontDescriptor};
pub use error::AtlasError;
pub use export::{generate, GeneratedFont, OutputTarget, PageFile};
pub use glyph::{code_point, measure_glyph, GlyphSpec};
pub use output::{commit, CommittedFiles};
pub use session::{GlyphId, GlyphPreview, GlyphSession};

// Re-export the shared input record
pub use bmfont_shared::{GlyphSource, BMFONT_FORMAT};
