//! Shared types for the bitmap-font atlas exporter.
//!
//! Front ends (the `bmfont-export` CLI, editors) describe glyphs with
//! [`GlyphSource`] and name output artifacts through [`BMFONT_FORMAT`].

pub mod format;
pub mod glyph;

pub use format::{AtlasFormat, BMFONT_FORMAT};
pub use glyph::GlyphSource;
