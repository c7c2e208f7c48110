//! Editable glyph collection for interactive front ends.
//!
//! A [`GlyphSession`] keeps glyphs in insertion order under stable
//! [`GlyphId`]s, so edits never depend on how a front end indexes its rows.
//! The exporter itself only ever sees the ordered [`GlyphSource`] list
//! returned by [`GlyphSession::sources`].

use std::fmt;
use std::path::{Path, PathBuf};

use bmfont_shared::GlyphSource;

use crate::error::{AtlasError, Result};
use crate::glyph::{measure_glyph, value_from_file_name};

/// Stable identity of a glyph within one session. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphId(u64);

impl fmt::Display for GlyphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGlyph {
    pub id: GlyphId,
    pub source: GlyphSource,
    pub width: u32,
    pub height: u32,
}

/// What a text preview needs to draw one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphPreview {
    pub path: PathBuf,
    pub x_offset: i32,
    pub y_offset: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Default)]
pub struct GlyphSession {
    glyphs: Vec<SessionGlyph>,
    next_id: u64,
}

impl GlyphSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from an existing glyph list, measuring each image.
    pub fn from_sources(sources: impl IntoIterator<Item = GlyphSource>) -> Result<Self> {
        let mut session = Self::new();
        for source in sources {
            session.push(source)?;
        }
        Ok(session)
    }

    /// Append a glyph, measuring its image.
    pub fn push(&mut self, source: GlyphSource) -> Result<GlyphId> {
        let (width, height) = measure_glyph(&source.image_path)?;
        let id = GlyphId(self.next_id);
        self.next_id += 1;
        self.glyphs.push(SessionGlyph {
            id,
            source,
            width,
            height,
        });
        Ok(id)
    }

    /// Append images with values taken from their file names and zero
    /// offsets. Stops at the first unreadable image; glyphs added before it
    /// stay in the session.
    pub fn add_images<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Vec<GlyphId>> {
        paths
            .into_iter()
            .map(|path| {
                let path = path.as_ref();
                let value = value_from_file_name(path).unwrap_or_default();
                self.push(GlyphSource::new(path, value))
            })
            .collect()
    }

    pub fn remove(&mut self, id: GlyphId) -> Result<SessionGlyph> {
        let index = self.index_of(id)?;
        Ok(self.glyphs.remove(index))
    }

    pub fn set_value(&mut self, id: GlyphId, value: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.source.value = value.into();
        Ok(())
    }

    pub fn set_offsets(&mut self, id: GlyphId, xoffset: i32, yoffset: i32) -> Result<()> {
        let glyph = self.get_mut(id)?;
        glyph.source.xoffset = xoffset;
        glyph.source.yoffset = yoffset;
        Ok(())
    }

    pub fn get(&self, id: GlyphId) -> Option<&SessionGlyph> {
        self.glyphs.iter().find(|g| g.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionGlyph> {
        self.glyphs.iter()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Drop every glyph. Ids keep counting up.
    pub fn clear(&mut self) {
        self.glyphs.clear();
    }

    /// First glyph (in session order) whose value is exactly `character`.
    pub fn glyph_for(&self, character: char) -> Option<GlyphPreview> {
        let mut buf = [0u8; 4];
        let needle: &str = character.encode_utf8(&mut buf);

        self.glyphs
            .iter()
            .find(|g| g.source.value == needle)
            .map(|g| GlyphPreview {
                path: g.source.image_path.clone(),
                x_offset: g.source.xoffset,
                y_offset: g.source.yoffset,
                width: g.width,
                height: g.height,
            })
    }

    /// Ordered glyph list for [`crate::generate`].
    pub fn sources(&self) -> Vec<GlyphSource> {
        self.glyphs.iter().map(|g| g.source.clone()).collect()
    }

    fn index_of(&self, id: GlyphId) -> Result<usize> {
        self.glyphs
            .iter()
            .position(|g| g.id == id)
            .ok_or(AtlasError::UnknownGlyph(id))
    }

    fn get_mut(&mut self, id: GlyphId) -> Result<&mut SessionGlyph> {
        let index = self.index_of(id)?;
        Ok(&mut self.glyphs[index])
    }
}
