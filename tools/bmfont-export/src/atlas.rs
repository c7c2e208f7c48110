//! Atlas packing and compositing.
//!
//! Glyphs are laid out left to right in input order on rows exactly
//! `max_glyph_height` tall. The canvas is `(glyph_count + 1) * max_glyph_width`
//! wide and one row high. Since every glyph is at most `max_glyph_width` wide,
//! the cursor stays below the canvas width and a wrap never happens through
//! [`layout`]; [`RowCursor`] still carries the wrap rule so the arithmetic
//! matches other exporters of this format bit for bit.

use image::error::{ParameterError, ParameterErrorKind};
use image::{imageops, ImageError, Limits, RgbaImage};

use crate::error::{AtlasError, Result};
use crate::glyph::{decode_glyph, GlyphSpec};

/// Composited atlas raster (RGBA8, transparent where no glyph was pasted).
pub type AtlasCanvas = RgbaImage;

/// Cursor walking the atlas rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCursor {
    x: u32,
    y: u32,
    row_width: u32,
    row_height: u32,
}

impl RowCursor {
    pub fn new(row_width: u32, row_height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            row_width,
            row_height,
        }
    }

    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// Hand out the current position for a glyph `width` pixels wide, then
    /// advance. Reaching or passing the row width moves to the next row.
    pub fn place(&mut self, width: u32) -> (u32, u32) {
        let position = (self.x, self.y);
        self.x += width;
        if self.x >= self.row_width {
            self.x = 0;
            self.y += self.row_height;
        }
        position
    }
}

/// A glyph with its rectangle inside the atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedGlyph {
    pub spec: GlyphSpec,
    pub atlas_x: u32,
    pub atlas_y: u32,
}

impl PackedGlyph {
    /// Whether the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &PackedGlyph) -> bool {
        self.atlas_x < other.atlas_x + other.spec.width()
            && other.atlas_x < self.atlas_x + self.spec.width()
            && self.atlas_y < other.atlas_y + other.spec.height()
            && other.atlas_y < self.atlas_y + self.spec.height()
    }
}

/// Canvas size and placement of every glyph, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub max_glyph_width: u32,
    pub max_glyph_height: u32,
    pub glyphs: Vec<PackedGlyph>,
}

/// Layout plus the composited pixels.
#[derive(Debug, Clone)]
pub struct PackedAtlas {
    pub layout: AtlasLayout,
    pub canvas: AtlasCanvas,
}

/// Compute canvas size and glyph positions without touching pixels.
pub fn layout(specs: Vec<GlyphSpec>) -> Result<AtlasLayout> {
    let max_glyph_width = specs.iter().map(GlyphSpec::width).max();
    let max_glyph_height = specs.iter().map(GlyphSpec::height).max();
    let (Some(max_glyph_width), Some(max_glyph_height)) = (max_glyph_width, max_glyph_height)
    else {
        return Err(AtlasError::EmptyGlyphSet);
    };

    let canvas_width = u32::try_from(specs.len())
        .ok()
        .and_then(|count| count.checked_add(1))
        .and_then(|cells| cells.checked_mul(max_glyph_width))
        .ok_or(AtlasError::CanvasTooLarge {
            width: (specs.len() as u64 + 1).saturating_mul(u64::from(max_glyph_width)),
            height: u64::from(max_glyph_height),
        })?;
    let canvas_height = max_glyph_height;

    let mut cursor = RowCursor::new(canvas_width, max_glyph_height);
    let glyphs = specs
        .into_iter()
        .map(|spec| {
            let (atlas_x, atlas_y) = cursor.place(spec.width());
            PackedGlyph {
                spec,
                atlas_x,
                atlas_y,
            }
        })
        .collect();

    Ok(AtlasLayout {
        canvas_width,
        canvas_height,
        max_glyph_width,
        max_glyph_height,
        glyphs,
    })
}

/// Reject an RGBA8 raster larger than the `image` crate's default allocation limit.
pub(crate) fn check_allocation(width: u32, height: u32) -> Result<()> {
    let bytes = u64::from(width) * u64::from(height) * 4;
    match Limits::default().max_alloc {
        Some(max_alloc) if bytes > max_alloc => Err(AtlasError::CanvasTooLarge {
            width: u64::from(width),
            height: u64::from(height),
        }),
        _ => Ok(()),
    }
}

/// Lay out the glyphs and paste each source image into a fresh canvas.
///
/// Sources are decoded one at a time. A source whose decoded size no longer
/// matches its measured size fails the whole pack.
pub fn pack(specs: Vec<GlyphSpec>) -> Result<PackedAtlas> {
    let layout = layout(specs)?;

    tracing::info!(
        "Atlas size: {}x{} ({} glyphs, cell {}x{})",
        layout.canvas_width,
        layout.canvas_height,
        layout.glyphs.len(),
        layout.max_glyph_width,
        layout.max_glyph_height
    );

    check_allocation(layout.canvas_width, layout.canvas_height)?;
    let mut canvas = AtlasCanvas::new(layout.canvas_width, layout.canvas_height);

    for glyph in &layout.glyphs {
        let path = glyph.spec.source_image_path();
        let raster = decode_glyph(path)?;
        if raster.dimensions() != (glyph.spec.width(), glyph.spec.height()) {
            return Err(AtlasError::unreadable(
                path,
                ImageError::Parameter(ParameterError::from_kind(
                    ParameterErrorKind::DimensionMismatch,
                )),
            ));
        }

        if glyph.atlas_y + glyph.spec.height() > layout.canvas_height {
            tracing::warn!(
                "Glyph {:?} at y={} extends past the atlas height {}",
                glyph.spec.character(),
                glyph.atlas_y,
                layout.canvas_height
            );
        }

        imageops::replace(
            &mut canvas,
            &raster,
            i64::from(glyph.atlas_x),
            i64::from(glyph.atlas_y),
        );

        tracing::debug!(
            "Placed {:?} ({}x{}) at ({}, {})",
            glyph.spec.character(),
            glyph.spec.width(),
            glyph.spec.height(),
            glyph.atlas_x,
            glyph.atlas_y
        );
    }

    Ok(PackedAtlas { layout, canvas })
}
