//! Text preview using the current session glyphs.
//!
//! Mirrors how a renderer consumes the descriptor: the pen moves by the
//! glyph's `xoffset`, the glyph is drawn at `(pen, yoffset)`, then the pen
//! advances by the glyph width. Characters without a glyph are skipped.

use image::{imageops, RgbaImage};

use crate::atlas::check_allocation;
use crate::error::{AtlasError, Result};
use crate::glyph::decode_glyph;
use crate::session::{GlyphPreview, GlyphSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPlacement {
    pub character: char,
    pub glyph: GlyphPreview,
    pub x: i64,
    pub y: i64,
}

pub fn layout(session: &GlyphSession, text: &str) -> Vec<PreviewPlacement> {
    let mut pen = 0i64;
    let mut placements = Vec::new();

    for character in text.chars() {
        let Some(glyph) = session.glyph_for(character) else {
            continue;
        };
        pen += i64::from(glyph.x_offset);
        let y = i64::from(glyph.y_offset);
        let advance = i64::from(glyph.width);
        placements.push(PreviewPlacement {
            character,
            glyph,
            x: pen,
            y,
        });
        pen += advance;
    }

    placements
}

/// Composite the preview into an image cropped to the drawn glyphs.
///
/// Returns `None` when no character of `text` has a glyph.
pub fn render(session: &GlyphSession, text: &str) -> Result<Option<RgbaImage>> {
    let placements = layout(session, text);
    if placements.is_empty() {
        return Ok(None);
    }

    let min_x = placements.iter().map(|p| p.x).min().unwrap_or(0);
    let min_y = placements.iter().map(|p| p.y).min().unwrap_or(0);
    let max_x = placements
        .iter()
        .map(|p| p.x + i64::from(p.glyph.width))
        .max()
        .unwrap_or(0);
    let max_y = placements
        .iter()
        .map(|p| p.y + i64::from(p.glyph.height))
        .max()
        .unwrap_or(0);

    let (span_x, span_y) = (max_x - min_x, max_y - min_y);
    let too_large = || AtlasError::CanvasTooLarge {
        width: span_x.unsigned_abs(),
        height: span_y.unsigned_abs(),
    };
    let width = u32::try_from(span_x).map_err(|_| too_large())?;
    let height = u32::try_from(span_y).map_err(|_| too_large())?;
    check_allocation(width, height)?;

    let mut image = RgbaImage::new(width, height);
    for placement in &placements {
        let raster = decode_glyph(&placement.glyph.path)?;
        imageops::overlay(&mut image, &raster, placement.x - min_x, placement.y - min_y);
    }

    Ok(Some(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_solid_png;
    use tempfile::tempdir;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];

    fn session(dir: &std::path::Path) -> (GlyphSession, Vec<crate::session::GlyphId>) {
        let mut session = GlyphSession::new();
        let ids = session
            .add_images([
                write_solid_png(dir, "s_1.png", 4, 6, RED),
                write_solid_png(dir, "s_2.png", 3, 5, GREEN),
            ])
            .unwrap();
        (session, ids)
    }

    #[test]
    fn test_pen_advances_by_offset_then_width() {
        let dir = tempdir().unwrap();
        let (mut session, ids) = session(dir.path());
        session.set_offsets(ids[1], 2, 1).unwrap();

        let positions: Vec<_> = layout(&session, "1212")
            .iter()
            .map(|p| (p.character, p.x, p.y))
            .collect();
        assert_eq!(
            positions,
            vec![('1', 0, 0), ('2', 6, 1), ('1', 9, 0), ('2', 15, 1)]
        );
    }

    #[test]
    fn test_unknown_characters_skipped() {
        let dir = tempdir().unwrap();
        let (session, _) = session(dir.path());

        let placed: Vec<_> = layout(&session, "1?2").iter().map(|p| p.x).collect();
        assert_eq!(placed, vec![0, 4]);
        assert!(render(&session, "???").unwrap().is_none());
    }

    #[test]
    fn test_render_crops_to_glyphs() {
        let dir = tempdir().unwrap();
        let (mut session, ids) = session(dir.path());
        session.set_offsets(ids[0], 0, -1).unwrap();

        let image = render(&session, "12").unwrap().unwrap();
        // Glyph 1 spans y -1..5, glyph 2 spans 0..5
        assert_eq!(image.dimensions(), (7, 6));
        assert_eq!(image.get_pixel(0, 0).0, RED);
        assert_eq!(image.get_pixel(4, 1).0, GREEN);
        assert_eq!(image.get_pixel(4, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_huge_offsets_are_an_error() {
        let dir = tempdir().unwrap();
        let (mut session, ids) = session(dir.path());
        session.set_offsets(ids[0], i32::MAX, 0).unwrap();

        // Span fits in u32 but the raster is far past the allocation limit
        assert!(matches!(
            render(&session, "11"),
            Err(AtlasError::CanvasTooLarge { .. })
        ));
        // Span no longer fits in u32
        let placements = layout(&session, "111");
        let span = placements[2].x + 4 - placements[0].x;
        assert!(span > i64::from(u32::MAX));
        assert!(matches!(
            render(&session, "111"),
            Err(AtlasError::CanvasTooLarge { width, height: 6 }) if width == span as u64
        ));
    }
}
