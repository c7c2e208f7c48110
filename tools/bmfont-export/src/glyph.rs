//! Glyph measurement and validation.
//!
//! Turns a [`GlyphSource`] into a [`GlyphSpec`] whose dimensions come from the
//! image header. Images are opened read-only, one at a time.

use std::path::{Path, PathBuf};

use bmfont_shared::GlyphSource;
use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageError, ImageReader, RgbaImage};

use crate::error::{AtlasError, Result};

/// A validated glyph with its measured pixel size.
///
/// Only constructed by [`GlyphSpec::measure`], so `width` and `height` are
/// always positive and `character` is a single code point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSpec {
    source_image_path: PathBuf,
    character: char,
    x_offset: i32,
    y_offset: i32,
    width: u32,
    height: u32,
}

impl GlyphSpec {
    /// Validate the character value, then read the image dimensions.
    pub fn measure(source: &GlyphSource) -> Result<Self> {
        let character = single_char(&source.value)?;
        let (width, height) = measure_glyph(&source.image_path)?;

        Ok(Self {
            source_image_path: source.image_path.clone(),
            character,
            x_offset: source.xoffset,
            y_offset: source.yoffset,
            width,
            height,
        })
    }

    pub fn source_image_path(&self) -> &Path {
        &self.source_image_path
    }

    pub fn character(&self) -> char {
        self.character
    }

    /// Numeric code point used as the descriptor's `id`
    pub fn code_point(&self) -> u32 {
        u32::from(self.character)
    }

    pub fn x_offset(&self) -> i32 {
        self.x_offset
    }

    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Measure every source in order. The first failure aborts.
pub fn measure_all(sources: &[GlyphSource]) -> Result<Vec<GlyphSpec>> {
    sources.iter().map(GlyphSpec::measure).collect()
}

/// Read `(width, height)` from an image header.
///
/// The format is sniffed from content, so a mislabelled extension still
/// measures. Zero-sized images are rejected.
pub fn measure_glyph(path: &Path) -> Result<(u32, u32)> {
    let (width, height) = open_reader(path)?
        .into_dimensions()
        .map_err(|e| AtlasError::unreadable(path, e))?;

    if width == 0 || height == 0 {
        return Err(AtlasError::unreadable(
            path,
            ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::Generic(
                format!("image has zero size ({}x{})", width, height),
            ))),
        ));
    }

    Ok((width, height))
}

/// Decode a glyph image to RGBA8.
pub fn decode_glyph(path: &Path) -> Result<RgbaImage> {
    let image = open_reader(path)?
        .decode()
        .map_err(|e| AtlasError::unreadable(path, e))?;
    Ok(image.to_rgba8())
}

fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| AtlasError::unreadable(path, ImageError::IoError(e)))
}

/// Extract the single character of a glyph value.
pub fn single_char(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(AtlasError::InvalidCharacterValue {
            value: value.to_string(),
        }),
    }
}

/// Code point of a one-character glyph value.
pub fn code_point(value: &str) -> Result<u32> {
    single_char(value).map(u32::from)
}

/// Derive a glyph value from an image file name.
///
/// Takes the last `_`-separated segment of the file stem
/// (`wz_tip_x.png` -> `"x"`). Segments of ASCII digits lose leading zeros
/// (`wz_tip_07.png` -> `"7"`); other Unicode digits are kept as written.
/// The result may be longer than one character;
/// it is validated when the glyph is measured for export.
pub fn value_from_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let segment = stem.rsplit('_').next().unwrap_or(stem);
    if segment.is_empty() {
        return None;
    }

    if segment.bytes().all(|b| b.is_ascii_digit()) {
        let trimmed = segment.trim_start_matches('0');
        return Some(if trimmed.is_empty() { "0" } else { trimmed }.to_string());
    }

    Some(segment.to_string())
}
