//! End-to-end generation: measure -> pack -> describe -> commit.

use std::path::{Path, PathBuf};

use bmfont_shared::GlyphSource;
use serde::Deserialize;

use crate::atlas::{pack, AtlasLayout};
use crate::descriptor::FontDescriptor;
use crate::error::Result;
use crate::glyph::measure_all;
use crate::output::{artifact_paths, commit, CommittedFiles};

/// How the descriptor's `page` line refers to the atlas image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PageFile {
    /// The atlas path as written, `<output_dir>/<name>.png`
    #[default]
    Path,
    /// Only `<name>.png`, for descriptors loaded next to their atlas
    FileName,
}

/// Output directory and base name of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub dir: PathBuf,
    pub name: String,
    pub page_file: PageFile,
}

impl OutputTarget {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            page_file: PageFile::default(),
        }
    }

    pub fn with_page_file(mut self, page_file: PageFile) -> Self {
        self.page_file = page_file;
        self
    }

    fn page_reference(&self, image_path: &Path) -> String {
        match self.page_file {
            PageFile::Path => image_path.display().to_string(),
            PageFile::FileName => image_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Result of a successful [`generate`].
#[derive(Debug, Clone)]
pub struct GeneratedFont {
    pub files: CommittedFiles,
    pub layout: AtlasLayout,
    pub descriptor: FontDescriptor,
}

/// Build the atlas and descriptor for `sources` and write them to `target`.
///
/// Nothing touches the filesystem until every glyph has been measured and
/// composited.
pub fn generate(sources: &[GlyphSource], target: &OutputTarget) -> Result<GeneratedFont> {
    let specs = measure_all(sources)?;
    let packed = pack(specs)?;

    let paths = artifact_paths(&target.dir, &target.name);
    let descriptor = FontDescriptor::from_layout(&packed.layout, target.page_reference(&paths.image));

    let files = commit(&target.dir, &target.name, &packed.canvas, &descriptor.render())?;

    tracing::info!(
        "Wrote {:?} and {:?} ({} glyphs)",
        files.image,
        files.descriptor,
        descriptor.chars.len()
    );

    Ok(GeneratedFont {
        files,
        layout: packed.layout,
        descriptor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtlasError;
    use crate::test_utils::write_solid_png;
    use std::fs;
    use tempfile::tempdir;

    fn digit_sources(dir: &Path) -> Vec<GlyphSource> {
        let zero = write_solid_png(dir, "wz_tip_0.png", 10, 12, [255, 0, 0, 255]);
        let one = write_solid_png(dir, "wz_tip_1.png", 8, 12, [0, 255, 0, 255]);
        vec![GlyphSource::new(zero, "0"), GlyphSource::new(one, "1")]
    }

    #[test]
    fn test_generate_two_digits() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let target = OutputTarget::new(&out, "digits");

        let font = generate(&digit_sources(dir.path()), &target).unwrap();
        assert_eq!(image::image_dimensions(&font.files.image).unwrap(), (30, 12));

        let text = fs::read_to_string(&font.files.descriptor).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[2], format!("page id=0 file=\"{}\"", out.join("digits.png").display()));
        assert_eq!(lines[3], "chars count=2");
        assert_eq!(lines[4], "char id=48 x=0 y=0 width=10 height=12 xoffset=0 yoffset=0 xadvance=10");
        assert_eq!(lines[5], "char id=49 x=10 y=0 width=8 height=12 xoffset=0 yoffset=0 xadvance=8");
    }

    #[test]
    fn test_page_file_name_mode() {
        let dir = tempdir().unwrap();
        let target = OutputTarget::new(dir.path().join("out"), "digits")
            .with_page_file(PageFile::FileName);

        let font = generate(&digit_sources(dir.path()), &target).unwrap();
        assert_eq!(font.descriptor.page.file, "digits.png");
    }

    #[test]
    fn test_generate_is_idempotent() {
        let dir = tempdir().unwrap();
        let sources = digit_sources(dir.path());
        let target = OutputTarget::new(dir.path().join("out"), "digits");

        let first = generate(&sources, &target).unwrap();
        let fnt_first = fs::read_to_string(&first.files.descriptor).unwrap();
        let png_first = image::open(&first.files.image).unwrap().to_rgba8();

        let second = generate(&sources, &target).unwrap();
        assert_eq!(fs::read_to_string(&second.files.descriptor).unwrap(), fnt_first);
        assert_eq!(image::open(&second.files.image).unwrap().to_rgba8(), png_first);
    }

    #[test]
    fn test_regenerate_reflects_new_offset_only() {
        let dir = tempdir().unwrap();
        let mut sources = digit_sources(dir.path());
        let target = OutputTarget::new(dir.path().join("out"), "digits");
        generate(&sources, &target).unwrap();

        sources[1].xoffset = 3;
        let font = generate(&sources, &target).unwrap();

        let text = fs::read_to_string(&font.files.descriptor).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("char id=49 x=10 y=0 width=8 height=12 xoffset=3 yoffset=0 xadvance=8"));
        assert!(!text.contains("xoffset=0 yoffset=0 xadvance=8"));
    }

    #[test]
    fn test_empty_set_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");

        let err = generate(&[], &OutputTarget::new(&out, "digits")).unwrap_err();
        assert!(matches!(err, AtlasError::EmptyGlyphSet));
        assert!(!out.exists());
    }

    #[test]
    fn test_unreadable_glyph_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let mut sources = digit_sources(dir.path());
        sources.push(GlyphSource::new(dir.path().join("missing.png"), "2"));

        let err = generate(&sources, &OutputTarget::new(&out, "digits")).unwrap_err();
        assert!(matches!(err, AtlasError::AssetUnreadable { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_invalid_value_rejected() {
        let dir = tempdir().unwrap();
        let mut sources = digit_sources(dir.path());
        sources[0].value = "10".to_string();

        let err = generate(&sources, &OutputTarget::new(dir.path().join("out"), "d")).unwrap_err();
        assert!(matches!(err, AtlasError::InvalidCharacterValue { .. }));
    }
}
