//! Manifest parsing and build orchestration
//!
//! Parses bmfont.toml and drives [`crate::generate`].
//!
//! ```toml
//! [output]
//! dir = "assets/fonts"
//! name = "score"
//! page_file = "file-name"
//!
//! [[glyphs]]
//! path = "digits/score_0.png"
//! value = "0"
//!
//! [[glyphs]]
//! path = "digits/score_comma.png"
//! value = ","
//! yoffset = 6
//! ```

use anyhow::{bail, Context, Result};
use bmfont_shared::GlyphSource;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::export::{generate, GeneratedFont, OutputTarget, PageFile};
use crate::glyph::{value_from_file_name, GlyphSpec};

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "bmfont.toml";

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct FontManifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub glyphs: Vec<GlyphEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub page_file: PageFile,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            name: None,
            page_file: PageFile::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// One `[[glyphs]]` entry. Without `value`, the value comes from the file name.
#[derive(Debug, Clone, Deserialize)]
pub struct GlyphEntry {
    #[serde(alias = "image_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub xoffset: i32,
    #[serde(default)]
    pub yoffset: i32,
}

impl GlyphEntry {
    pub fn to_source(&self) -> Result<GlyphSource> {
        let value = match &self.value {
            Some(value) => value.clone(),
            None => value_from_file_name(&self.path)
                .with_context(|| format!("Cannot derive a glyph value from {:?}", self.path))?,
        };
        Ok(GlyphSource::new(&self.path, value).with_offsets(self.xoffset, self.yoffset))
    }
}

impl FontManifest {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse manifest")
    }

    /// Make relative glyph paths and the output dir relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.output.dir.is_relative() {
            self.output.dir = base.join(&self.output.dir);
        }
        for glyph in &mut self.glyphs {
            if glyph.path.is_relative() {
                glyph.path = base.join(&glyph.path);
            }
        }
    }

    /// Ordered glyph list
    pub fn sources(&self) -> Result<Vec<GlyphSource>> {
        self.glyphs.iter().map(GlyphEntry::to_source).collect()
    }

    /// Output target with CLI overrides applied.
    pub fn target(&self, dir: Option<&Path>, name: Option<&str>) -> Result<OutputTarget> {
        let name = name
            .or(self.output.name.as_deref())
            .context("No output name: set [output] name or pass --name")?;
        if name.trim().is_empty() {
            bail!("Output name must not be empty");
        }
        let dir = dir.unwrap_or(&self.output.dir);
        Ok(OutputTarget::new(dir, name).with_page_file(self.output.page_file))
    }
}

/// Load and parse a manifest file, resolving paths against its directory.
pub fn load_manifest(path: &Path) -> Result<FontManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest = FontManifest::parse(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    manifest.resolve_paths(base);
    Ok(manifest)
}

/// Validate a manifest without building: every value is one character and
/// every image measures. Returns the validated glyphs.
pub fn validate(manifest: &FontManifest) -> Result<Vec<GlyphSpec>> {
    if manifest.glyphs.is_empty() {
        bail!("Manifest has no [[glyphs]] entries");
    }

    let mut seen = HashSet::new();
    let mut specs = Vec::with_capacity(manifest.glyphs.len());
    for (index, entry) in manifest.glyphs.iter().enumerate() {
        let source = entry.to_source()?;
        let spec = GlyphSpec::measure(&source)
            .with_context(|| format!("Glyph {} ({:?}) is invalid", index, entry.path))?;
        if !seen.insert(spec.character()) {
            tracing::warn!(
                "Character {:?} appears more than once; preview uses the first entry, \
                 descriptor readers may keep either",
                spec.character()
            );
        }
        specs.push(spec);
    }

    Ok(specs)
}

/// Build the atlas and descriptor described by a manifest.
pub fn build(
    manifest: &FontManifest,
    output_override: Option<&Path>,
    name_override: Option<&str>,
) -> Result<GeneratedFont> {
    let target = manifest.target(output_override, name_override)?;
    let sources = manifest.sources()?;
    tracing::info!(
        "Building {} glyphs -> {:?} ({})",
        sources.len(),
        target.dir,
        target.name
    );
    Ok(generate(&sources, &target)?)
}
