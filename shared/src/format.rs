//! Atlas format specification for BMFont text exports.
//!
//! `AtlasFormat` is the single source of truth for artifact extensions and the
//! fixed fields written into every descriptor.
//!
//! # Example
//!
//! ```
//! use bmfont_shared::BMFONT_FORMAT;
//!
//! assert_eq!(BMFONT_FORMAT.image_ext, "png");
//! assert_eq!(BMFONT_FORMAT.descriptor_ext, "fnt");
//! assert_eq!(BMFONT_FORMAT.pages, 1);
//! ```

/// Artifact naming and fixed descriptor fields for one export flavour.
#[derive(Debug, Clone, Copy)]
pub struct AtlasFormat {
    /// Atlas image extension without dot (e.g., "png")
    pub image_ext: &'static str,

    /// Descriptor extension without dot (e.g., "fnt")
    pub descriptor_ext: &'static str,

    /// Number of atlas pages. Exports are always single-page.
    pub pages: u32,

    /// Cosmetic `info` fields that never vary between exports.
    pub info_fields: &'static str,
}

impl AtlasFormat {
    /// Create a new atlas format specification.
    pub const fn new(
        image_ext: &'static str,
        descriptor_ext: &'static str,
        pages: u32,
        info_fields: &'static str,
    ) -> Self {
        Self {
            image_ext,
            descriptor_ext,
            pages,
            info_fields,
        }
    }

    /// `<name>.<image_ext>`
    pub fn image_file_name(&self, name: &str) -> String {
        format!("{}.{}", name, self.image_ext)
    }

    /// `<name>.<descriptor_ext>`
    pub fn descriptor_file_name(&self, name: &str) -> String {
        format!("{}.{}", name, self.descriptor_ext)
    }
}

/// BMFont text export: `.png` atlas plus `.fnt` descriptor.
pub const BMFONT_FORMAT: AtlasFormat = AtlasFormat::new(
    "png",
    "fnt",
    1,
    "stretchH=100 smooth=1 aa=1 padding=0,0,0,0 spacing=1,1 outline=0",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmfont_extensions() {
        assert_eq!(BMFONT_FORMAT.image_ext, "png");
        assert_eq!(BMFONT_FORMAT.descriptor_ext, "fnt");
    }

    #[test]
    fn test_bmfont_file_names() {
        assert_eq!(BMFONT_FORMAT.image_file_name("wz_tw"), "wz_tw.png");
        assert_eq!(BMFONT_FORMAT.descriptor_file_name("wz_tw"), "wz_tw.fnt");
    }

    #[test]
    fn test_bmfont_single_page() {
        assert_eq!(BMFONT_FORMAT.pages, 1);
        assert!(BMFONT_FORMAT.info_fields.starts_with("stretchH=100"));
    }
}
