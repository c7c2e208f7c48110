//! BMFont text descriptor (.fnt)
//!
//! Four header lines (`info`, `common`, `page`, `chars`) followed by one `char`
//! line per glyph in atlas order:
//!
//! ```text
//! info size=12 unicode=1 stretchH=100 smooth=1 aa=1 padding=0,0,0,0 spacing=1,1 outline=0
//! common lineHeight=12 base=12 scaleW=30 scaleH=12 pages=1 packed=0
//! page id=0 file="out/digits.png"
//! chars count=2
//! char id=48 x=0 y=0 width=10 height=12 xoffset=0 yoffset=0 xadvance=10
//! char id=49 x=10 y=0 width=8 height=12 xoffset=0 yoffset=0 xadvance=8
//! ```

use std::fmt;
use std::str::FromStr;

use bmfont_shared::BMFONT_FORMAT;

use crate::atlas::AtlasLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoLine {
    /// Face size, equal to the atlas height
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonLine {
    pub line_height: u32,
    pub base: u32,
    pub scale_w: u32,
    pub scale_h: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLine {
    pub id: u32,
    pub file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharLine {
    /// Code point
    pub id: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub xoffset: i32,
    pub yoffset: i32,
    pub xadvance: u32,
}

/// In-memory form of a `.fnt` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    pub info: InfoLine,
    pub common: CommonLine,
    pub page: PageLine,
    pub chars: Vec<CharLine>,
}

impl FontDescriptor {
    /// Describe a laid-out atlas. `page_file` is written verbatim into the
    /// `page` line.
    pub fn from_layout(layout: &AtlasLayout, page_file: impl Into<String>) -> Self {
        let height = layout.canvas_height;

        let chars = layout
            .glyphs
            .iter()
            .map(|glyph| CharLine {
                id: glyph.spec.code_point(),
                x: glyph.atlas_x,
                y: glyph.atlas_y,
                width: glyph.spec.width(),
                height: glyph.spec.height(),
                xoffset: glyph.spec.x_offset(),
                yoffset: glyph.spec.y_offset(),
                xadvance: glyph.spec.width(),
            })
            .collect();

        Self {
            info: InfoLine { size: height },
            common: CommonLine {
                line_height: height,
                base: height,
                scale_w: layout.canvas_width,
                scale_h: height,
                pages: BMFONT_FORMAT.pages,
            },
            page: PageLine {
                id: 0,
                file: page_file.into(),
            },
            chars,
        }
    }

    /// Serialize to newline-joined text (no trailing newline).
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Parse descriptor text.
    ///
    /// Token order and spacing are free; unknown keys and unknown line tags
    /// (e.g. `kerning`) are ignored.
    pub fn parse(text: &str) -> Result<Self, DescriptorError> {
        let mut info = None;
        let mut common = None;
        let mut page = None;
        let mut declared = None;
        let mut chars = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let mut tokens = tokenize(raw).into_iter();
            let Some(tag) = tokens.next() else {
                continue;
            };
            let fields = Fields {
                line_no,
                pairs: tokens
                    .filter_map(|token| {
                        token
                            .split_once('=')
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                    })
                    .collect(),
            };

            match tag.as_str() {
                "info" => {
                    info = Some(InfoLine {
                        size: fields.get("size")?,
                    })
                }
                "common" => {
                    common = Some(CommonLine {
                        line_height: fields.get("lineHeight")?,
                        base: fields.get("base")?,
                        scale_w: fields.get("scaleW")?,
                        scale_h: fields.get("scaleH")?,
                        pages: fields.get("pages")?,
                    })
                }
                "page" => {
                    page = Some(PageLine {
                        id: fields.get("id")?,
                        file: fields.raw("file")?.to_string(),
                    })
                }
                "chars" => declared = Some(fields.get::<usize>("count")?),
                "char" => chars.push(CharLine {
                    id: fields.get("id")?,
                    x: fields.get("x")?,
                    y: fields.get("y")?,
                    width: fields.get("width")?,
                    height: fields.get("height")?,
                    xoffset: fields.get("xoffset")?,
                    yoffset: fields.get("yoffset")?,
                    xadvance: fields.get("xadvance")?,
                }),
                _ => {}
            }
        }

        let declared = declared.ok_or(DescriptorError::MissingLine("chars"))?;
        if declared != chars.len() {
            return Err(DescriptorError::CountMismatch {
                declared,
                found: chars.len(),
            });
        }

        Ok(Self {
            info: info.ok_or(DescriptorError::MissingLine("info"))?,
            common: common.ok_or(DescriptorError::MissingLine("common"))?,
            page: page.ok_or(DescriptorError::MissingLine("page"))?,
            chars,
        })
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "info size={} unicode=1 {}",
            self.info.size, BMFONT_FORMAT.info_fields
        )?;
        write!(
            f,
            "\ncommon lineHeight={} base={} scaleW={} scaleH={} pages={} packed=0",
            self.common.line_height,
            self.common.base,
            self.common.scale_w,
            self.common.scale_h,
            self.common.pages
        )?;
        write!(f, "\npage id={} file=\"{}\"", self.page.id, self.page.file)?;
        write!(f, "\nchars count={}", self.chars.len())?;
        for c in &self.chars {
            write!(
                f,
                "\nchar id={} x={} y={} width={} height={} xoffset={} yoffset={} xadvance={}",
                c.id, c.x, c.y, c.width, c.height, c.xoffset, c.yoffset, c.xadvance
            )?;
        }
        Ok(())
    }
}

/// Malformed descriptor text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("missing `{0}` line")]
    MissingLine(&'static str),

    #[error("line {line}: missing field `{key}`")]
    MissingField { line: usize, key: String },

    #[error("line {line}: invalid value {value:?} for `{key}`")]
    InvalidField {
        line: usize,
        key: String,
        value: String,
    },

    #[error("chars count={declared} but {found} char lines present")]
    CountMismatch { declared: usize, found: usize },
}

struct Fields {
    line_no: usize,
    pairs: Vec<(String, String)>,
}

impl Fields {
    fn raw(&self, key: &str) -> Result<&str, DescriptorError> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| DescriptorError::MissingField {
                line: self.line_no,
                key: key.to_string(),
            })
    }

    fn get<T: FromStr>(&self, key: &str) -> Result<T, DescriptorError> {
        let value = self.raw(key)?;
        value.parse().map_err(|_| DescriptorError::InvalidField {
            line: self.line_no,
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Split on whitespace, keeping double-quoted runs together and dropping
/// the quotes.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::layout;
    use crate::glyph::measure_all;
    use crate::test_utils::write_solid_png;
    use bmfont_shared::GlyphSource;
    use tempfile::tempdir;

    fn digits_layout(dir: &std::path::Path) -> AtlasLayout {
        let zero = write_solid_png(dir, "0.png", 10, 12, [255, 255, 255, 255]);
        let one = write_solid_png(dir, "1.png", 8, 12, [255, 255, 255, 255]);
        let specs = measure_all(&[GlyphSource::new(zero, "0"), GlyphSource::new(one, "1")]).unwrap();
        layout(specs).unwrap()
    }

    #[test]
    fn test_render_two_digit_scenario() {
        let dir = tempdir().unwrap();
        let descriptor = FontDescriptor::from_layout(&digits_layout(dir.path()), "out/digits.png");

        let text = descriptor.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "info size=12 unicode=1 stretchH=100 smooth=1 aa=1 padding=0,0,0,0 spacing=1,1 outline=0",
                "common lineHeight=12 base=12 scaleW=30 scaleH=12 pages=1 packed=0",
                "page id=0 file=\"out/digits.png\"",
                "chars count=2",
                "char id=48 x=0 y=0 width=10 height=12 xoffset=0 yoffset=0 xadvance=10",
                "char id=49 x=10 y=0 width=8 height=12 xoffset=0 yoffset=0 xadvance=8",
            ]
        );
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_offsets_written_signed() {
        let dir = tempdir().unwrap();
        let path = write_solid_png(dir.path(), "x.png", 4, 4, [0, 0, 0, 255]);
        let specs = measure_all(&[GlyphSource::new(path, "x").with_offsets(-3, 2)]).unwrap();

        let descriptor = FontDescriptor::from_layout(&layout(specs).unwrap(), "x.png");
        assert!(descriptor
            .render()
            .ends_with("char id=120 x=0 y=0 width=4 height=4 xoffset=-3 yoffset=2 xadvance=4"));
    }

    #[test]
    fn test_parse_rendered_descriptor() {
        let dir = tempdir().unwrap();
        let descriptor =
            FontDescriptor::from_layout(&digits_layout(dir.path()), "fonts dir/digits.png");

        let parsed = FontDescriptor::parse(&descriptor.render()).unwrap();
        assert_eq!(parsed, descriptor);
        assert_eq!(parsed.page.file, "fonts dir/digits.png");
    }

    #[test]
    fn test_parse_tolerates_extra_fields_and_spacing() {
        let text = "info face=\"Arial\" size=32 bold=0\r\n\
                    common lineHeight=32  base=26 scaleW=256 scaleH=256 pages=1 packed=0\n\
                    page id=0 file=\"arial.png\"\n\
                    chars count=1\n\
                    char id=65   x=2 y=3 width=20 height=22 xoffset=-1 yoffset=4 xadvance=19 page=0 chnl=15\n\
                    kernings count=0\n";

        let parsed = FontDescriptor::parse(text).unwrap();
        assert_eq!(parsed.info.size, 32);
        assert_eq!(parsed.common.base, 26);
        assert_eq!(parsed.chars[0].id, 65);
        assert_eq!(parsed.chars[0].xoffset, -1);
        assert_eq!(parsed.chars[0].xadvance, 19);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            FontDescriptor::parse("info size=1").unwrap_err(),
            DescriptorError::MissingLine("chars")
        );

        let mismatch = "info size=1\ncommon lineHeight=1 base=1 scaleW=2 scaleH=1 pages=1\n\
                        page id=0 file=\"a.png\"\nchars count=2\n\
                        char id=48 x=0 y=0 width=1 height=1 xoffset=0 yoffset=0 xadvance=1";
        assert_eq!(
            FontDescriptor::parse(mismatch).unwrap_err(),
            DescriptorError::CountMismatch {
                declared: 2,
                found: 1
            }
        );

        assert_eq!(
            FontDescriptor::parse("info size=big").unwrap_err(),
            DescriptorError::InvalidField {
                line: 1,
                key: "size".to_string(),
                value: "big".to_string()
            }
        );
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize("page id=0 file=\"a b.png\""),
            vec!["page", "id=0", "file=a b.png"]
        );
    }
}
