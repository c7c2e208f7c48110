//! bmfont-export - bitmap-font export tool
//!
//! Packs per-character glyph images (PNG/JPG) into a single PNG atlas and a
//! BMFont text descriptor (.fnt)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bmfont_export::manifest::{self, DEFAULT_MANIFEST};
use bmfont_export::{generate, preview, FontDescriptor, GlyphSession, OutputTarget, PageFile};

#[derive(Parser)]
#[command(name = "bmfont-export")]
#[command(about = "Bitmap-font atlas export tool")]
#[command(version)]
struct Cli {
    /// Verbose output (per-glyph placement)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build atlas and descriptor from a manifest file
    Build {
        /// Path to bmfont.toml manifest
        #[arg(default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base name of the .png/.fnt pair (overrides manifest)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Validate manifest without building
    Check {
        /// Path to bmfont.toml manifest
        #[arg(default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,
    },

    /// Build directly from images, taking each value from the file name
    Images {
        /// Glyph images, in atlas order (e.g. score_0.png score_1.png)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Base name of the .png/.fnt pair
        #[arg(short, long)]
        name: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// How the descriptor references the atlas image
        #[arg(long, value_enum, default_value_t = PageFile::Path)]
        page_file: PageFile,
    },

    /// Render a text preview with the manifest's glyphs
    Preview {
        /// Text to render
        text: String,

        /// Path to bmfont.toml manifest
        #[arg(short, long, default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,

        /// Output PNG file
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },

    /// Print a summary of an existing .fnt descriptor
    Inspect {
        /// Descriptor file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            name,
        } => {
            tracing::info!("Building font from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::build(&config, output.as_deref(), name.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let specs = manifest::validate(&config)?;
            tracing::info!("Manifest is valid! ({} glyphs)", specs.len());
        }

        Commands::Images {
            inputs,
            name,
            output,
            page_file,
        } => {
            let mut session = GlyphSession::new();
            session.add_images(&inputs)?;
            let target = OutputTarget::new(output, name).with_page_file(page_file);
            generate(&session.sources(), &target)?;
            tracing::info!("Done!");
        }

        Commands::Preview {
            text,
            manifest,
            output,
        } => {
            let config = manifest::load_manifest(&manifest)?;
            let session = GlyphSession::from_sources(config.sources()?)?;
            match preview::render(&session, &text)? {
                Some(image) => {
                    image
                        .save(&output)
                        .with_context(|| format!("Failed to write preview: {:?}", output))?;
                    tracing::info!(
                        "Preview {}x{} -> {:?}",
                        image.width(),
                        image.height(),
                        output
                    );
                }
                None => anyhow::bail!("No character of {:?} has a glyph", text),
            }
        }

        Commands::Inspect { input } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read descriptor: {:?}", input))?;
            let descriptor = FontDescriptor::parse(&content)
                .with_context(|| format!("Failed to parse descriptor: {:?}", input))?;

            println!("{}", input.display());
            println!("  Atlas: {}", descriptor.page.file);
            println!(
                "  Size: {}x{}, line height {}",
                descriptor.common.scale_w, descriptor.common.scale_h, descriptor.common.line_height
            );
            println!("  Glyphs: {}", descriptor.chars.len());
            for c in &descriptor.chars {
                let shown = char::from_u32(c.id).map(String::from).unwrap_or_default();
                println!(
                    "    {:>6} {:?} at ({}, {}) {}x{} offset ({}, {})",
                    c.id, shown, c.x, c.y, c.width, c.height, c.xoffset, c.yoffset
                );
            }
        }
    }

    Ok(())
}
