//! Writing the atlas/descriptor pair.
//!
//! Both payloads are staged as `.tmp` siblings first. Existing targets are
//! moved to `.bak` before the temps are renamed into place, and restored if
//! any step fails, so a failed commit leaves the previous pair untouched.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use bmfont_shared::BMFONT_FORMAT;
use image::ImageFormat;

use crate::atlas::AtlasCanvas;
use crate::error::{AtlasError, Result};

/// Where the artifacts of one commit landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedFiles {
    pub image: PathBuf,
    pub descriptor: PathBuf,
}

/// `<output_dir>/<name>.png` and `<output_dir>/<name>.fnt`
pub fn artifact_paths(output_dir: &Path, name: &str) -> CommittedFiles {
    CommittedFiles {
        image: output_dir.join(BMFONT_FORMAT.image_file_name(name)),
        descriptor: output_dir.join(BMFONT_FORMAT.descriptor_file_name(name)),
    }
}

/// Encode the canvas and write both artifacts, replacing any previous pair.
pub fn commit(
    output_dir: &Path,
    name: &str,
    canvas: &AtlasCanvas,
    descriptor: &str,
) -> Result<CommittedFiles> {
    let files = artifact_paths(output_dir, name);

    let png = encode_png(canvas).map_err(|e| AtlasError::output(&files.image, e))?;

    fs::create_dir_all(output_dir).map_err(|e| AtlasError::output(output_dir, e))?;

    let staged = [
        Staged::new(&files.image, png)?,
        Staged::new(&files.descriptor, descriptor.as_bytes().to_vec())?,
    ];
    replace_all(&staged)?;

    Ok(files)
}

fn encode_png(canvas: &AtlasCanvas) -> io::Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    canvas
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(io::Error::other)?;
    Ok(cursor.into_inner())
}

struct Staged {
    target: PathBuf,
    tmp: PathBuf,
    backup: PathBuf,
    bytes: Vec<u8>,
}

impl Staged {
    fn new(target: &Path, bytes: Vec<u8>) -> Result<Self> {
        Ok(Self {
            target: target.to_path_buf(),
            tmp: sibling(target, ".tmp")?,
            backup: sibling(target, ".bak")?,
            bytes,
        })
    }

    fn write_tmp(&self) -> io::Result<()> {
        let mut f = fs::File::create(&self.tmp)?;
        f.write_all(&self.bytes)?;
        f.sync_all()
    }
}

fn sibling(path: &Path, suffix: &str) -> Result<PathBuf> {
    match path.file_name() {
        Some(name) => {
            let mut sibling_name = OsString::from(name);
            sibling_name.push(suffix);
            Ok(path.with_file_name(sibling_name))
        }
        None => Err(AtlasError::output(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"),
        )),
    }
}

fn replace_all(staged: &[Staged]) -> Result<()> {
    for (i, s) in staged.iter().enumerate() {
        if let Err(e) = s.write_tmp() {
            discard_tmps(&staged[..=i]);
            return Err(AtlasError::output(&s.tmp, e));
        }
    }

    let mut backed_up = Vec::new();
    for s in staged {
        if s.target.exists() {
            if let Err(e) = fs::rename(&s.target, &s.backup) {
                restore(&backed_up, &[]);
                discard_tmps(staged);
                return Err(AtlasError::output(&s.target, e));
            }
            backed_up.push(s);
        }
    }

    let mut installed = Vec::new();
    for s in staged {
        if let Err(e) = fs::rename(&s.tmp, &s.target) {
            restore(&backed_up, &installed);
            discard_tmps(staged);
            return Err(AtlasError::output(&s.target, e));
        }
        installed.push(s);
    }

    for s in backed_up {
        if let Err(e) = fs::remove_file(&s.backup) {
            tracing::warn!("Failed to remove backup {:?}: {}", s.backup, e);
        }
    }

    Ok(())
}

fn restore(backed_up: &[&Staged], installed: &[&Staged]) {
    for s in installed {
        let _ = fs::remove_file(&s.target);
    }
    for s in backed_up {
        if let Err(e) = fs::rename(&s.backup, &s.target) {
            tracing::error!("Failed to restore {:?} from {:?}: {}", s.target, s.backup, e);
        }
    }
}

fn discard_tmps(staged: &[Staged]) {
    for s in staged {
        let _ = fs::remove_file(&s.tmp);
    }
}
