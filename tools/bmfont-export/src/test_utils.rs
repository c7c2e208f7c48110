//! Fixture helpers for unit tests.

use std::path::{Path, PathBuf};

/// Write a `width`x`height` PNG filled with one RGBA color.
pub fn write_solid_png(dir: &Path, name: &str, width: u32, height: u32, rgba: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    let pixels: Vec<u8> = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    image::save_buffer(&path, &pixels, width, height, image::ColorType::Rgba8)
        .expect("Failed to write test PNG");
    path
}

/// Write a PNG that carries only a header claiming `width`x`height` (1-bit
/// grayscale) and an empty image data chunk. Measuring it succeeds without
/// any pixel data behind it; decoding it fails.
pub fn write_png_header(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[1, 0, 0, 0, 0]);

    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    push_chunk(&mut bytes, b"IHDR", &ihdr);
    push_chunk(&mut bytes, b"IDAT", &[]);
    push_chunk(&mut bytes, b"IEND", &[]);

    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write test PNG header");
    path
}

fn push_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let start = out.len();
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let crc = crc32(&out[start..]);
    out.extend_from_slice(&crc.to_be_bytes());
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in bytes {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
        }
    }
    !crc
}
