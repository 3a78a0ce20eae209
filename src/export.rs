//! PNG export for decoded textures
//!
//! Takes ownership of a canonical ARGB buffer, reorders it into the RGBA byte
//! order PNG expects and writes an 8-bit RGBA image.

use crate::{Result, TexError};
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write an ARGB buffer as a PNG file, creating parent directories
///
/// `stride` is the byte distance between rows and must be at least
/// `width * 4`; any row padding is dropped.
pub fn save_png<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    stride: usize,
    pixels: Vec<u8>,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_png(BufWriter::new(file), width, height, stride, pixels)?;

    debug!("Wrote {width}x{height} PNG to {}", path.display());
    Ok(())
}

/// Encode an ARGB buffer as PNG into `writer`
pub fn write_png<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    stride: usize,
    pixels: Vec<u8>,
) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(TexError::EmptyImage);
    }

    let row_len = width as usize * 4;
    if stride < row_len {
        return Err(TexError::PixelDataLength {
            expected: row_len,
            actual: stride,
        });
    }
    let needed = stride * (height as usize - 1) + row_len;
    if pixels.len() < needed {
        return Err(TexError::PixelDataLength {
            expected: needed,
            actual: pixels.len(),
        });
    }

    let rgba = argb_to_rgba(pixels, width as usize, height as usize, stride);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&rgba)?;
    png_writer.finish()?;
    Ok(())
}

/// Reorder little-endian `0xAARRGGBB` words into packed R,G,B,A rows
fn argb_to_rgba(mut pixels: Vec<u8>, width: usize, height: usize, stride: usize) -> Vec<u8> {
    let row_len = width * 4;
    if stride != row_len {
        pixels = pixels
            .chunks(stride)
            .take(height)
            .flat_map(|row| row[..row_len].iter().copied())
            .collect();
    } else {
        pixels.truncate(row_len * height);
    }

    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    pixels
}
