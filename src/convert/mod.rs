//! Pixel conversion pipeline
//!
//! Normalizes every supported source format to the canonical
//! [`PixelFormat::Argb32`] layout. Conversion is a pure function of the input
//! texture; compressed data is handed to an injected [`BlockDecompressor`].

pub mod swizzle;

use crate::pvrtc::BlockDecompressor;
use crate::{PixelFormat, PvrtcMode, Result, TexError, Texture};
use log::debug;

/// Convert a texture to `target`, which must be [`PixelFormat::Argb32`]
pub fn convert(
    texture: &Texture,
    target: PixelFormat,
    decompressor: &dyn BlockDecompressor,
) -> Result<Texture> {
    if target != PixelFormat::Argb32 {
        return Err(TexError::InvalidConversion {
            from: texture.format(),
            to: target,
        });
    }
    convert_to_argb32(texture, decompressor)
}

/// Convert a texture to 32-bit ARGB
///
/// A texture that is already ARGB is returned as an identical copy.
pub fn convert_to_argb32(
    texture: &Texture,
    decompressor: &dyn BlockDecompressor,
) -> Result<Texture> {
    let width = texture.width();
    let height = texture.height();
    let src = texture.pixels();
    let mut dst = vec![0u8; PixelFormat::Argb32.buffer_len(width, height)];

    debug!(
        "Converting {width}x{height} {} texture to {}",
        texture.format(),
        PixelFormat::Argb32
    );

    match texture.format() {
        PixelFormat::CompressedBlock4bpp => {
            let consumed = decompressor.decompress(
                src,
                PvrtcMode::FourBit,
                width as usize,
                height as usize,
                &mut dst,
            )?;
            if consumed != src.len() {
                return Err(TexError::DecompressionSizeMismatch {
                    expected: src.len(),
                    actual: consumed,
                });
            }
            swizzle::abgr32_to_argb32_in_place(&mut dst);
        }
        PixelFormat::Abgr32 => swizzle::abgr32_to_argb32(src, &mut dst),
        PixelFormat::Rgba16 => swizzle::rgba16_to_argb32(src, &mut dst),
        PixelFormat::Argb32 => dst.copy_from_slice(src),
    }

    Texture::new(width, height, PixelFormat::Argb32, dst)
}
