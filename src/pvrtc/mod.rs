//! PVRTC block decompression
//!
//! Compressed textures are decoded through the [`BlockDecompressor`] trait so
//! the conversion pipeline does not depend on any particular decoder. The
//! crate provides [`PvrtcDecoder`], a pure Rust 4bpp implementation.

mod decoder;
mod word;

pub use decoder::PvrtcDecoder;

use crate::{PvrtcMode, Result};

/// Minimum padded edge length of a 4bpp texture, in pixels
pub const MIN_DIMENSION: usize = 8;

/// Bytes per encoded word (modulation + color data)
pub const WORD_SIZE: usize = 8;

/// Decoder for block-compressed pixel data
///
/// Implementations write `width * height` pixels into `output` in R,G,B,A
/// byte order (an ABGR word when read as little-endian u32) and return the
/// number of compressed bytes they consumed.
pub trait BlockDecompressor: Send + Sync {
    /// Decompress `compressed` into `output`
    fn decompress(
        &self,
        compressed: &[u8],
        mode: PvrtcMode,
        width: usize,
        height: usize,
        output: &mut [u8],
    ) -> Result<usize>;
}

impl<F> BlockDecompressor for F
where
    F: Fn(&[u8], PvrtcMode, usize, usize, &mut [u8]) -> Result<usize> + Send + Sync,
{
    fn decompress(
        &self,
        compressed: &[u8],
        mode: PvrtcMode,
        width: usize,
        height: usize,
        output: &mut [u8],
    ) -> Result<usize> {
        self(compressed, mode, width, height, output)
    }
}
