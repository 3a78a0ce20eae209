//! tex2png - Decoder for TEX texture containers
//!
//! TEX is a small container format used by iOS games: a 16-byte header
//! followed by raw pixel data in one of four encodings. This crate parses the
//! container, normalizes the pixels to 32-bit ARGB and writes PNG files.
//!
//! # Features
//!
//! - Header validation (magic `"TEX "`, version 7, format tag table)
//! - PVRTC 4bpp, RGBA 4444, ABGR 8888 and ARGB 8888 pixel data
//! - Pluggable block decompression via [`BlockDecompressor`], with a pure
//!   Rust [`PvrtcDecoder`]
//! - PNG export and batch conversion of `.ipa` archives
//!
//! # Example
//!
//! ```no_run
//! use tex2png::{PixelFormat, PvrtcDecoder, Texture};
//!
//! let data = std::fs::read("icon.tex")?;
//! let texture = Texture::from_bytes(&data)?;
//! println!("{}x{} {}", texture.width(), texture.height(), texture.format());
//!
//! let argb = texture.convert(PixelFormat::Argb32, &PvrtcDecoder::new())?;
//! argb.save_png("icon.png", &PvrtcDecoder::new())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod batch;
pub mod common;
pub mod convert;
pub mod error;
pub mod export;
pub mod header;
pub mod pvrtc;
pub mod texture;

// Re-export commonly used types
pub use batch::{convert_file, BatchConverter, BatchOptions, BatchReport, EntryOutcome};
pub use common::{
    PixelFormat, PvrtcMode, Result, TexError, HEADER_SIZE, HEIGHT_UNIT, TEX_MAGIC, TEX_VERSION,
};
pub use convert::convert_to_argb32;
pub use header::Header;
pub use pvrtc::{BlockDecompressor, PvrtcDecoder};
pub use texture::Texture;

// Convenience functions

/// Parse a TEX container header from a reader, consuming 16 bytes
pub fn parse_header<R: std::io::Read>(reader: &mut R) -> Result<Header> {
    Header::read_from(reader)
}

/// Parse a complete TEX container from a reader
pub fn parse_texture<R: std::io::Read>(reader: &mut R) -> Result<Texture> {
    Texture::read_from(reader)
}

/// Decode a TEX container held in memory to a 32-bit ARGB texture
///
/// Compressed textures are decoded with [`PvrtcDecoder`].
pub fn decode_bytes(data: &[u8]) -> Result<Texture> {
    let texture = Texture::from_bytes(data)?;
    convert_to_argb32(&texture, &PvrtcDecoder::new())
}
