//! Common types and constants for TEX texture containers
//!
//! This module defines the pixel formats, container constants and the error
//! type shared by the header parser, the conversion pipeline and the outer
//! export/batch layers.

use std::fmt;
use thiserror::Error;

/// Container signature, ASCII `"TEX "` read as a little-endian u32
pub const TEX_MAGIC: u32 = 0x2058_4554;

/// The only container version this decoder understands
pub const TEX_VERSION: u16 = 7;

/// Size of the fixed container header in bytes
pub const HEADER_SIZE: usize = 16;

/// On-disk height granularity; the header stores `height / HEIGHT_UNIT`
pub const HEIGHT_UNIT: u16 = 8;

/// Pixel encodings found in TEX containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// PVRTC 4 bits per pixel block compression
    CompressedBlock4bpp,
    /// 16 bits per pixel, 4 bits per channel (R in the low nibble)
    Rgba16,
    /// 32 bits per pixel, little-endian word `0xAABBGGRR`
    Abgr32,
    /// 32 bits per pixel, little-endian word `0xAARRGGBB` (canonical)
    Argb32,
}

impl PixelFormat {
    /// Bits used by a single pixel in the raw buffer
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::CompressedBlock4bpp => 4,
            PixelFormat::Rgba16 => 16,
            PixelFormat::Abgr32 | PixelFormat::Argb32 => 32,
        }
    }

    /// Look up the pixel format for a header format tag
    ///
    /// Two tags share the compressed variant; both are accepted.
    pub fn from_tag(tag: u16) -> Result<Self> {
        match tag {
            0x0120 => Ok(PixelFormat::Argb32),
            0x1104 => Ok(PixelFormat::CompressedBlock4bpp),
            0x7110 => Ok(PixelFormat::Rgba16),
            0x6204 => Ok(PixelFormat::CompressedBlock4bpp),
            _ => Err(TexError::UnsupportedPixelFormat(tag)),
        }
    }

    /// Format tag written when serializing a header, if the format has one
    pub const fn tag(self) -> Option<u16> {
        match self {
            PixelFormat::Argb32 => Some(0x0120),
            PixelFormat::CompressedBlock4bpp => Some(0x1104),
            PixelFormat::Rgba16 => Some(0x7110),
            PixelFormat::Abgr32 => None,
        }
    }

    /// Byte length of a `width` x `height` buffer in this format
    pub fn buffer_len(self, width: u16, height: u16) -> usize {
        width as usize * height as usize * self.bits_per_pixel() as usize / 8
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::CompressedBlock4bpp => "PVRTC 4bpp",
            PixelFormat::Rgba16 => "RGBA 4444",
            PixelFormat::Abgr32 => "ABGR 8888",
            PixelFormat::Argb32 => "ARGB 8888",
        };
        f.write_str(name)
    }
}

/// Block decompression mode passed to a [`crate::BlockDecompressor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PvrtcMode {
    /// 4 bits per pixel, 4x4 pixel words
    FourBit,
    /// 2 bits per pixel, 8x4 pixel words
    TwoBit,
}

impl PvrtcMode {
    /// Pixel dimensions covered by one 64-bit word
    pub const fn word_size(self) -> (usize, usize) {
        match self {
            PvrtcMode::FourBit => (4, 4),
            PvrtcMode::TwoBit => (8, 4),
        }
    }
}

/// Error type for TEX decoding and export
#[derive(Debug, Error)]
pub enum TexError {
    /// Header magic is not `"TEX "`
    #[error("Malformed container: bad magic {magic:#010x}")]
    MalformedContainer {
        /// Magic value found in the header
        magic: u32,
    },

    /// Header version is not 7
    #[error("Unsupported container version: {0} (expected 7)")]
    UnsupportedVersion(u16),

    /// Header format tag is not in the format table
    #[error("Unsupported pixel format tag: {0:#06x}")]
    UnsupportedPixelFormat(u16),

    /// Stream ended before the header or pixel data was complete
    #[error("Truncated data: expected {expected} bytes, got {actual}")]
    TruncatedData {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Block decompressor consumed an unexpected number of bytes
    #[error("Decompression size mismatch: expected {expected} bytes, decoder consumed {actual}")]
    DecompressionSizeMismatch {
        /// Bytes the texture dimensions call for
        expected: usize,
        /// Bytes reported by the decompressor
        actual: usize,
    },

    /// Conversion between these formats is not supported
    #[error("Invalid conversion from {from} to {to}")]
    InvalidConversion {
        /// Source format
        from: PixelFormat,
        /// Requested target format
        to: PixelFormat,
    },

    /// Pixel buffer length does not match the dimensions and format
    #[error("Pixel data length mismatch: expected {expected} bytes, got {actual}")]
    PixelDataLength {
        /// Length implied by width, height and format
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// Format has no container tag and cannot be written to a header
    #[error("Pixel format {0} has no container tag")]
    UntaggedFormat(PixelFormat),

    /// Height is not a multiple of 8 or exceeds the 8-bit height field
    #[error("Height {0} cannot be stored in a container header")]
    UnrepresentableHeight(u16),

    /// Block decompressor does not implement the requested mode
    #[error("Unsupported decompression mode: {0:?}")]
    UnsupportedDecompressionMode(PvrtcMode),

    /// Image has no pixels and cannot be encoded
    #[error("Cannot encode an empty image")]
    EmptyImage,

    /// Archive could not be read
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// PNG encoder failure
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for TEX operations
pub type Result<T> = std::result::Result<T, TexError>;
