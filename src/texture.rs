//! Texture values
//!
//! A [`Texture`] pairs a [`Header`] with the raw pixel buffer it describes.
//! The buffer length always matches the header's dimensions and format.

use crate::convert;
use crate::export;
use crate::header::Header;
use crate::pvrtc::BlockDecompressor;
use crate::{PixelFormat, Result, TexError};
use log::debug;
use std::io::Read;
use std::path::Path;

/// Decoded TEX container: header plus owned pixel data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    header: Header,
    pixels: Vec<u8>,
}

impl Texture {
    /// Create a texture from known dimensions, format and pixel bytes
    ///
    /// Fails with [`TexError::PixelDataLength`] if `pixels` is not exactly
    /// `width * height * bits_per_pixel / 8` bytes long.
    pub fn new(width: u16, height: u16, format: PixelFormat, pixels: Vec<u8>) -> Result<Self> {
        Self::from_parts(Header::new(width, height, format), pixels)
    }

    /// Create a texture from a header and its pixel bytes
    pub fn from_parts(header: Header, pixels: Vec<u8>) -> Result<Self> {
        let expected = header.pixel_data_len();
        if pixels.len() != expected {
            return Err(TexError::PixelDataLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { header, pixels })
    }

    /// Parse a container: a 16-byte header followed by the exact pixel payload
    ///
    /// Bytes after the payload are left unread.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let header = Header::read_from(reader)?;
        let expected = header.pixel_data_len();

        // Buffer grows with the bytes actually present
        let mut pixels = Vec::new();
        reader.take(expected as u64).read_to_end(&mut pixels)?;
        if pixels.len() < expected {
            return Err(TexError::TruncatedData {
                expected,
                actual: pixels.len(),
            });
        }

        debug!("Read {expected} bytes of {} pixel data", header.format);
        Ok(Self { header, pixels })
    }

    /// Parse a container held in memory
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from(&mut std::io::Cursor::new(data))
    }

    /// Container header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.header.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.header.height
    }

    /// Pixel format of the buffer
    pub fn format(&self) -> PixelFormat {
        self.header.format
    }

    /// Raw pixel bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel bytes
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Bytes per pixel row
    pub fn stride(&self) -> usize {
        self.format().buffer_len(self.width(), 1)
    }

    /// Convert to `target`, returning a new texture
    pub fn convert(
        &self,
        target: PixelFormat,
        decompressor: &dyn BlockDecompressor,
    ) -> Result<Texture> {
        convert::convert(self, target, decompressor)
    }

    /// Convert to `target`, replacing this texture's header and pixels
    pub fn convert_in_place(
        &mut self,
        target: PixelFormat,
        decompressor: &dyn BlockDecompressor,
    ) -> Result<()> {
        *self = self.convert(target, decompressor)?;
        Ok(())
    }

    /// Convert to ARGB if needed and write the result as a PNG file
    ///
    /// The pixel buffer is moved into the encoder. Parent directories of
    /// `path` are created.
    pub fn save_png<P: AsRef<Path>>(
        self,
        path: P,
        decompressor: &dyn BlockDecompressor,
    ) -> Result<()> {
        let argb = if self.format() == PixelFormat::Argb32 {
            self
        } else {
            self.convert(PixelFormat::Argb32, decompressor)?
        };
        let (width, height, stride) = (argb.width(), argb.height(), argb.stride());
        export::save_png(path, width as u32, height as u32, stride, argb.into_pixels())
    }
}
