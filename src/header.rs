//! TEX container header parsing
//!
//! The header is a fixed 16-byte little-endian block:
//!
//! | Offset | Size | Field                          |
//! |--------|------|--------------------------------|
//! | 0      | 4    | magic, `"TEX "`                |
//! | 4      | 2    | version, always 7              |
//! | 7      | 2    | pixel format tag               |
//! | 12     | 2    | width in pixels                |
//! | 14     | 1    | height in units of 8 rows      |
//!
//! Bytes 6, 9-11 and 15 carry no information this decoder uses.

use crate::{PixelFormat, Result, TexError, HEADER_SIZE, HEIGHT_UNIT, TEX_MAGIC, TEX_VERSION};
use log::debug;
use std::io::Read;

const VERSION_OFFSET: usize = 4;
const FORMAT_OFFSET: usize = 7;
const WIDTH_OFFSET: usize = 12;
const HEIGHT_OFFSET: usize = 14;

/// Parsed TEX container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels, always a multiple of 8 when parsed from a container
    pub height: u16,
    /// Pixel encoding of the payload
    pub format: PixelFormat,
}

impl Header {
    /// Create a header from known dimensions
    pub fn new(width: u16, height: u16, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }

    /// Read and validate a header, consuming exactly 16 bytes from `reader`
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut data = Vec::with_capacity(HEADER_SIZE);
        reader.take(HEADER_SIZE as u64).read_to_end(&mut data)?;
        if data.len() < HEADER_SIZE {
            return Err(TexError::TruncatedData {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let mut block = [0u8; HEADER_SIZE];
        block.copy_from_slice(&data);
        Self::from_bytes(&block)
    }

    /// Parse a header from an in-memory block
    pub fn from_bytes(data: &[u8; HEADER_SIZE]) -> Result<Self> {
        let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        if magic != TEX_MAGIC {
            return Err(TexError::MalformedContainer { magic });
        }

        let version = read_u16(data, VERSION_OFFSET);
        if version != TEX_VERSION {
            return Err(TexError::UnsupportedVersion(version));
        }

        let format = PixelFormat::from_tag(read_u16(data, FORMAT_OFFSET))?;
        let width = read_u16(data, WIDTH_OFFSET);
        let height = data[HEIGHT_OFFSET] as u16 * HEIGHT_UNIT;

        debug!("TEX header: {width}x{height} {format}");

        Ok(Self {
            width,
            height,
            format,
        })
    }

    /// Serialize the header into its 16-byte on-disk form
    ///
    /// Unused bytes are written as zero. The compressed format is written with
    /// tag `0x1104`.
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let tag = self
            .format
            .tag()
            .ok_or(TexError::UntaggedFormat(self.format))?;

        if self.height % HEIGHT_UNIT != 0 || self.height / HEIGHT_UNIT > u8::MAX as u16 {
            return Err(TexError::UnrepresentableHeight(self.height));
        }

        let mut data = [0u8; HEADER_SIZE];
        data[..4].copy_from_slice(&TEX_MAGIC.to_le_bytes());
        data[VERSION_OFFSET..VERSION_OFFSET + 2].copy_from_slice(&TEX_VERSION.to_le_bytes());
        data[FORMAT_OFFSET..FORMAT_OFFSET + 2].copy_from_slice(&tag.to_le_bytes());
        data[WIDTH_OFFSET..WIDTH_OFFSET + 2].copy_from_slice(&self.width.to_le_bytes());
        data[HEIGHT_OFFSET] = (self.height / HEIGHT_UNIT) as u8;
        Ok(data)
    }

    /// Byte length of the pixel payload that follows this header
    pub fn pixel_data_len(&self) -> usize {
        self.format.buffer_len(self.width, self.height)
    }
}

fn read_u16(data: &[u8; HEADER_SIZE], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header_bytes(tag: u16, width: u16, height_units: u8) -> [u8; HEADER_SIZE] {
        let mut data = [0u8; HEADER_SIZE];
        data[..4].copy_from_slice(b"TEX ");
        data[4] = 7;
        data[7..9].copy_from_slice(&tag.to_le_bytes());
        data[12..14].copy_from_slice(&width.to_le_bytes());
        data[14] = height_units;
        data
    }

    #[test]
    fn test_parse_header() {
        let data = header_bytes(0x7110, 256, 16);
        let header = Header::from_bytes(&data).unwrap();
        assert_eq!(header.width, 256);
        assert_eq!(header.height, 128);
        assert_eq!(header.format, PixelFormat::Rgba16);
        assert_eq!(header.pixel_data_len(), 256 * 128 * 2);
    }

    #[test]
    fn test_both_compressed_tags() {
        for tag in [0x1104, 0x6204] {
            let header = Header::from_bytes(&header_bytes(tag, 64, 8)).unwrap();
            assert_eq!(header.format, PixelFormat::CompressedBlock4bpp);
            assert_eq!(header.height, 64);
        }
    }

    #[test]
    fn test_ignores_unused_bytes() {
        let mut data = header_bytes(0x0120, 4, 1);
        data[6] = 0xAA;
        data[9] = 0x12;
        data[10] = 0x34;
        data[11] = 0x56;
        data[15] = 0xFF;
        let header = Header::from_bytes(&data).unwrap();
        assert_eq!(header, Header::new(4, 8, PixelFormat::Argb32));
    }

    #[test]
    fn test_bad_magic() {
        let mut data = header_bytes(0x0120, 4, 1);
        data[..4].copy_from_slice(b"XET ");
        match Header::from_bytes(&data) {
            Err(TexError::MalformedContainer { magic }) => {
                assert_eq!(magic, u32::from_le_bytes(*b"XET "))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_version() {
        let mut data = header_bytes(0x0120, 4, 1);
        data[4] = 6;
        assert!(matches!(
            Header::from_bytes(&data),
            Err(TexError::UnsupportedVersion(6))
        ));
    }

    #[test]
    fn test_unknown_format_tag() {
        let data = header_bytes(0x0104, 4, 1);
        assert!(matches!(
            Header::from_bytes(&data),
            Err(TexError::UnsupportedPixelFormat(0x0104))
        ));
    }

    #[test]
    fn test_short_header() {
        let data = header_bytes(0x0120, 4, 1);
        let mut cursor = Cursor::new(&data[..10]);
        match Header::read_from(&mut cursor) {
            Err(TexError::TruncatedData { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 10);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_read_consumes_exactly_header() {
        let mut data = header_bytes(0x0120, 1, 1).to_vec();
        data.extend_from_slice(&[0xAB; 40]);
        let mut cursor = Cursor::new(data);
        Header::read_from(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 16);
    }

    /// Reader that delivers one byte per call and is interrupted before each
    struct StutteringReader {
        data: Vec<u8>,
        pos: usize,
        interrupt: bool,
    }

    impl Read for StutteringReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(std::io::ErrorKind::Interrupted.into());
            }
            if self.pos == self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn test_read_retries_short_and_interrupted_reads() {
        let mut data = header_bytes(0x7110, 3, 2).to_vec();
        data.extend_from_slice(&[0xAB; 4]);
        let mut reader = StutteringReader {
            data,
            pos: 0,
            interrupt: false,
        };
        let header = Header::read_from(&mut reader).unwrap();
        assert_eq!(header, Header::new(3, 16, PixelFormat::Rgba16));
        assert_eq!(reader.pos, 16);
    }

    #[test]
    fn test_to_bytes_round_trip() {
        let header = Header::new(512, 2040, PixelFormat::CompressedBlock4bpp);
        let data = header.to_bytes().unwrap();
        assert_eq!(&data[7..9], &[0x04, 0x11]);
        assert_eq!(Header::from_bytes(&data).unwrap(), header);
    }

    #[test]
    fn test_to_bytes_rejects_unrepresentable() {
        assert!(matches!(
            Header::new(4, 8, PixelFormat::Abgr32).to_bytes(),
            Err(TexError::UntaggedFormat(PixelFormat::Abgr32))
        ));
        assert!(matches!(
            Header::new(4, 12, PixelFormat::Argb32).to_bytes(),
            Err(TexError::UnrepresentableHeight(12))
        ));
        assert!(matches!(
            Header::new(4, 2048, PixelFormat::Argb32).to_bytes(),
            Err(TexError::UnrepresentableHeight(2048))
        ));
    }

    #[test]
    fn test_zero_dimensions_are_valid() {
        let header = Header::from_bytes(&header_bytes(0x0120, 0, 0)).unwrap();
        assert_eq!(header.width, 0);
        assert_eq!(header.height, 0);
        assert_eq!(header.pixel_data_len(), 0);
    }
}
