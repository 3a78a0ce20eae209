//! PVRTC word layout
//!
//! A word is 64 bits: 32 bits of 2-bit modulation values followed by 32 bits
//! of color data holding color A (low half) and color B (high half).

/// Color endpoint with 5-bit RGB and 4-bit alpha
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Endpoint {
    pub r: u32,
    pub g: u32,
    pub b: u32,
    pub a: u32,
}

/// One decoded 64-bit word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Word {
    pub modulation: u32,
    pub color: u32,
}

impl Word {
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            modulation: u32::from_le_bytes([data[0], data[1], data[2], data[3]]),
            color: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
        }
    }

    /// Punch-through modulation mode flag
    pub fn punch_through(&self) -> bool {
        self.color & 1 != 0
    }

    /// Color A: RGB 554 when opaque, ARGB 3443 otherwise
    pub fn color_a(&self) -> Endpoint {
        let c = self.color;
        if c & 0x8000 != 0 {
            Endpoint {
                r: (c & 0x7C00) >> 10,
                g: (c & 0x03E0) >> 5,
                b: (c & 0x001E) | ((c & 0x001E) >> 4),
                a: 0xF,
            }
        } else {
            Endpoint {
                r: ((c & 0x0F00) >> 7) | ((c & 0x0F00) >> 11),
                g: ((c & 0x00F0) >> 3) | ((c & 0x00F0) >> 7),
                b: ((c & 0x000E) << 1) | ((c & 0x000E) >> 2),
                a: (c & 0x7000) >> 11,
            }
        }
    }

    /// Color B: RGB 555 when opaque, ARGB 3444 otherwise
    pub fn color_b(&self) -> Endpoint {
        let c = self.color;
        if c & 0x8000_0000 != 0 {
            Endpoint {
                r: (c & 0x7C00_0000) >> 26,
                g: (c & 0x03E0_0000) >> 21,
                b: (c & 0x001F_0000) >> 16,
                a: 0xF,
            }
        } else {
            Endpoint {
                r: ((c & 0x0F00_0000) >> 23) | ((c & 0x0F00_0000) >> 27),
                g: ((c & 0x00F0_0000) >> 19) | ((c & 0x00F0_0000) >> 23),
                b: ((c & 0x000F_0000) >> 15) | ((c & 0x000F_0000) >> 19),
                a: (c & 0x7000_0000) >> 27,
            }
        }
    }

    /// Raw 2-bit modulation value of pixel (`x`, `y`) within a 4x4 word
    pub fn modulation_bits(&self, x: usize, y: usize) -> u32 {
        (self.modulation >> (2 * (y * 4 + x))) & 0x3
    }
}

/// Morton index of word (`x`, `y`) in a `x_words` by `y_words` grid
///
/// Bits of the smaller dimension are interleaved with `y` in the lower
/// position; the remaining high bits of the larger dimension are appended.
pub(crate) fn twiddle(x_words: usize, y_words: usize, x: usize, y: usize) -> usize {
    let (min_dimension, mut remainder) = if y_words < x_words {
        (y_words, x)
    } else {
        (x_words, y)
    };

    let mut twiddled = 0;
    let mut src_bit = 1;
    let mut dst_bit = 1;
    let mut shift = 0;

    while src_bit < min_dimension {
        if y & src_bit != 0 {
            twiddled |= dst_bit;
        }
        if x & src_bit != 0 {
            twiddled |= dst_bit << 1;
        }
        src_bit <<= 1;
        dst_bit <<= 2;
        shift += 1;
    }

    remainder >>= shift;
    twiddled | (remainder << (2 * shift))
}
