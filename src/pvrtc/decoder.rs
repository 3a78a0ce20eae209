//! PVRTC 4bpp decoder
//!
//! Every pixel blends two low-resolution images (colors A and B). Each image
//! is bilinearly upscaled from the word grid, with word centers at
//! `(4i + 2, 4j + 2)` and wrapping at the texture edges; the pixel's own
//! 2-bit modulation value then picks the blend weight.

use super::word::{twiddle, Endpoint, Word};
use super::{BlockDecompressor, MIN_DIMENSION, WORD_SIZE};
use crate::{PvrtcMode, Result, TexError};
use log::debug;

/// Blend weights (out of 8) for standard modulation
const STANDARD_WEIGHTS: [u32; 4] = [0, 3, 5, 8];

/// Blend weights (out of 8) for punch-through modulation
const PUNCH_THROUGH_WEIGHTS: [u32; 4] = [0, 4, 4, 8];

/// Modulation value that clears alpha in punch-through mode
const PUNCH_THROUGH_ALPHA: u32 = 2;

/// Pure Rust PVRTC decoder for 4 bits per pixel data
///
/// Textures smaller than 8x8 or with non power-of-two edges are decoded on a
/// padded power-of-two grid and cropped, so the reported consumption is the
/// size of the padded data.
#[derive(Debug, Default, Clone, Copy)]
pub struct PvrtcDecoder;

impl PvrtcDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Compressed byte length needed for a `width` x `height` 4bpp texture
    pub fn compressed_len(width: usize, height: usize) -> usize {
        if width == 0 || height == 0 {
            return 0;
        }
        let (padded_width, padded_height) = padded_dimensions(width, height);
        padded_width * padded_height / 2
    }
}

fn padded_dimensions(width: usize, height: usize) -> (usize, usize) {
    (
        width.max(MIN_DIMENSION).next_power_of_two(),
        height.max(MIN_DIMENSION).next_power_of_two(),
    )
}

impl BlockDecompressor for PvrtcDecoder {
    fn decompress(
        &self,
        compressed: &[u8],
        mode: PvrtcMode,
        width: usize,
        height: usize,
        output: &mut [u8],
    ) -> Result<usize> {
        if mode != PvrtcMode::FourBit {
            return Err(TexError::UnsupportedDecompressionMode(mode));
        }

        let expected_output = width * height * 4;
        if output.len() != expected_output {
            return Err(TexError::PixelDataLength {
                expected: expected_output,
                actual: output.len(),
            });
        }

        if width == 0 || height == 0 {
            return Ok(0);
        }

        let needed = Self::compressed_len(width, height);
        // The padded grid needs more words than the payload holds
        if compressed.len() < needed {
            return Err(TexError::DecompressionSizeMismatch {
                expected: compressed.len(),
                actual: needed,
            });
        }

        let (padded_width, padded_height) = padded_dimensions(width, height);
        let grid = WordGrid::new(&compressed[..needed], padded_width / 4, padded_height / 4);

        debug!(
            "PVRTC 4bpp: {width}x{height} (padded {padded_width}x{padded_height}), {needed} bytes"
        );

        for (y, row) in output.chunks_exact_mut(width * 4).enumerate() {
            for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                pixel.copy_from_slice(&grid.pixel(x, y));
            }
        }

        Ok(needed)
    }
}

/// Twiddled word array addressed by word coordinates
struct WordGrid<'a> {
    data: &'a [u8],
    x_words: usize,
    y_words: usize,
}

impl<'a> WordGrid<'a> {
    fn new(data: &'a [u8], x_words: usize, y_words: usize) -> Self {
        Self {
            data,
            x_words,
            y_words,
        }
    }

    /// Word at signed coordinates, wrapping around the grid
    fn word(&self, x: isize, y: isize) -> Word {
        let x = x.rem_euclid(self.x_words as isize) as usize;
        let y = y.rem_euclid(self.y_words as isize) as usize;
        let offset = twiddle(self.x_words, self.y_words, x, y) * WORD_SIZE;
        Word::from_bytes(&self.data[offset..offset + WORD_SIZE])
    }

    /// Decode pixel (`x`, `y`) to R,G,B,A bytes
    fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        // Offsets relative to the center of the top-left contributing word
        let fx = x as isize - 2;
        let fy = y as isize - 2;
        let (wx, lx) = (fx.div_euclid(4), fx.rem_euclid(4) as u32);
        let (wy, ly) = (fy.div_euclid(4), fy.rem_euclid(4) as u32);

        let p = self.word(wx, wy);
        let q = self.word(wx + 1, wy);
        let r = self.word(wx, wy + 1);
        let s = self.word(wx + 1, wy + 1);

        let weights = [
            (4 - lx) * (4 - ly),
            lx * (4 - ly),
            (4 - lx) * ly,
            lx * ly,
        ];
        let color_a = upscale([p.color_a(), q.color_a(), r.color_a(), s.color_a()], weights);
        let color_b = upscale([p.color_b(), q.color_b(), r.color_b(), s.color_b()], weights);

        let own = self.word(x as isize / 4, y as isize / 4);
        let bits = own.modulation_bits(x % 4, y % 4);
        let (weight, clear_alpha) = if own.punch_through() {
            (
                PUNCH_THROUGH_WEIGHTS[bits as usize],
                bits == PUNCH_THROUGH_ALPHA,
            )
        } else {
            (STANDARD_WEIGHTS[bits as usize], false)
        };

        let blend = |a: u32, b: u32| ((a * (8 - weight) + b * weight) / 8) as u8;
        let alpha = if clear_alpha {
            0
        } else {
            blend(color_a.a, color_b.a)
        };

        [
            blend(color_a.r, color_b.r),
            blend(color_a.g, color_b.g),
            blend(color_a.b, color_b.b),
            alpha,
        ]
    }
}

/// Bilinear blend of four endpoints (weights sum to 16), widened to 8 bits
fn upscale(endpoints: [Endpoint; 4], weights: [u32; 4]) -> Endpoint {
    let mut sum = Endpoint::default();
    for (e, w) in endpoints.iter().zip(weights) {
        sum.r += e.r * w;
        sum.g += e.g * w;
        sum.b += e.b * w;
        sum.a += e.a * w;
    }

    // 5-bit channels scaled by 16 become (c << 3) | (c >> 2); 4-bit alpha becomes a * 17
    Endpoint {
        r: (sum.r >> 6) + (sum.r >> 1),
        g: (sum.g >> 6) + (sum.g >> 1),
        b: (sum.b >> 6) + (sum.b >> 1),
        a: (sum.a >> 4) + sum.a,
    }
}
