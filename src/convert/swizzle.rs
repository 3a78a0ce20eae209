//! Per-pixel channel transforms
//!
//! All transforms read and write little-endian words and are independent per
//! pixel.

/// Swap the red and blue channels of 32-bit pixels
///
/// `dst` must be the same length as `src`. The transform is its own inverse.
pub fn abgr32_to_argb32(src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let abgr = u32::from_le_bytes([s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&swap_red_blue(abgr).to_le_bytes());
    }
}

/// In-place variant of [`abgr32_to_argb32`]
pub fn abgr32_to_argb32_in_place(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let abgr = u32::from_le_bytes([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&swap_red_blue(abgr).to_le_bytes());
    }
}

#[inline]
fn swap_red_blue(v: u32) -> u32 {
    (v & 0xFF00_FF00) | ((v & 0x00FF_0000) >> 16) | ((v & 0x0000_00FF) << 16)
}

/// Expand 16-bit RGBA 4444 pixels to 32-bit ARGB
///
/// `dst` must hold two output bytes per input byte.
pub fn rgba16_to_argb32(src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len() * 2, dst.len());
    for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(4)) {
        let rgba = u16::from_le_bytes([s[0], s[1]]) as u32;
        d.copy_from_slice(&expand_rgba4444(rgba).to_le_bytes());
    }
}

/// Each nibble lands in both halves of its output byte.
#[inline]
fn expand_rgba4444(rgba: u32) -> u32 {
    ((rgba & 0x000F) << 24)
        | ((rgba & 0x000F) << 28)
        | (rgba & 0x00F0)
        | ((rgba & 0x00F0) >> 4)
        | (rgba & 0x0F00)
        | ((rgba & 0x0F00) << 4)
        | ((rgba & 0xF000) << 4)
        | ((rgba & 0xF000) << 8)
}
