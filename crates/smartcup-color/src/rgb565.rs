//! RGB565 packing
//!
//! 16-bit color word used by the round LCD: red in bits 15..11, green in
//! bits 10..5, blue in bits 4..0.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;

use crate::sample::CorrectedColor;

/// Pack an 8-bit color into a `R5G6B5` word, dropping the low bits
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn pack_rgb565(color: CorrectedColor) -> u16 {
    ((color.r as u16 & 0xF8) << 8) | ((color.g as u16 & 0xFC) << 3) | (color.b as u16 >> 3)
}

/// Expand a `R5G6B5` word back to 8 bits per channel (low bits zero)
#[inline]
pub const fn unpack_rgb565(word: u16) -> CorrectedColor {
    CorrectedColor {
        r: (((word >> 11) & 0x1F) << 3) as u8,
        g: (((word >> 5) & 0x3F) << 2) as u8,
        b: ((word & 0x1F) << 3) as u8,
    }
}

impl From<CorrectedColor> for Rgb565 {
    fn from(color: CorrectedColor) -> Self {
        Rgb565::from(RawU16::new(pack_rgb565(color)))
    }
}
