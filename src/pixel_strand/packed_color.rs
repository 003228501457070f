//! Conversions between [`Rgb`] pixels, packed `0xRRGGBB` values, and TX FIFO words.
//!
//! Packed colors put red in the high byte. The WS2812 wire order puts green
//! first, so [`wire_word`] deliberately does not match [`pack_color`].

use super::Rgb;

/// Pack components into `0xRRGGBB`.
#[must_use]
pub const fn pack_color(red: u8, green: u8, blue: u8) -> u32 {
    ((red as u32) << 16) | ((green as u32) << 8) | (blue as u32)
}

/// Pack an [`Rgb`] into `0xRRGGBB`.
#[must_use]
pub const fn pack_rgb(color: Rgb) -> u32 {
    pack_color(color.r, color.g, color.b)
}

/// Split `0xRRGGBB` into an [`Rgb`]. Bits 31..24 are ignored.
#[must_use]
#[allow(clippy::cast_possible_truncation, reason = "each byte is taken from its own bit range")]
pub const fn unpack_color(packed: u32) -> Rgb {
    Rgb::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}

/// FIFO word for one pixel: green, red, blue from bit 31 down, low byte padding.
///
/// The state machine shifts out left and pulls 24 bits per pixel, so the
/// padding byte never reaches the wire.
#[must_use]
pub const fn wire_word(color: Rgb) -> u32 {
    let grb = ((color.r as u32) << 8) | ((color.g as u32) << 16) | (color.b as u32);
    grb << 8
}

#[cfg(test)]
mod tests {
    use super::{pack_color, unpack_color, wire_word};
    use crate::pixel_strand::Rgb;

    #[test]
    fn pack_color_puts_red_high() {
        assert_eq!(pack_color(0x12, 0x34, 0x56), 0x0012_3456);
    }

    #[test]
    fn unpack_color_ignores_top_byte() {
        assert_eq!(unpack_color(0xAB12_3456), Rgb::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn wire_word_puts_green_high_and_pads_low_byte() {
        assert_eq!(wire_word(Rgb::new(255, 0, 0)), 0x00FF_0000);
        assert_eq!(wire_word(Rgb::new(0, 255, 0)), 0xFF00_0000);
        assert_eq!(wire_word(Rgb::new(0, 0, 255)), 0x0000_FF00);
        assert_eq!(wire_word(Rgb::new(0x12, 0x34, 0x56)), 0x3412_5600);
    }
}
