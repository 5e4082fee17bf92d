//! The four gray levels of the panel

use bit_field::BitField;

#[cfg(feature = "graphics")]
use embedded_graphics_core::pixelcolor::{Gray8, GrayColor};

/// One of the four gray levels the panel can show, ordered from dark to bright.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Shade {
    /// Code `0b00`
    Black,
    /// Code `0b01`
    Dark,
    /// Code `0b10`
    Light,
    /// Code `0b11`
    #[default]
    White,
}

impl Shade {
    /// All shades, from black to white
    pub const ALL: [Shade; 4] = [Shade::Black, Shade::Dark, Shade::Light, Shade::White];

    /// Quantizes an 8-bit gray sample by keeping its two most significant bits.
    pub fn from_gray(value: u8) -> Self {
        Self::from_code(value.get_bits(6..8))
    }

    /// Maps a 2-bit code to its shade. Only the two low bits are looked at.
    pub fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0b00 => Shade::Black,
            0b01 => Shade::Dark,
            0b10 => Shade::Light,
            _ => Shade::White,
        }
    }

    /// The 2-bit code the panel uses for this shade
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Representative 8-bit value, the one a renderer should paint with.
    pub fn gray_value(self) -> u8 {
        self.code() << 6
    }

    /// Bits this shade contributes to the old-data and new-data planes.
    ///
    /// The panel resolves the gray level from the combination of both frames:
    /// white is (1, 1), light is (1, 0), dark is (0, 1) and black is (0, 0).
    pub fn plane_bits(self) -> (bool, bool) {
        match self {
            Shade::White => (true, true),
            Shade::Light => (true, false),
            Shade::Dark => (false, true),
            Shade::Black => (false, false),
        }
    }
}

impl From<u8> for Shade {
    fn from(value: u8) -> Self {
        Shade::from_gray(value)
    }
}

#[cfg(feature = "graphics")]
impl From<Shade> for Gray8 {
    fn from(shade: Shade) -> Self {
        Gray8::new(shade.gray_value())
    }
}

#[cfg(feature = "graphics")]
impl From<Gray8> for Shade {
    fn from(color: Gray8) -> Self {
        Shade::from_gray(color.luma())
    }
}
