//! Conversion of 8-bit grayscale frames into the two planes the panel expects
//!
//! The panel has no native 2-bit channel. Each of the four gray levels comes
//! from the combination of one bit in the "old" frame (plane A) and one bit in
//! the "new" frame (plane B), so a frame is encoded in two steps:
//!
//! 1. **pack**: every group of four pixels of a row becomes one byte of 2-bit
//!    codes (the top two bits of each sample, first pixel in bits 7..6)
//! 2. **split**: every two packed bytes become one byte of plane A and one byte
//!    of plane B, codes taken from the most significant end
//!
//! Both frame dimensions come in pixels. The width has to be a multiple of 4 and
//! the pixel count a multiple of 8; other geometries are a programming error
//! and panic.

use bit_field::BitField;

use crate::color::Shade;
use crate::config::Sampling;

/// A buffer handed to the encoder has the wrong length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMismatch {
    /// Bytes the buffer must have
    pub expected: usize,
    /// Bytes the buffer has
    pub actual: usize,
}

impl SizeMismatch {
    fn check(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(SizeMismatch { expected, actual })
        }
    }
}

/// Length of the packed 2-bit buffer of a frame
pub const fn packed_len(width: usize, height: usize) -> usize {
    width * height / 4
}

/// Length of a single plane of a frame
pub const fn plane_len(width: usize, height: usize) -> usize {
    width * height / 8
}

fn assert_geometry(width: usize, height: usize) {
    assert!(width >= 4 && width % 4 == 0, "width must be a multiple of 4");
    assert!((width * height) % 8 == 0, "pixel count must be a multiple of 8");
}

/// Packs the four pixels of `row` starting at column `x` into one byte
fn pack_group(row: &[u8], x: usize, sampling: Sampling) -> u8 {
    let width = row.len();
    let mut byte = 0u8;
    for k in 0..4 {
        let column = match sampling {
            Sampling::Aligned => x + k,
            Sampling::Legacy => (x + width + k - 3) % width,
        };
        let shift = 6 - 2 * k;
        byte.set_bits(shift..shift + 2, Shade::from_gray(row[column]).code());
    }
    byte
}

/// The packed byte at `index`, computed straight from the image
fn packed_at(image: &[u8], width: usize, index: usize, sampling: Sampling) -> u8 {
    let pixel = index * 4;
    let (y, x) = (pixel / width, pixel % width);
    pack_group(&image[y * width..(y + 1) * width], x, sampling)
}

/// The four 2-bit codes of a packed byte, first pixel first
fn codes(byte: u8) -> impl Iterator<Item = Shade> {
    (0..4).map(move |k| {
        let shift = 6 - 2 * k;
        Shade::from_code(byte.get_bits(shift..shift + 2))
    })
}

/// Turns two packed bytes (eight pixels) into one byte of plane A and one of plane B
pub fn split_pair(first: u8, second: u8) -> (u8, u8) {
    let mut plane_a = 0u8;
    let mut plane_b = 0u8;
    for (i, shade) in codes(first).chain(codes(second)).enumerate() {
        let (bit_a, bit_b) = shade.plane_bits();
        plane_a.set_bit(7 - i, bit_a);
        plane_b.set_bit(7 - i, bit_b);
    }
    (plane_a, plane_b)
}

/// Step 1: quantizes `image` to 2-bit codes, four pixels per byte
///
/// # Panics
///
/// If `width` is zero or not a multiple of 4, or `width * height` is not a
/// multiple of 8.
pub fn pack_into(
    image: &[u8],
    width: usize,
    height: usize,
    sampling: Sampling,
    packed: &mut [u8],
) -> Result<(), SizeMismatch> {
    assert_geometry(width, height);
    SizeMismatch::check(width * height, image.len())?;
    SizeMismatch::check(packed_len(width, height), packed.len())?;

    for (y, row) in image.chunks_exact(width).enumerate() {
        for x in (0..width).step_by(4) {
            packed[(y * width + x) / 4] = pack_group(row, x, sampling);
        }
    }
    Ok(())
}

/// Step 2: splits a packed buffer into the two planes
pub fn split_into(
    packed: &[u8],
    plane_a: &mut [u8],
    plane_b: &mut [u8],
) -> Result<(), SizeMismatch> {
    SizeMismatch::check(packed.len() / 2, plane_a.len())?;
    SizeMismatch::check(packed.len() / 2, plane_b.len())?;
    SizeMismatch::check(plane_a.len() * 2, packed.len())?;

    for (i, pair) in packed.chunks_exact(2).enumerate() {
        let (a, b) = split_pair(pair[0], pair[1]);
        plane_a[i] = a;
        plane_b[i] = b;
    }
    Ok(())
}

/// Packs and splits in one pass, without the intermediate packed buffer.
///
/// Produces exactly what [`pack_into`] followed by [`split_into`] produce.
///
/// # Panics
///
/// On the same geometries as [`pack_into`].
pub fn encode_into(
    image: &[u8],
    width: usize,
    height: usize,
    sampling: Sampling,
    plane_a: &mut [u8],
    plane_b: &mut [u8],
) -> Result<(), SizeMismatch> {
    assert_geometry(width, height);
    SizeMismatch::check(width * height, image.len())?;
    let len = plane_len(width, height);
    SizeMismatch::check(len, plane_a.len())?;
    SizeMismatch::check(len, plane_b.len())?;

    for i in 0..len {
        let first = packed_at(image, width, 2 * i, sampling);
        let second = packed_at(image, width, 2 * i + 1, sampling);
        let (a, b) = split_pair(first, second);
        plane_a[i] = a;
        plane_b[i] = b;
    }
    Ok(())
}
