//! Encode raw pixel buffers into uncompressed bitmaps.
//!
//! Two formats are supported: 1 bit per pixel monochrome, with a fixed black and white palette,
//! and 24 bits per pixel RGB. Pixel rows are always stored top-down, the header carries a
//! negative height.
//!
//! ```
//! use bmp_encoder::Encoder;
//!
//! let encoder = Encoder::new(1, 1, 24).unwrap();
//! let bmp = encoder.encode(&[10, 20, 30]).unwrap();
//! assert_eq!(bmp.len(), 54 + 4);
//! assert_eq!(&bmp[54..], &[30, 20, 10, 0]);
//! ```

#![deny(missing_docs)]

mod bit;
mod header;
mod pack;

#[cfg(feature = "fuzz")]
pub mod fuzz;

pub use header::BmpHeader;

use std::io::Write;
use thiserror::Error;
use tracing::{debug, instrument};

const B: u8 = 66;
const M: u8 = 77;

/// Size of the BITMAPFILEHEADER
const FILE_HEADER_SIZE: u32 = 14;
/// Size of the BITMAPINFOHEADER
const DIB_HEADER_SIZE: u32 = 40;
/// 2 colors each 4 bytes
const PALETTE_SIZE: u32 = 2 * 4;

/// Errors returned by the encoder
#[derive(Debug, Error)]
pub enum BmpError {
    /// The requested bit depth is not one of the supported ones
    #[error("unsupported bits per pixel {0}, supported values are: 1, 24")]
    UnsupportedFormat(u16),

    /// The pixel buffer is shorter than the image geometry requires
    #[error("pixel buffer too short: expected {expected} samples, got {actual}")]
    OutOfBounds {
        /// samples required by width, height and bit depth
        expected: usize,
        /// samples supplied
        actual: usize,
    },

    /// Width or height is zero, or too big to be described by the bitmap header
    #[error("invalid bitmap size {width}x{height}")]
    Size {
        /// requested width
        width: u32,
        /// requested height
        height: u32,
    },

    /// Writing the encoded bitmap to the destination failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Bit depth of the encoded bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum BitsPerPixel {
    /// Monochrome, one input byte per pixel, `0xFF` is white and everything else is black
    One,
    /// RGB, three input bytes per pixel in R, G, B order
    TwentyFour,
}

impl BitsPerPixel {
    /// the value stored in the bits per pixel header field
    pub fn bits(self) -> u16 {
        match self {
            BitsPerPixel::One => 1,
            BitsPerPixel::TwentyFour => 24,
        }
    }

    /// input samples describing a single pixel
    pub fn samples_per_pixel(self) -> usize {
        match self {
            BitsPerPixel::One => 1,
            BitsPerPixel::TwentyFour => 3,
        }
    }
}

impl TryFrom<u16> for BitsPerPixel {
    type Error = BmpError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            1 => Ok(BitsPerPixel::One),
            24 => Ok(BitsPerPixel::TwentyFour),
            _ => Err(BmpError::UnsupportedFormat(bits)),
        }
    }
}

/// Bitmap encoder for a fixed image geometry
///
/// Row alignment is computed once at construction, every call to [`Encoder::encode`] produces a
/// complete bitmap independent from the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    width: u32,
    height: u32,
    bits_per_pixel: BitsPerPixel,
    padding: u32,
    padded_row_bytes: u32,
}

impl Encoder {
    /// Creates an encoder for a `width` x `height` image with `bits_per_pixel` bits per pixel
    ///
    /// returns `BmpError::UnsupportedFormat` if `bits_per_pixel` is neither 1 nor 24, and
    /// `BmpError::Size` for dimensions not representable in a bitmap, see [`Encoder::with_format`]
    pub fn new(width: u32, height: u32, bits_per_pixel: u16) -> Result<Self, BmpError> {
        let bits_per_pixel = BitsPerPixel::try_from(bits_per_pixel)?;
        Self::with_format(width, height, bits_per_pixel)
    }

    /// Creates an encoder from an already validated bit depth
    ///
    /// returns `BmpError::Size` if width or height is zero, if they overflow the signed header
    /// fields, or if the resulting file is bigger than the 32 bits size field allows
    pub fn with_format(
        width: u32,
        height: u32,
        bits_per_pixel: BitsPerPixel,
    ) -> Result<Self, BmpError> {
        let (padding, padded_row_bytes) = check_size(width, height, bits_per_pixel)?;
        debug!(
            width,
            height,
            bits_per_pixel = bits_per_pixel.bits(),
            padding,
            padded_row_bytes,
            "created bitmap encoder"
        );
        Ok(Encoder {
            width,
            height,
            bits_per_pixel,
            padding,
            padded_row_bytes,
        })
    }

    /// width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// bit depth
    pub fn bits_per_pixel(&self) -> BitsPerPixel {
        self.bits_per_pixel
    }

    /// zero bytes appended to every row
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// length of every stored row, always a multiple of 4
    pub fn padded_row_bytes(&self) -> u32 {
        self.padded_row_bytes
    }

    /// 62 for monochrome bitmaps (palette included), 54 otherwise
    pub fn header_size(&self) -> u32 {
        header_size(self.bits_per_pixel)
    }

    /// length of the pixel data section
    pub fn data_size(&self) -> u32 {
        self.padded_row_bytes * self.height
    }

    /// length of the whole encoded bitmap
    pub fn file_size(&self) -> u32 {
        self.header_size() + self.data_size()
    }

    /// number of input samples [`Encoder::encode`] reads
    pub fn expected_pixels_len(&self) -> usize {
        self.width as usize * self.height as usize * self.bits_per_pixel.samples_per_pixel()
    }

    /// the header written in front of the pixel data
    pub fn header(&self) -> BmpHeader {
        BmpHeader::new(self)
    }

    /// Encode `pixels` in a complete bitmap, header followed by pixel data
    ///
    /// returns `BmpError::OutOfBounds` if `pixels` holds less than
    /// [`Encoder::expected_pixels_len`] samples, extra samples are ignored
    #[instrument(level = "debug", skip_all, fields(width = self.width, height = self.height))]
    pub fn encode(&self, pixels: &[u8]) -> Result<Vec<u8>, BmpError> {
        pack::check_len(self, pixels)?;

        let header = self.header();
        let mut bmp = Vec::with_capacity(self.file_size() as usize);
        header.write(&mut bmp)?;
        let header_len = bmp.len();
        bmp.resize(self.file_size() as usize, 0);
        pack::pack_into(self, pixels, &mut bmp[header_len..])?;

        debug!(len = bmp.len(), "encoded bitmap");
        Ok(bmp)
    }

    /// Encode `pixels` and write the bitmap to a Write type, such a File
    ///
    /// Nothing is written if encoding fails. Note that File writes are not buffered, the bitmap
    /// is handed over with a single `write_all`.
    pub fn write<T: Write>(&self, pixels: &[u8], mut to: T) -> Result<(), BmpError> {
        let bmp = self.encode(pixels)?;
        to.write_all(&bmp)?;
        Ok(())
    }
}

fn header_size(bits_per_pixel: BitsPerPixel) -> u32 {
    match bits_per_pixel {
        BitsPerPixel::One => FILE_HEADER_SIZE + DIB_HEADER_SIZE + PALETTE_SIZE,
        BitsPerPixel::TwentyFour => FILE_HEADER_SIZE + DIB_HEADER_SIZE,
    }
}

/// return bytes needed for `bits` bits
fn bytes_per_row(bits: u64) -> u64 {
    (bits + 7) / 8
}

/// return the padding needed for n
fn padding(n: u64) -> u64 {
    (4 - n % 4) % 4
}

/// Validates the geometry and returns `(padding, padded_row_bytes)`
///
/// After this succeeds every size derived from width and height fits in `u32`, and the number
/// of input samples fits in `usize`.
fn check_size(
    width: u32,
    height: u32,
    bits_per_pixel: BitsPerPixel,
) -> Result<(u32, u32), BmpError> {
    let size_err = || BmpError::Size { width, height };
    if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(size_err());
    }

    let row_bytes = bytes_per_row(u64::from(width) * u64::from(bits_per_pixel.bits()));
    let padding = padding(row_bytes);
    let padded_row_bytes = row_bytes + padding;
    let file_size = padded_row_bytes * u64::from(height) + u64::from(header_size(bits_per_pixel));
    if file_size > u64::from(u32::MAX) {
        return Err(size_err());
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(bits_per_pixel.samples_per_pixel()))
        .ok_or_else(size_err)?;

    Ok((padding as u32, padded_row_bytes as u32))
}
