use crate::{BitsPerPixel, BmpError, Encoder, B, DIB_HEADER_SIZE, M};
use std::io::Write;
use tracing::trace;

const BLACK: u32 = 0x00_00_00_00;
const WHITE: u32 = 0x00_FF_FF_FF;

/// File header, info header and optional palette of an encoded bitmap
///
/// Every field maps to one entry of the BITMAPFILEHEADER or BITMAPINFOHEADER, in file order.
/// Fields with a constant value (magic, reserved, planes, compression, resolution) are not
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpHeader {
    /// size of the whole file
    pub file_size: u32,
    /// offset of the pixel data, equal to the header length
    pub pixel_offset: u32,
    /// width in pixels
    pub width: i32,
    /// height in pixels, negative since rows are stored top-down
    pub height: i32,
    /// 1 or 24
    pub bits_per_pixel: u16,
    /// size of the pixel data, row padding included
    pub image_size: u32,
    /// palette for monochrome bitmaps, index 0 is black and index 1 white
    pub palette: Option<[u32; 2]>,
}

impl BmpHeader {
    /// Builds the header describing the bitmap `encoder` produces
    pub fn new(encoder: &Encoder) -> Self {
        let palette = match encoder.bits_per_pixel() {
            BitsPerPixel::One => Some([BLACK, WHITE]),
            BitsPerPixel::TwentyFour => None,
        };
        // check_size guarantees both dimensions fit in i32
        BmpHeader {
            file_size: encoder.file_size(),
            pixel_offset: encoder.header_size(),
            width: encoder.width() as i32,
            height: -(encoder.height() as i32),
            bits_per_pixel: encoder.bits_per_pixel().bits(),
            image_size: encoder.data_size(),
            palette,
        }
    }

    /// number of palette entries, also used as the important colors count
    pub fn num_colors(&self) -> u32 {
        self.palette.map_or(0, |p| p.len() as u32)
    }

    /// bytes written by [`BmpHeader::write`]
    pub fn len(&self) -> usize {
        self.pixel_offset as usize
    }

    /// never true, a header always contains at least the magic
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Write the header to a Write type
    pub fn write<T: Write>(&self, to: &mut T) -> Result<(), BmpError> {
        trace!(header = ?self, "writing bitmap header");

        // https://en.wikipedia.org/wiki/BMP_file_format
        to.write_all(&[B, M])?;
        to.write_u32(self.file_size)?; // size of the bmp
        to.write_u16(0)?; // creator1
        to.write_u16(0)?; // creator2
        to.write_u32(self.pixel_offset)?; // pixel offset
        to.write_u32(DIB_HEADER_SIZE)?; // dib header size
        to.write_i32(self.width)?;
        to.write_i32(self.height)?;
        to.write_u16(1)?; // planes
        to.write_u16(self.bits_per_pixel)?;
        to.write_u32(0)?; // no compression
        to.write_u32(self.image_size)?; // size of the raw bitmap data with padding
        to.write_i32(0)?; // hres
        to.write_i32(0)?; // vres
        to.write_u32(self.num_colors())?; // num_colors
        to.write_u32(self.num_colors())?; // num_imp_colors

        if let Some(palette) = self.palette {
            for color in palette.iter() {
                to.write_u32(*color)?;
            }
        }

        Ok(())
    }
}

trait WriteLE {
    /// Write a 32-bit uint
    fn write_u32(&mut self, value: u32) -> Result<(), BmpError>;
    /// Write a 32-bit int
    fn write_i32(&mut self, value: i32) -> Result<(), BmpError>;
    /// Write a 16-bit uint
    fn write_u16(&mut self, value: u16) -> Result<(), BmpError>;
}

impl<W: Write> WriteLE for W {
    fn write_u32(&mut self, value: u32) -> Result<(), BmpError> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn write_i32(&mut self, value: i32) -> Result<(), BmpError> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn write_u16(&mut self, value: u16) -> Result<(), BmpError> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::header::WriteLE;
    use crate::{BmpHeader, Encoder};

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }

    fn i32_at(bytes: &[u8], offset: usize) -> i32 {
        u32_at(bytes, offset) as i32
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    #[test]
    fn test_write_le() {
        let mut buffer = vec![];
        buffer.write_u16(1).unwrap();
        buffer.write_u32(1).unwrap();
        buffer.write_i32(-2).unwrap();
        assert_eq!(buffer, vec![1, 0, 1, 0, 0, 0, 0xFE, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_monochrome_header() {
        let encoder = Encoder::new(9, 3, 1).unwrap();
        let header = BmpHeader::new(&encoder);
        let mut bytes = vec![];
        header.write(&mut bytes).unwrap();

        assert_eq!(bytes.len(), 62);
        assert_eq!(header.len(), 62);
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(u32_at(&bytes, 2), 62 + 3 * 4);
        assert_eq!(u32_at(&bytes, 6), 0);
        assert_eq!(u32_at(&bytes, 10), 62);
        assert_eq!(u32_at(&bytes, 14), 40);
        assert_eq!(i32_at(&bytes, 18), 9);
        assert_eq!(i32_at(&bytes, 22), -3);
        assert_eq!(u16_at(&bytes, 26), 1);
        assert_eq!(u16_at(&bytes, 28), 1);
        assert_eq!(u32_at(&bytes, 30), 0);
        assert_eq!(u32_at(&bytes, 34), 3 * 4);
        assert_eq!(u32_at(&bytes, 38), 0);
        assert_eq!(u32_at(&bytes, 42), 0);
        assert_eq!(u32_at(&bytes, 46), 2);
        assert_eq!(u32_at(&bytes, 50), 2);
        assert_eq!(u32_at(&bytes, 54), 0x00_00_00_00);
        assert_eq!(u32_at(&bytes, 58), 0x00_FF_FF_FF);
    }

    #[test]
    fn test_rgb_header() {
        let encoder = Encoder::new(5, 2, 24).unwrap();
        let header = encoder.header();
        assert_eq!(header.palette, None);
        let mut bytes = vec![];
        header.write(&mut bytes).unwrap();

        assert_eq!(bytes.len(), 54);
        assert_eq!(u32_at(&bytes, 2), 54 + 2 * 16);
        assert_eq!(u32_at(&bytes, 10), 54);
        assert_eq!(i32_at(&bytes, 18), 5);
        assert_eq!(i32_at(&bytes, 22), -2);
        assert_eq!(u16_at(&bytes, 28), 24);
        assert_eq!(u32_at(&bytes, 34), 2 * 16);
        assert_eq!(u32_at(&bytes, 46), 0);
        assert_eq!(u32_at(&bytes, 50), 0);
    }
}
