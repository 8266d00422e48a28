//! fuzzing!

use crate::{BitsPerPixel, BmpError, Encoder};
use arbitrary::{Arbitrary, Unstructured};
use image::{GenericImageView, ImageFormat, Rgba};

/// Biggest side of a fuzzed image, keeps the `image` round trip fast
const MAX_SIDE: u32 = 256;

/// An encoder and a pixel buffer matching its geometry, used for fuzz tests
#[derive(Debug)]
pub struct EncodeInput {
    /// the Encoder
    pub encoder: Encoder,
    /// the pixels to encode, exactly `encoder.expected_pixels_len()` samples
    pub pixels: Vec<u8>,
}

impl<'a> Arbitrary<'a> for EncodeInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let width = u.int_in_range(1..=MAX_SIDE)?;
        let height = u.int_in_range(1..=MAX_SIDE)?;
        let bits_per_pixel = BitsPerPixel::arbitrary(u)?;
        let encoder = Encoder::with_format(width, height, bits_per_pixel)
            .map_err(|_| arbitrary::Error::IncorrectFormat)?;
        let total = encoder.expected_pixels_len();
        let mut pixels = Vec::with_capacity(total);
        for _ in 0..total {
            pixels.push(u8::arbitrary(u)?);
        }
        Ok(EncodeInput { encoder, pixels })
    }
}

impl EncodeInput {
    /// check that image crate loads the same pixels
    pub fn check(&self) -> Result<(), BmpError> {
        let bmp = self.encoder.encode(&self.pixels)?;
        assert_eq!(bmp.len(), self.encoder.file_size() as usize);

        let image = image::load_from_memory_with_format(&bmp, ImageFormat::Bmp).unwrap();
        let (width, height) = image.dimensions();
        assert_eq!(width, self.encoder.width());
        assert_eq!(height, self.encoder.height());
        for y in 0..height {
            for x in 0..width {
                let i = (y * width + x) as usize;
                let expected = match self.encoder.bits_per_pixel() {
                    BitsPerPixel::One => {
                        let v = if self.pixels[i] == 0xFF { 255 } else { 0 };
                        Rgba([v, v, v, 255])
                    }
                    BitsPerPixel::TwentyFour => {
                        let rgb = &self.pixels[i * 3..i * 3 + 3];
                        Rgba([rgb[0], rgb[1], rgb[2], 255])
                    }
                };
                assert_eq!(image.get_pixel(x, y), expected);
            }
        }
        Ok(())
    }
}
