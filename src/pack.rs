use crate::bit::BitAccumulator;
use crate::{BitsPerPixel, BmpError, Encoder};

/// Input value of a white monochrome pixel, everything else is black
const WHITE: u8 = 0xFF;

/// returns `BmpError::OutOfBounds` if `pixels` is too short for `encoder`
pub(crate) fn check_len(encoder: &Encoder, pixels: &[u8]) -> Result<(), BmpError> {
    let expected = encoder.expected_pixels_len();
    if pixels.len() < expected {
        return Err(BmpError::OutOfBounds {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Packs `pixels` top-down into `out`, one padded row after the other
///
/// `out` must be exactly `encoder.data_size()` bytes long.
pub(crate) fn pack_into(encoder: &Encoder, pixels: &[u8], out: &mut [u8]) -> Result<(), BmpError> {
    check_len(encoder, pixels)?;
    debug_assert_eq!(out.len(), encoder.data_size() as usize);

    let stride = encoder.padded_row_bytes() as usize;
    let bits_per_pixel = encoder.bits_per_pixel();
    let row_len = encoder.width() as usize * bits_per_pixel.samples_per_pixel();
    let pixels = &pixels[..encoder.expected_pixels_len()];

    match bits_per_pixel {
        BitsPerPixel::One => for_each_row(pixels, row_len, out, stride, pack_monochrome_row),
        BitsPerPixel::TwentyFour => for_each_row(pixels, row_len, out, stride, pack_rgb_row),
    }
    Ok(())
}

#[cfg(not(feature = "rayon"))]
fn for_each_row<F>(pixels: &[u8], row_len: usize, out: &mut [u8], stride: usize, f: F)
where
    F: Fn(&[u8], &mut [u8]),
{
    out.chunks_exact_mut(stride)
        .zip(pixels.chunks_exact(row_len))
        .for_each(|(dst, src)| f(src, dst));
}

#[cfg(feature = "rayon")]
fn for_each_row<F>(pixels: &[u8], row_len: usize, out: &mut [u8], stride: usize, f: F)
where
    F: Fn(&[u8], &mut [u8]) + Send + Sync,
{
    use rayon::prelude::*;

    out.par_chunks_exact_mut(stride)
        .zip(pixels.par_chunks_exact(row_len))
        .for_each(|(dst, src)| f(src, dst));
}

/// 8 pixels per byte, leftmost pixel in the most significant bit
fn pack_monochrome_row(src: &[u8], dst: &mut [u8]) {
    let mut bits = BitAccumulator::new(dst);
    for pixel in src {
        bits.push(*pixel == WHITE);
    }
    let written = bits.finish();
    dst[written..].fill(0);
}

/// RGB input stored as BGR
fn pack_rgb_row(src: &[u8], dst: &mut [u8]) {
    let (data, padding) = dst.split_at_mut(src.len());
    for (bgr, rgb) in data.chunks_exact_mut(3).zip(src.chunks_exact(3)) {
        bgr[0] = rgb[2];
        bgr[1] = rgb[1];
        bgr[2] = rgb[0];
    }
    padding.fill(0);
}

#[cfg(test)]
mod test {
    use crate::pack::{pack_into, pack_monochrome_row, pack_rgb_row};
    use crate::{BmpError, Encoder};

    fn pack(encoder: &Encoder, pixels: &[u8]) -> Vec<u8> {
        // garbage, to check padding is cleared
        let mut out = vec![0xAA; encoder.data_size() as usize];
        pack_into(encoder, pixels, &mut out).unwrap();
        out
    }

    #[test]
    fn test_monochrome_row() {
        let mut dst = [0xAAu8; 4];
        pack_monochrome_row(&[0xFF; 9], &mut dst);
        assert_eq!(dst, [0xFF, 0x80, 0, 0]);

        let mut dst = [0xAAu8; 4];
        pack_monochrome_row(&[0x00, 0xFF, 0x7F, 0xFE, 0xFF], &mut dst);
        assert_eq!(dst, [0b0100_1000, 0, 0, 0]);
    }

    #[test]
    fn test_rgb_row() {
        let mut dst = [0xAAu8; 8];
        pack_rgb_row(&[1, 2, 3, 4, 5, 6], &mut dst);
        assert_eq!(dst, [3, 2, 1, 6, 5, 4, 0, 0]);
    }

    #[test]
    fn test_top_down() {
        let encoder = Encoder::new(1, 3, 24).unwrap();
        let out = pack(&encoder, &[1, 1, 1, 2, 2, 2, 3, 3, 3]);
        assert_eq!(out, vec![1, 1, 1, 0, 2, 2, 2, 0, 3, 3, 3, 0]);

        let encoder = Encoder::new(2, 2, 1).unwrap();
        let out = pack(&encoder, &[0xFF, 0x00, 0x00, 0xFF]);
        assert_eq!(out, vec![0x80, 0, 0, 0, 0x40, 0, 0, 0]);
    }

    #[test]
    fn test_wide_monochrome() {
        // 33 pixels need 5 bytes, padded to 8
        let encoder = Encoder::new(33, 1, 1).unwrap();
        let mut pixels = vec![0x00; 33];
        pixels[0] = 0xFF;
        pixels[31] = 0xFF;
        pixels[32] = 0xFF;
        let out = pack(&encoder, &pixels);
        assert_eq!(out, vec![0x80, 0, 0, 0x01, 0x80, 0, 0, 0]);
    }

    #[test]
    fn test_extra_pixels_ignored() {
        let encoder = Encoder::new(1, 1, 24).unwrap();
        assert_eq!(pack(&encoder, &[10, 20, 30, 40, 50]), vec![30, 20, 10, 0]);
    }

    #[test]
    fn test_short_buffer() {
        let encoder = Encoder::new(4, 4, 24).unwrap();
        let mut out = vec![0; encoder.data_size() as usize];
        let err = pack_into(&encoder, &[0; 47], &mut out).unwrap_err();
        assert!(matches!(
            err,
            BmpError::OutOfBounds {
                expected: 48,
                actual: 47
            }
        ));
    }
}
