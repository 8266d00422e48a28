#![no_main]
use arbitrary::Arbitrary;
use bmp_encoder::{BmpError, Encoder};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    width: u16,
    height: u16,
    bits_per_pixel: u16,
    pixels: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let encoder = match Encoder::new(
        u32::from(input.width),
        u32::from(input.height),
        input.bits_per_pixel,
    ) {
        Ok(encoder) => encoder,
        Err(BmpError::UnsupportedFormat(_)) | Err(BmpError::Size { .. }) => return,
        Err(e) => panic!("unexpected error {}", e),
    };
    match encoder.encode(&input.pixels) {
        Ok(bmp) => assert_eq!(bmp.len(), encoder.file_size() as usize),
        Err(BmpError::OutOfBounds { expected, actual }) => {
            assert_eq!(expected, encoder.expected_pixels_len());
            assert!(actual < expected);
        }
        Err(e) => panic!("unexpected error {}", e),
    }
});
