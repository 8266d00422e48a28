use bmp_encoder::Encoder;
use std::error::Error;
use std::fs::File;

fn main() -> Result<(), Box<dyn Error>> {
    let width = 21;
    let height = 21;

    let checkerboard: Vec<u8> = (0..width * height)
        .map(|e| if e % 2 == 0 { 0xFF } else { 0x00 })
        .collect();
    let encoder = Encoder::new(width, height, 1)?;
    encoder.write(&checkerboard, File::create("checkerboard.bmp")?)?;

    let mut gradient = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            gradient.push((x * 255 / (width - 1)) as u8);
            gradient.push((y * 255 / (height - 1)) as u8);
            gradient.push(128);
        }
    }
    let encoder = Encoder::new(width, height, 24)?;
    encoder.write(&gradient, File::create("gradient.bmp")?)?;

    Ok(())
}
