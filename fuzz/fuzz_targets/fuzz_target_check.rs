#![no_main]
use bmp_encoder::fuzz::EncodeInput;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: EncodeInput| {
    input.check().unwrap();
});
