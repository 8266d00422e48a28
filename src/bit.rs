/// Packs single bits into bytes, most significant bit first
///
/// Bits are shifted into an accumulator and the byte is stored once 8 bits are collected. A
/// partial byte is left-justified on [`BitAccumulator::finish`], so its unused low bits are zero.
pub struct BitAccumulator<'a> {
    acc: u8,
    nbits: u8,
    out: &'a mut [u8],
    written: usize,
}

impl<'a> BitAccumulator<'a> {
    /// Create a new BitAccumulator that stores bytes at the start of `out`
    pub fn new(out: &'a mut [u8]) -> BitAccumulator<'a> {
        BitAccumulator {
            acc: 0,
            nbits: 0,
            out,
            written: 0,
        }
    }

    /// Push a single bit
    ///
    /// Panics if `out` is full, callers size it to `ceil(bits / 8)`
    pub fn push(&mut self, bit: bool) {
        self.acc = (self.acc << 1) | bit as u8;
        self.nbits += 1;
        if self.nbits == 8 {
            self.flush();
        }
    }

    /// Store the bits not yet written, returns the number of bytes stored in `out`
    pub fn finish(mut self) -> usize {
        self.flush();
        self.written
    }

    fn flush(&mut self) {
        if self.nbits > 0 {
            self.out[self.written] = self.acc << (8 - self.nbits);
            self.written += 1;
            self.acc = 0;
            self.nbits = 0;
        }
    }
}
