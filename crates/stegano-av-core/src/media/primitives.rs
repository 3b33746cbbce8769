use super::BitsPerUnit;

/// The low level data types that carry information, e.g. a color channel or an audio sample
pub trait LsbPrimitive: Copy {
    /// returns the low `bits` bits
    fn low_bits(self, bits: BitsPerUnit) -> u8;

    /// replaces the low `bits` bits with `value`, all higher bits stay untouched
    fn with_low_bits(self, bits: BitsPerUnit, value: u8) -> Self;
}

impl LsbPrimitive for u8 {
    #[inline(always)]
    fn low_bits(self, bits: BitsPerUnit) -> u8 {
        self & bits.mask()
    }

    #[inline(always)]
    fn with_low_bits(self, bits: BitsPerUnit, value: u8) -> Self {
        let mask = bits.mask();
        (self & !mask) | (value & mask)
    }
}

impl LsbPrimitive for i16 {
    #[inline(always)]
    fn low_bits(self, bits: BitsPerUnit) -> u8 {
        (self & bits.mask() as i16) as u8
    }

    #[inline(always)]
    fn with_low_bits(self, bits: BitsPerUnit, value: u8) -> Self {
        let mask = bits.mask() as i16;
        (self & !mask) | (value as i16 & mask)
    }
}

/// An ordered sequence of addressable units whose low bits can be read and written.
///
/// Codecs only talk to this trait, so they work the same on audio samples,
/// video frames or a plain in-memory buffer.
pub trait Carrier {
    fn unit_count(&self) -> usize;

    fn get_unit(&self, index: usize, bits: BitsPerUnit) -> u8;

    fn set_unit(&mut self, index: usize, bits: BitsPerUnit, value: u8);
}

impl<T: LsbPrimitive> Carrier for [T] {
    fn unit_count(&self) -> usize {
        self.len()
    }

    fn get_unit(&self, index: usize, bits: BitsPerUnit) -> u8 {
        self[index].low_bits(bits)
    }

    fn set_unit(&mut self, index: usize, bits: BitsPerUnit, value: u8) {
        self[index] = self[index].with_low_bits(bits, value);
    }
}

impl<T: LsbPrimitive> Carrier for Vec<T> {
    fn unit_count(&self) -> usize {
        self.as_slice().unit_count()
    }

    fn get_unit(&self, index: usize, bits: BitsPerUnit) -> u8 {
        self.as_slice().get_unit(index, bits)
    }

    fn set_unit(&mut self, index: usize, bits: BitsPerUnit, value: u8) {
        self.as_mut_slice().set_unit(index, bits, value)
    }
}
