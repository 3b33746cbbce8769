use std::io::{Read, Result};

use crate::media::{BitsPerUnit, Carrier};

/// Iterates the unit values of a carrier in storage order
pub struct CarrierUnits<'c, C: Carrier + ?Sized> {
    carrier: &'c C,
    bits: BitsPerUnit,
    index: usize,
}

impl<'c, C: Carrier + ?Sized> CarrierUnits<'c, C> {
    pub fn new(carrier: &'c C, bits: BitsPerUnit) -> Self {
        Self {
            carrier,
            bits,
            index: 0,
        }
    }
}

impl<C: Carrier + ?Sized> Iterator for CarrierUnits<'_, C> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.carrier.unit_count() {
            return None;
        }
        let value = self.carrier.get_unit(self.index, self.bits);
        self.index += 1;

        Some(Ok(value))
    }
}

/// generic stegano decoder, joins unit values back into bytes
///
/// Units are pulled lazily, so a source that decodes media on the fly only
/// decodes as much as is actually read.
pub struct UniversalDecoder<I>
where
    I: Iterator<Item = Result<u8>>,
{
    units: I,
    bits: BitsPerUnit,
}

impl<I> UniversalDecoder<I>
where
    I: Iterator<Item = Result<u8>>,
{
    pub fn new(units: I, bits: BitsPerUnit) -> Self {
        Self { units, bits }
    }
}

impl<'c, C: Carrier + ?Sized> UniversalDecoder<CarrierUnits<'c, C>> {
    pub fn from_carrier(carrier: &'c C, bits: BitsPerUnit) -> Self {
        Self::new(CarrierUnits::new(carrier, bits), bits)
    }
}

impl<I> Read for UniversalDecoder<I>
where
    I: Iterator<Item = Result<u8>>,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let shift = self.bits.bits();
        let mut bytes_read = 0;

        'bytes: for slot in buf.iter_mut() {
            let mut byte = 0u8;
            for _ in 0..self.bits.units_per_byte() {
                match self.units.next() {
                    Some(value) => byte = (byte << shift) | value?,
                    // an incomplete trailing byte is dropped
                    None => break 'bytes,
                }
            }
            *slot = byte;
            bytes_read += 1;
        }

        Ok(bytes_read)
    }
}
