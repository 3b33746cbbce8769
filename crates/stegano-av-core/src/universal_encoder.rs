use std::io::{Cursor, Result, Write};

use bitstream_io::{BigEndian, BitRead, BitReader};

use crate::media::{BitsPerUnit, Carrier};

/// Splits bytes into unit values of `bits` width, most significant bit first.
///
/// With 2 bits per unit the byte `0b10_01_11_00` becomes `[0b10, 0b01, 0b11, 0b00]`.
pub struct UnitValues {
    reader: BitReader<Cursor<Vec<u8>>, BigEndian>,
    bits: BitsPerUnit,
    remaining: usize,
}

impl UnitValues {
    pub fn new(data: Vec<u8>, bits: BitsPerUnit) -> Self {
        let remaining = data.len() * bits.units_per_byte();
        Self {
            reader: BitReader::endian(Cursor::new(data), BigEndian),
            bits,
            remaining,
        }
    }

    /// units still to be written
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Iterator for UnitValues {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.reader.read::<u8>(self.bits.bits()).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Writes values into consecutive units starting at `start`, until either the
/// carrier or the values run out. Returns the number of units written.
pub fn hide_units<C: Carrier + ?Sized>(
    carrier: &mut C,
    start: usize,
    values: &mut UnitValues,
) -> usize {
    let bits = values.bits;
    let mut written = 0;
    for index in start..carrier.unit_count() {
        match values.next() {
            Some(value) => carrier.set_unit(index, bits, value),
            None => break,
        }
        written += 1;
    }

    written
}

/// generic stegano encoder, hides whatever is written to it in the units of a carrier
pub struct UniversalEncoder<'c, C: Carrier + ?Sized> {
    carrier: &'c mut C,
    bits: BitsPerUnit,
    position: usize,
}

impl<'c, C: Carrier + ?Sized> UniversalEncoder<'c, C> {
    pub fn new(carrier: &'c mut C, bits: BitsPerUnit) -> Self {
        Self {
            carrier,
            bits,
            position: 0,
        }
    }

    /// index of the next unit that would be written
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<C: Carrier + ?Sized> Write for UniversalEncoder<'_, C> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let free_units = self.carrier.unit_count() - self.position;
        let take = buf.len().min(free_units / self.bits.units_per_byte());
        if take == 0 {
            return Ok(0);
        }

        let mut values = UnitValues::new(buf[..take].to_vec(), self.bits);
        self.position += hide_units(&mut *self.carrier, self.position, &mut values);

        Ok(take)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn should_split_bytes_msb_first() {
        let one: Vec<u8> = UnitValues::new(vec![0b1000_0001], BitsPerUnit::One).collect();
        let two: Vec<u8> = UnitValues::new(vec![0b1001_1100], BitsPerUnit::Two).collect();

        assert_eq!(one, vec![1, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(two, vec![0b10, 0b01, 0b11, 0b00]);
    }

    #[test]
    fn should_continue_across_carriers() {
        let mut values = UnitValues::new(vec![0xff], BitsPerUnit::One);
        let mut first: Vec<u8> = vec![0; 5];
        let mut second: Vec<u8> = vec![0; 5];

        assert_eq!(hide_units(&mut first, 0, &mut values), 5);
        assert_eq!(hide_units(&mut second, 0, &mut values), 3);

        assert_eq!(first, vec![1, 1, 1, 1, 1]);
        assert_eq!(second, vec![1, 1, 1, 0, 0]);
        assert_eq!(values.remaining(), 0);
    }

    #[test]
    fn should_encode_in_chunks() {
        let mut samples: Vec<i16> = vec![0; 16];
        {
            let mut encoder = UniversalEncoder::new(&mut samples, BitsPerUnit::Two);
            encoder.write_all(&[0b0100_0000]).unwrap();
            encoder.write_all(&[0b0000_0011]).unwrap();
            assert_eq!(encoder.position(), 8);
        }

        assert_eq!(&samples[..8], &[1, 0, 0, 0, 0, 0, 0, 3]);
        assert!(samples[8..].iter().all(|s| *s == 0));
    }

    #[test]
    fn should_refuse_to_write_beyond_the_carrier() {
        let mut samples: Vec<u8> = vec![0; 12];
        let result = UniversalEncoder::new(&mut samples, BitsPerUnit::One).write_all(&[1, 2]);

        assert_eq!(result.unwrap_err().kind(), ErrorKind::WriteZero);
    }
}
