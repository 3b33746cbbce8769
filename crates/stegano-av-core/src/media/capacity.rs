use log::debug;

use super::BitsPerUnit;
use crate::result::Result;
use crate::SteganoError;

/// How many payload bits a carrier can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    units: u64,
    bits_per_unit: BitsPerUnit,
}

impl Capacity {
    pub fn new(units: u64, bits_per_unit: BitsPerUnit) -> Self {
        Self {
            units,
            bits_per_unit,
        }
    }

    pub fn bits(&self) -> u64 {
        self.units * self.bits_per_unit.bits() as u64
    }

    /// the largest payload in bytes that still fits next to `overhead_bits` of framing
    pub fn max_payload_bytes(&self, overhead_bits: u64) -> u64 {
        self.bits().saturating_sub(overhead_bits) / 8
    }

    /// Rejects a payload of `payload_len` bytes plus `overhead_bits` of framing that
    /// does not fit. Must be called before the first unit is written.
    pub fn ensure_fits(&self, payload_len: u64, overhead_bits: u64) -> Result<()> {
        let required_bits = overhead_bits + payload_len * 8;
        debug!(
            "capacity check: {required_bits} bits required, {} bits available",
            self.bits()
        );

        if required_bits > self.bits() {
            return Err(SteganoError::CapacityExceeded {
                required_bytes: payload_len,
                available_bytes: self.max_payload_bytes(overhead_bits),
            });
        }

        Ok(())
    }
}
