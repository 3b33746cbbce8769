use std::convert::TryFrom;

use crate::api::Password;
use crate::progress::Progress;
use crate::SteganoError;

/// Number of low order bits of every carrier unit that carry payload.
///
/// Restricted to 1 or 2 to keep the distortion of samples and pixels bounded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitsPerUnit {
    #[default]
    One,
    Two,
}

impl BitsPerUnit {
    pub fn bits(self) -> u32 {
        match self {
            BitsPerUnit::One => 1,
            BitsPerUnit::Two => 2,
        }
    }

    /// mask selecting the mutable low bits of a unit
    pub fn mask(self) -> u8 {
        ((1u16 << self.bits()) - 1) as u8
    }

    /// how many units one payload byte occupies
    pub fn units_per_byte(self) -> usize {
        (8 / self.bits()) as usize
    }
}

impl TryFrom<u8> for BitsPerUnit {
    type Error = SteganoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BitsPerUnit::One),
            2 => Ok(BitsPerUnit::Two),
            n => Err(SteganoError::UnsupportedCarrierFormat(format!(
                "bits per unit must be 1 or 2, got {n}"
            ))),
        }
    }
}

/// Options for LSB audio encoding
#[derive(Debug, Default)]
pub struct AudioCodecOptions {
    pub bits_per_unit: BitsPerUnit,

    /// If set, the payload is obfuscated with a repeating key XOR of this password.
    /// Note: this is not encryption.
    pub password: Password,

    pub progress: Progress,
}

impl AudioCodecOptions {
    pub fn with_bits_per_unit(mut self, bits_per_unit: BitsPerUnit) -> Self {
        self.bits_per_unit = bits_per_unit;
        self
    }

    pub fn with_password<P: Into<Password>>(mut self, password: P) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }
}

/// What the video decoder does with the digest stored in the header
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DigestPolicy {
    /// recompute and fail with [`SteganoError::DigestMismatch`] on mismatch
    #[default]
    Verify,
    /// recompute and only log a warning on mismatch
    Warn,
    /// do not recompute at all
    Ignore,
}

/// Options for LSB video encoding
#[derive(Debug, Default)]
pub struct VideoCodecOptions {
    pub bits_per_unit: BitsPerUnit,
    pub digest_policy: DigestPolicy,
    pub progress: Progress,
}

impl VideoCodecOptions {
    pub fn with_bits_per_unit(mut self, bits_per_unit: BitsPerUnit) -> Self {
        self.bits_per_unit = bits_per_unit;
        self
    }

    pub fn with_digest_policy(mut self, digest_policy: DigestPolicy) -> Self {
        self.digest_policy = digest_policy;
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }
}
