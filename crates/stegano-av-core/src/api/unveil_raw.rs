use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::shared::ensure_exists;
use crate::media::audio::AudioCarrier;
use crate::media::video::{FrameSource, FrameUnits, VideoInput};
use crate::media::{BitsPerUnit, MediaKind};
use crate::progress::Progress;
use crate::result::Result;
use crate::universal_decoder::UniversalDecoder;
use crate::SteganoError;

pub fn prepare() -> UnveilRawApi {
    UnveilRawApi::default()
}

/// Dumps the low bits of every unit as bytes, without interpreting any framing.
#[derive(Default, Debug)]
pub struct UnveilRawApi {
    secret_media: Option<PathBuf>,
    destination_file: Option<PathBuf>,
    bits_per_unit: BitsPerUnit,
    progress: Progress,
}

impl UnveilRawApi {
    /// This is the secret audio or video that contains the data to be unveiled
    pub fn from_secret_file(mut self, secret_media: impl AsRef<Path>) -> Self {
        self.secret_media = Some(secret_media.as_ref().to_path_buf());
        self
    }

    /// This is the raw file where all data will be saved to
    pub fn into_raw_file(mut self, destination_file: impl AsRef<Path>) -> Self {
        self.destination_file = Some(destination_file.as_ref().to_path_buf());
        self
    }

    pub fn with_bits_per_unit(mut self, bits_per_unit: BitsPerUnit) -> Self {
        self.bits_per_unit = bits_per_unit;
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Execute the unveil process and blocks until it is finished
    pub fn execute(self) -> Result<()> {
        let Some(secret_media) = self.secret_media else {
            return Err(SteganoError::CarrierNotSet);
        };
        let Some(destination_file) = self.destination_file else {
            return Err(SteganoError::TargetNotSet);
        };
        ensure_exists(&secret_media)?;

        let bits = self.bits_per_unit;
        let mut content = Vec::new();
        if MediaKind::from_path(&secret_media)?.is_video() {
            let mut input = VideoInput::open(&secret_media)?;
            dump_video(&mut input, bits, &self.progress, &mut content)?;
        } else {
            let audio = AudioCarrier::open(&secret_media)?;
            UniversalDecoder::from_carrier(&audio, bits)
                .read_to_end(&mut content)
                .map_err(|source| SteganoError::ReadError { source })?;
        }

        fs::write(destination_file, content).map_err(|source| SteganoError::WriteError { source })
    }
}

fn dump_video<S: FrameSource + ?Sized>(
    source: &mut S,
    bits: BitsPerUnit,
    progress: &Progress,
    content: &mut Vec<u8>,
) -> Result<()> {
    let mut units = FrameUnits::new(source, bits, progress);
    let read = UniversalDecoder::new(&mut units, bits).read_to_end(content);
    if let Some(e) = units.take_error() {
        return Err(e);
    }
    read.map_err(|source| SteganoError::ReadError { source })?;

    Ok(())
}
