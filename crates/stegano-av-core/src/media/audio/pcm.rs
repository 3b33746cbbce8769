use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, error};

use crate::media::{BitsPerUnit, Carrier};
use crate::result::Result;
use crate::SteganoError;

/// Width of one PCM sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    /// 8bit unsigned, hound hands them out shifted to the signed range
    U8,
    I16,
}

impl SampleWidth {
    pub fn from_spec(spec: &WavSpec) -> Result<Self> {
        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 8) => Ok(SampleWidth::U8),
            (SampleFormat::Int, 16) => Ok(SampleWidth::I16),
            (format, bits) => Err(SteganoError::UnsupportedCarrierFormat(format!(
                "only 8bit and 16bit integer PCM is supported, got {bits}bit {format:?}"
            ))),
        }
    }
}

/// A PCM buffer seen as a flat sequence of units, one unit per sample in
/// storage order (interleaved channels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioCarrier {
    spec: WavSpec,
    samples: Vec<i16>,
}

impl AudioCarrier {
    pub fn from_samples(spec: WavSpec, samples: Vec<i16>) -> Result<Self> {
        SampleWidth::from_spec(&spec)?;

        Ok(Self { spec, samples })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SteganoError::CarrierNotFound(path.to_path_buf()));
        }

        let reader = WavReader::open(path)?;
        Self::from_reader(reader)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(WavReader::new(Cursor::new(bytes))?)
    }

    fn from_reader<R: Read>(reader: WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        let width = SampleWidth::from_spec(&spec)?;
        let samples = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(
            "audio carrier: {} samples, {} channels, {width:?}",
            samples.len(),
            spec.channels
        );

        Ok(Self { spec, samples })
    }

    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    pub fn sample_width(&self) -> SampleWidth {
        // validated on construction
        if self.spec.bits_per_sample == 8 {
            SampleWidth::U8
        } else {
            SampleWidth::I16
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            error!("Error creating file {path:?}: {e}");
            SteganoError::WriteError { source: e }
        })?;

        self.save_to_writer(BufWriter::new(file))
    }

    pub fn save_to_writer<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut wav_writer = WavWriter::new(writer, self.spec).map_err(map_write_error)?;
        for s in self.samples.iter() {
            wav_writer.write_sample(*s).map_err(map_write_error)?;
        }
        wav_writer.finalize().map_err(map_write_error)
    }
}

fn map_write_error(e: hound::Error) -> SteganoError {
    match e {
        hound::Error::IoError(source) => SteganoError::WriteError { source },
        _ => SteganoError::AudioEncodingError,
    }
}

impl Carrier for AudioCarrier {
    fn unit_count(&self) -> usize {
        self.samples.len()
    }

    fn get_unit(&self, index: usize, bits: BitsPerUnit) -> u8 {
        self.samples.get_unit(index, bits)
    }

    fn set_unit(&mut self, index: usize, bits: BitsPerUnit, value: u8) {
        self.samples.set_unit(index, bits, value)
    }
}
