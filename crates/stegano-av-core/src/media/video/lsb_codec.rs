use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::frames::{FrameSink, FrameSource, FrameUnits, VideoInfo, VideoInput, VideoOutput};
use crate::media::payload::{digest_of, Frame, FrameLayout, RichHeader, LENGTH_PREFIX_BITS};
use crate::media::{discard_partial_output, Capacity, DigestPolicy, VideoCodecOptions};
use crate::result::Result;
use crate::universal_decoder::UniversalDecoder;
use crate::universal_encoder::{hide_units, UnitValues};
use crate::SteganoError;

/// LSB codec for video frames with `Rich` framing
#[derive(Debug, Default)]
pub struct LsbCodec {
    options: VideoCodecOptions,
}

impl LsbCodec {
    pub fn new(options: VideoCodecOptions) -> Self {
        Self { options }
    }

    pub fn capacity(&self, info: &VideoInfo) -> Capacity {
        Capacity::new(info.unit_count(), self.options.bits_per_unit)
    }

    /// The largest payload that fits next to a header naming `filename`.
    pub fn max_payload_bytes(&self, info: &VideoInfo, filename: &str) -> Result<u64> {
        let capacity = self.capacity(info);
        let overhead_for = |size: u64| -> Result<u64> {
            let header = RichHeader {
                filename: filename.to_string(),
                size,
                digest: digest_of(&[]),
            };
            Ok(LENGTH_PREFIX_BITS + header.to_bytes()?.len() as u64 * 8)
        };

        // the size field grows with the payload, step down until it fits
        let mut size = capacity.max_payload_bytes(overhead_for(0)?);
        while size > 0 && capacity.ensure_fits(size, overhead_for(size)?).is_err() {
            size -= 1;
        }

        Ok(size)
    }

    /// Hides `payload` under the name `filename` in the frames of `source`.
    ///
    /// The capacity is checked against the whole video before `open_sink` is
    /// called, so a payload that does not fit never creates an output. Every
    /// frame is passed on, frames after the payload unchanged.
    pub fn encode<S, K, F>(
        &self,
        source: &mut S,
        filename: &str,
        payload: &[u8],
        open_sink: F,
    ) -> Result<K>
    where
        S: FrameSource + ?Sized,
        K: FrameSink,
        F: FnOnce(&VideoInfo) -> Result<K>,
    {
        if payload.is_empty() {
            return Err(SteganoError::MissingPayload);
        }
        let bits = self.options.bits_per_unit;
        let info = source.info().clone();
        debug!("video carrier: {info:?}, {bits:?}");

        let frame = Frame::rich(filename, payload.to_vec());
        self.capacity(&info)
            .ensure_fits(payload.len() as u64, frame.overhead_bits()?)?;
        let mut values = UnitValues::new(frame.to_bytes()?, bits);

        let progress = &self.options.progress;
        let mut sink = open_sink(&info)?;
        let mut frames_written = 0u64;
        while let Some(mut image) = source.next_frame()? {
            progress.checkpoint()?;
            info.check_frame(&image)?;
            if values.remaining() > 0 {
                hide_units(&mut image, 0, &mut values);
            }
            sink.write_frame(&image)?;
            frames_written += 1;
            progress.report(frames_written, info.frame_count);
        }

        if frames_written != info.frame_count || values.remaining() > 0 {
            return Err(SteganoError::VideoPipeline(format!(
                "expected {} frames, the source delivered {frames_written}",
                info.frame_count
            )));
        }
        sink.finish()?;

        Ok(sink)
    }

    /// Unveils the rich frame hidden by [`LsbCodec::encode`].
    ///
    /// Frames are only decoded as far as the payload reaches.
    pub fn decode<S: FrameSource + ?Sized>(&self, source: &mut S) -> Result<Frame> {
        let bits = self.options.bits_per_unit;
        let capacity = self.capacity(source.info());
        let progress = &self.options.progress;

        let mut units = FrameUnits::new(source, bits, progress);
        let parsed = {
            let mut decoder = UniversalDecoder::new(&mut units, bits);
            Frame::read_from(&mut decoder, FrameLayout::Rich, capacity.bits())
        };
        if let Some(e) = units.take_error() {
            return Err(e);
        }
        let frame = parsed?;
        debug!("unveiled frame after {} frames", units.frames_read());

        if let Some(header) = frame.header() {
            self.check_digest(header, frame.payload())?;
        }

        Ok(frame)
    }

    fn check_digest(&self, header: &RichHeader, payload: &[u8]) -> Result<()> {
        if self.options.digest_policy == DigestPolicy::Ignore {
            return Ok(());
        }
        let actual = digest_of(payload);
        if actual == header.digest {
            return Ok(());
        }

        match self.options.digest_policy {
            DigestPolicy::Verify => Err(SteganoError::DigestMismatch {
                expected: header.digest.clone(),
                actual,
            }),
            _ => {
                warn!(
                    "digest mismatch for {:?}: expected {}, got {actual}",
                    header.filename, header.digest
                );
                Ok(())
            }
        }
    }

    /// Hides `payload` under `filename` in the video `carrier` and writes it to `output`.
    ///
    /// `output` must be a lossless container (mkv, avi, nut) or a directory for PNG frames.
    /// On failure a partially written `output` is removed again.
    pub fn hide_in_file(
        &self,
        carrier: &Path,
        filename: &str,
        payload: &[u8],
        output: &Path,
    ) -> Result<()> {
        let mut input = VideoInput::open(carrier)?;
        VideoOutput::check_target(output)?;

        let mut created = false;
        let result = self.encode(&mut input, filename, payload, |info| {
            let sink = VideoOutput::create(output, info);
            created = sink.is_ok();
            sink
        });
        if let Err(e) = result {
            if created {
                discard_partial_output(output);
            }
            return Err(e);
        }
        info!(
            "hid {} bytes as {filename:?} in {carrier:?}, written to {output:?}",
            payload.len()
        );

        Ok(())
    }

    /// Unveils the payload of `secret_media` into `destination`.
    ///
    /// If `destination` is a folder the payload is stored there under its embedded file name.
    pub fn unveil_from_file(&self, secret_media: &Path, destination: &Path) -> Result<PathBuf> {
        let mut input = VideoInput::open(secret_media)?;
        let frame = self.decode(&mut input)?;

        let target = if destination.is_dir() {
            let filename = frame.header().map(|h| h.filename.as_str()).unwrap_or_default();
            destination.join(safe_file_name(filename)?)
        } else {
            destination.to_path_buf()
        };
        fs::write(&target, frame.payload()).map_err(|source| SteganoError::WriteError { source })?;
        info!("unveiled {} bytes into {:?}", frame.payload().len(), target);

        Ok(target)
    }
}

/// Strips any directory part of an embedded file name, it must not escape the destination.
fn safe_file_name(filename: &str) -> Result<&str> {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or(SteganoError::InvalidFileName)
}
