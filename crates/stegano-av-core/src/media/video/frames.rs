//! Video carrier adapter.
//!
//! A video is seen as one long run of units: frame by frame, row by row,
//! column by column and finally R, G, B. That is exactly the memory layout of
//! a sequence of [`RgbImage`]s, so a frame is a [`Carrier`] on its own and the
//! unit index inside a frame is the index into its raw buffer.

use std::io;
use std::path::Path;

use enum_dispatch::enum_dispatch;
use image::RgbImage;

use super::ffmpeg::{FfmpegSink, FfmpegSource};
use super::memory::{MemorySink, MemorySource};
use super::png_sequence::{PngSequenceSink, PngSequenceSource};
use crate::media::{BitsPerUnit, Carrier, MediaKind};
use crate::progress::Progress;
use crate::result::Result;
use crate::SteganoError;

/// color channels per pixel
pub const CHANNELS: u64 = 3;

/// Geometry and timing of a video, known before the first frame is decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub frame_count: u64,
    /// as a rational like `30000/1001`, handed to the encoder unchanged
    ///
    /// Output is written at this constant rate. A variable frame rate input
    /// keeps every frame, but not its original timestamps.
    pub frame_rate: String,
}

impl VideoInfo {
    pub fn units_per_frame(&self) -> u64 {
        self.width as u64 * self.height as u64 * CHANNELS
    }

    pub fn unit_count(&self) -> u64 {
        self.frame_count * self.units_per_frame()
    }

    /// Rejects frames whose size differs from the announced geometry.
    pub fn check_frame(&self, frame: &RgbImage) -> Result<()> {
        if frame.dimensions() != (self.width, self.height) {
            let (w, h) = frame.dimensions();
            return Err(SteganoError::UnsupportedCarrierFormat(format!(
                "frame of {w}x{h} in a video of {}x{}",
                self.width, self.height
            )));
        }

        Ok(())
    }
}

/// Produces decoded frames in temporal order
#[enum_dispatch]
pub trait FrameSource {
    fn info(&self) -> &VideoInfo;

    /// `None` once all frames were handed out
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

/// Consumes frames and encodes them losslessly
#[enum_dispatch]
pub trait FrameSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()>;

    /// Flushes and closes the output. Must be called exactly once, after the last frame.
    fn finish(&mut self) -> Result<()>;
}

/// All supported frame sources
#[enum_dispatch(FrameSource)]
pub enum VideoInput {
    Ffmpeg(FfmpegSource),
    PngSequence(PngSequenceSource),
    Memory(MemorySource),
}

/// All supported frame sinks
#[enum_dispatch(FrameSink)]
pub enum VideoOutput {
    Ffmpeg(FfmpegSink),
    PngSequence(PngSequenceSink),
    Memory(MemorySink),
}

impl VideoInput {
    /// Opens a video file through ffmpeg or a directory of PNG frames.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SteganoError::CarrierNotFound(path.to_path_buf()));
        }
        match MediaKind::from_path(path)? {
            MediaKind::Video => Ok(FfmpegSource::open(path)?.into()),
            MediaKind::VideoFrames => Ok(PngSequenceSource::open(path)?.into()),
            MediaKind::Audio => Err(SteganoError::UnsupportedMedia),
        }
    }
}

impl VideoOutput {
    /// Rejects an output path that cannot hold lossless video, before any work is done.
    pub fn check_target(path: &Path) -> Result<MediaKind> {
        MediaKind::Video.output_kind(path)
    }

    pub fn create(path: &Path, info: &VideoInfo) -> Result<Self> {
        match Self::check_target(path)? {
            MediaKind::VideoFrames => Ok(PngSequenceSink::create(path)?.into()),
            _ => Ok(FfmpegSink::create(path, info)?.into()),
        }
    }
}

impl Carrier for RgbImage {
    fn unit_count(&self) -> usize {
        self.as_raw().len()
    }

    fn get_unit(&self, index: usize, bits: BitsPerUnit) -> u8 {
        self.as_raw().get_unit(index, bits)
    }

    fn set_unit(&mut self, index: usize, bits: BitsPerUnit, value: u8) {
        let channels: &mut [u8] = self;
        channels.set_unit(index, bits, value)
    }
}

/// Streams the unit values of all frames of a source, decoding frames only on demand.
///
/// Used by reference with a [`crate::universal_decoder::UniversalDecoder`]; a
/// failing or cancelled source ends the stream and the cause is kept for
/// [`FrameUnits::take_error`].
pub struct FrameUnits<'s, S: FrameSource + ?Sized> {
    source: &'s mut S,
    bits: BitsPerUnit,
    progress: &'s Progress,
    frame: Option<RgbImage>,
    index: usize,
    frames_read: u64,
    error: Option<SteganoError>,
}

impl<'s, S: FrameSource + ?Sized> FrameUnits<'s, S> {
    pub fn new(source: &'s mut S, bits: BitsPerUnit, progress: &'s Progress) -> Self {
        Self {
            source,
            bits,
            progress,
            frame: None,
            index: 0,
            frames_read: 0,
            error: None,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// the error that ended the stream, if any
    pub fn take_error(&mut self) -> Option<SteganoError> {
        self.error.take()
    }

    fn fail(&mut self, e: SteganoError) -> Option<io::Result<u8>> {
        let message = e.to_string();
        self.error = Some(e);

        Some(Err(io::Error::new(io::ErrorKind::Other, message)))
    }
}

impl<S: FrameSource + ?Sized> Iterator for FrameUnits<'_, S> {
    type Item = io::Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(frame) = &self.frame {
                if self.index < frame.unit_count() {
                    let value = frame.get_unit(self.index, self.bits);
                    self.index += 1;
                    return Some(Ok(value));
                }
            }

            if let Err(e) = self.progress.checkpoint() {
                return self.fail(e);
            }
            match self.source.next_frame() {
                Ok(Some(frame)) => {
                    self.frames_read += 1;
                    self.progress
                        .report(self.frames_read, self.source.info().frame_count);
                    self.frame = Some(frame);
                    self.index = 0;
                }
                Ok(None) => {
                    self.frame = None;
                    return None;
                }
                Err(e) => return self.fail(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::universal_decoder::UniversalDecoder;

    fn info(frame_count: u64) -> VideoInfo {
        VideoInfo {
            width: 4,
            height: 4,
            frame_count,
            frame_rate: "25/1".to_string(),
        }
    }

    #[test]
    fn should_count_units_per_channel() {
        assert_eq!(info(3).units_per_frame(), 48);
        assert_eq!(info(3).unit_count(), 144);
    }

    #[test]
    fn should_address_units_in_raw_buffer_order() {
        let mut frame = RgbImage::new(2, 2);
        // pixel (1, 0), green channel
        frame.set_unit(4, BitsPerUnit::Two, 0b11);

        assert_eq!(frame.get_pixel(1, 0).0, [0, 3, 0]);
        assert_eq!(frame.get_unit(4, BitsPerUnit::One), 1);
    }

    #[test]
    fn should_reject_frames_of_a_different_size() {
        assert!(info(1).check_frame(&RgbImage::new(4, 4)).is_ok());
        assert!(matches!(
            info(1).check_frame(&RgbImage::new(4, 5)),
            Err(SteganoError::UnsupportedCarrierFormat(_))
        ));
    }

    #[test]
    fn should_stream_units_across_frames() {
        let first = RgbImage::from_raw(1, 1, vec![1, 0, 1]).unwrap();
        let second = RgbImage::from_raw(1, 1, vec![0, 1, 0]).unwrap();
        let mut third = RgbImage::from_raw(1, 1, vec![0, 0, 1]).unwrap();
        third.set_unit(0, BitsPerUnit::One, 1);
        let mut source = MemorySource::new(vec![first, second, third], "1/1").unwrap();
        let progress = Progress::default();

        let mut units = FrameUnits::new(&mut source, BitsPerUnit::One, &progress);
        let mut byte = [0u8; 1];
        UniversalDecoder::new(&mut units, BitsPerUnit::One)
            .read_exact(&mut byte)
            .unwrap();

        assert_eq!(byte[0], 0b101_010_10);
        assert_eq!(units.frames_read(), 3);
        assert!(units.take_error().is_none());
    }

    #[test]
    fn should_keep_the_error_of_a_cancelled_stream() {
        let flag = crate::progress::CancelFlag::new();
        flag.cancel();
        let progress = Progress::new().with_cancel_flag(flag);
        let mut source = MemorySource::new(vec![RgbImage::new(2, 2)], "1/1").unwrap();

        let mut units = FrameUnits::new(&mut source, BitsPerUnit::One, &progress);

        assert!(units.next().unwrap().is_err());
        assert!(matches!(units.take_error(), Some(SteganoError::Cancelled)));
    }
}
