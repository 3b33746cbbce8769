use std::collections::VecDeque;

use image::RgbImage;

use super::frames::{FrameSink, FrameSource, VideoInfo};
use crate::result::Result;
use crate::SteganoError;

/// Frames held in memory, mostly useful for tests and for callers that decode video themselves.
#[derive(Debug)]
pub struct MemorySource {
    info: VideoInfo,
    frames: VecDeque<RgbImage>,
}

impl MemorySource {
    /// All frames must share the size of the first one.
    pub fn new<S: Into<String>>(frames: Vec<RgbImage>, frame_rate: S) -> Result<Self> {
        let (width, height) = frames.first().map(|f| f.dimensions()).unwrap_or((0, 0));
        let info = VideoInfo {
            width,
            height,
            frame_count: frames.len() as u64,
            frame_rate: frame_rate.into(),
        };
        for frame in frames.iter() {
            info.check_frame(frame)?;
        }

        Ok(Self {
            info,
            frames: frames.into(),
        })
    }
}

impl FrameSource for MemorySource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        Ok(self.frames.pop_front())
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    frames: Vec<RgbImage>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[RgbImage] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_frames(self) -> Vec<RgbImage> {
        self.frames
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        if self.finished {
            return Err(SteganoError::VideoPipeline(
                "frame written after the sink was finished".to_string(),
            ));
        }
        self.frames.push(frame.clone());

        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_hand_out_frames_in_order() {
        let frames = vec![
            RgbImage::from_pixel(2, 1, image::Rgb([1, 1, 1])),
            RgbImage::from_pixel(2, 1, image::Rgb([2, 2, 2])),
        ];
        let mut source = MemorySource::new(frames, "25/1").unwrap();

        assert_eq!(source.info().frame_count, 2);
        assert_eq!(source.next_frame().unwrap().unwrap().get_pixel(0, 0).0, [1, 1, 1]);
        assert_eq!(source.next_frame().unwrap().unwrap().get_pixel(0, 0).0, [2, 2, 2]);
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn should_reject_frames_of_mixed_size() {
        let frames = vec![RgbImage::new(2, 2), RgbImage::new(3, 2)];

        assert!(MemorySource::new(frames, "25/1").is_err());
    }

    #[test]
    fn should_refuse_frames_after_finish() {
        let mut sink = MemorySink::new();
        sink.write_frame(&RgbImage::new(1, 1)).unwrap();
        sink.finish().unwrap();

        assert!(sink.write_frame(&RgbImage::new(1, 1)).is_err());
        assert_eq!(sink.into_frames().len(), 1);
    }
}
