use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageFormat, RgbImage};
use log::{debug, error};

use super::frames::{FrameSink, FrameSource, VideoInfo};
use crate::result::Result;
use crate::SteganoError;

/// a frame directory carries no timing, this is what the ffmpeg backend gets instead
pub const DEFAULT_FRAME_RATE: &str = "25/1";

/// Reads a directory of `*.png` frames, ordered by file name.
#[derive(Debug)]
pub struct PngSequenceSource {
    info: VideoInfo,
    files: std::vec::IntoIter<PathBuf>,
}

impl PngSequenceSource {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SteganoError::CarrierNotFound(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|source| SteganoError::ReadError { source })? {
            let path = entry.map_err(|source| SteganoError::ReadError { source })?.path();
            let is_png = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false);
            if is_png && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let (width, height) = match files.first() {
            Some(first) => image::image_dimensions(first)?,
            None => {
                return Err(SteganoError::UnsupportedCarrierFormat(format!(
                    "no png frames in {dir:?}"
                )))
            }
        };
        let info = VideoInfo {
            width,
            height,
            frame_count: files.len() as u64,
            frame_rate: DEFAULT_FRAME_RATE.to_string(),
        };
        debug!("png sequence {dir:?}: {info:?}");

        Ok(Self {
            info,
            files: files.into_iter(),
        })
    }
}

impl FrameSource for PngSequenceSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.files.next() else {
            return Ok(None);
        };
        let frame = image::open(&path)?.to_rgb8();
        self.info.check_frame(&frame)?;

        Ok(Some(frame))
    }
}

/// Writes frames as `frame_000000.png`, `frame_000001.png`, ... into a fresh directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: u64,
}

impl PngSequenceSink {
    /// The directory is created; an existing one must be empty.
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if dir.is_file() {
            return Err(SteganoError::UnsupportedCarrierFormat(format!(
                "{dir:?} is a file, frames need a directory"
            )));
        }
        if dir.is_dir() {
            let mut entries = fs::read_dir(dir).map_err(|source| SteganoError::ReadError { source })?;
            if entries.next().is_some() {
                return Err(SteganoError::UnsupportedCarrierFormat(format!(
                    "frame directory {dir:?} is not empty"
                )));
            }
        }
        fs::create_dir_all(dir).map_err(|e| {
            error!("Error creating directory {dir:?}: {e}");
            SteganoError::WriteError { source: e }
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            written: 0,
        })
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl FrameSink for PngSequenceSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        let path = self.frame_path(self.written);
        frame
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| {
                error!("Error writing frame {path:?}: {e}");
                match e {
                    ImageError::IoError(source) => SteganoError::WriteError { source },
                    other => SteganoError::VideoPipeline(other.to_string()),
                }
            })?;
        self.written += 1;

        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        debug!("wrote {} frames to {:?}", self.written, self.dir);

        Ok(())
    }
}
