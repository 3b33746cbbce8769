use std::path::Path;

use crate::result::Result;
use crate::SteganoError;

/// extensions that can be read through the ffmpeg pipeline
const VIDEO_INPUT_EXTENSIONS: [&str; 8] = ["mkv", "avi", "nut", "mp4", "mov", "webm", "mpg", "mpeg"];

/// containers that can hold FFV1, the only lossless output codec used
const VIDEO_OUTPUT_EXTENSIONS: [&str; 3] = ["mkv", "avi", "nut"];

/// the kind of carrier media, derived from a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// a WAV file
    Audio,
    /// a video container decoded and encoded through ffmpeg
    Video,
    /// a directory of PNG frames
    VideoFrames,
}

impl MediaKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(MediaKind::VideoFrames);
        }

        match extension_of(path).as_deref() {
            Some("wav") => Ok(MediaKind::Audio),
            Some(ext) if VIDEO_INPUT_EXTENSIONS.contains(&ext) => Ok(MediaKind::Video),
            _ => Err(SteganoError::UnsupportedMedia),
        }
    }

    /// Derives the kind an output path must have for a carrier of this kind.
    ///
    /// Video outputs must be a lossless capable container, a path without
    /// extension is taken as a PNG frame directory.
    pub fn output_kind(self, output: &Path) -> Result<Self> {
        match self {
            MediaKind::Audio => match extension_of(output).as_deref() {
                Some("wav") => Ok(MediaKind::Audio),
                _ => Err(SteganoError::UnsupportedCarrierFormat(format!(
                    "audio can only be written as wav, got {output:?}"
                ))),
            },
            MediaKind::Video | MediaKind::VideoFrames => match extension_of(output).as_deref() {
                None => Ok(MediaKind::VideoFrames),
                Some(ext) if VIDEO_OUTPUT_EXTENSIONS.contains(&ext) => Ok(MediaKind::Video),
                Some(ext) => Err(SteganoError::UnsupportedCarrierFormat(format!(
                    "{ext} cannot hold lossless video, use one of {}",
                    VIDEO_OUTPUT_EXTENSIONS.join(", ")
                ))),
            },
        }
    }

    pub fn is_video(self) -> bool {
        !matches!(self, MediaKind::Audio)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
