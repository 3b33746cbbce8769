mod ffmpeg;
mod frames;
pub mod lsb_codec;
mod memory;
mod png_sequence;

pub use ffmpeg::{ffmpeg_available, probe, FfmpegSink, FfmpegSource};
pub use frames::{FrameSink, FrameSource, FrameUnits, VideoInfo, VideoInput, VideoOutput, CHANNELS};
pub use lsb_codec::LsbCodec;
pub use memory::{MemorySink, MemorySource};
pub use png_sequence::{PngSequenceSink, PngSequenceSource, DEFAULT_FRAME_RATE};
