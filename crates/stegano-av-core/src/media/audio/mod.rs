pub mod lsb_codec;
mod pcm;

pub use lsb_codec::{LsbCodec, AUDIO_UNVEIL_FILE_NAME};
pub use pcm::{AudioCarrier, SampleWidth};
