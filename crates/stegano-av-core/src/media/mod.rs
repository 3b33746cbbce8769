pub mod audio;
mod capacity;
pub mod codec_options;
pub mod payload;
mod primitives;
mod types;
pub mod video;

use std::path::Path;

use log::warn;

pub use hound::{SampleFormat, WavSpec};

pub use capacity::*;
pub use codec_options::{
    AudioCodecOptions, BitsPerUnit, DigestPolicy, VideoCodecOptions,
};
pub use primitives::*;
pub use types::*;

/// Removes what a failed call managed to write, the output must never be mistaken as valid.
pub(crate) fn discard_partial_output(output: &Path) {
    let removed = if output.is_dir() {
        std::fs::remove_dir_all(output)
    } else {
        std::fs::remove_file(output)
    };
    if let Err(e) = removed {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove partial output {output:?}: {e}");
        }
    }
}
