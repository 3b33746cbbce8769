//! Plain functions behind the command line interface.

use std::path::{Path, PathBuf};

use log::info;

use crate::api::{self, MESSAGE_FILE_NAME};
use crate::media::audio::{self, AudioCarrier};
use crate::media::payload::LENGTH_PREFIX_BITS;
use crate::media::video::{self, FrameSource, PngSequenceSource};
use crate::media::{AudioCodecOptions, BitsPerUnit, DigestPolicy, MediaKind, VideoCodecOptions};
use crate::result::Result;

/// How much a carrier can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityReport {
    pub kind: MediaKind,
    /// raw bits available in all units
    pub capacity_bits: u64,
    /// largest payload that fits after framing
    pub max_payload_bytes: u64,
}

pub fn hide(
    carrier: &Path,
    output: &Path,
    data_file: Option<PathBuf>,
    message: Option<String>,
    password: Option<String>,
    bits_per_unit: BitsPerUnit,
) -> Result<()> {
    api::hide::prepare()
        .with_carrier(carrier)
        .with_output(output)
        .use_file(data_file)
        .use_message(message)
        .using_password(password)
        .with_bits_per_unit(bits_per_unit)
        .execute()
}

pub fn unveil(
    secret_media: &Path,
    destination: &Path,
    password: Option<String>,
    bits_per_unit: BitsPerUnit,
    digest_policy: DigestPolicy,
) -> Result<PathBuf> {
    api::unveil::prepare()
        .from_secret_file(secret_media)
        .into_destination(destination)
        .using_password(password)
        .with_bits_per_unit(bits_per_unit)
        .with_digest_policy(digest_policy)
        .execute()
}

/// unveil all raw data, no framing interpretation is happening.
/// Just a raw binary dump of the data gathered by the LSB algorithm.
pub fn unveil_raw(secret_media: &Path, destination_file: &Path, bits_per_unit: BitsPerUnit) -> Result<()> {
    api::unveil_raw::prepare()
        .from_secret_file(secret_media)
        .into_raw_file(destination_file)
        .with_bits_per_unit(bits_per_unit)
        .execute()
}

/// Estimates the capacity of `carrier`.
///
/// For video the header overhead depends on the embedded file name, `file_name`
/// defaults to the name a text message is hidden under.
pub fn capacity(carrier: &Path, bits_per_unit: BitsPerUnit, file_name: Option<&str>) -> Result<CapacityReport> {
    api::ensure_exists(carrier)?;
    let kind = MediaKind::from_path(carrier)?;

    let report = match kind {
        MediaKind::Audio => {
            let audio = AudioCarrier::open(carrier)?;
            let codec = audio::LsbCodec::new(AudioCodecOptions::default().with_bits_per_unit(bits_per_unit));
            let capacity = codec.capacity(&audio);

            CapacityReport {
                kind,
                capacity_bits: capacity.bits(),
                max_payload_bytes: capacity.max_payload_bytes(LENGTH_PREFIX_BITS),
            }
        }
        MediaKind::Video | MediaKind::VideoFrames => {
            let info = if kind == MediaKind::Video {
                video::probe(carrier)?
            } else {
                PngSequenceSource::open(carrier)?.info().clone()
            };
            let codec = video::LsbCodec::new(VideoCodecOptions::default().with_bits_per_unit(bits_per_unit));

            CapacityReport {
                kind,
                capacity_bits: codec.capacity(&info).bits(),
                max_payload_bytes: codec.max_payload_bytes(&info, file_name.unwrap_or(MESSAGE_FILE_NAME))?,
            }
        }
    };
    info!("capacity of {carrier:?}: {report:?}");

    Ok(report)
}
