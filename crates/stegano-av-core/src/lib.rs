//! # Stegano AV Core
//!
//! Hides arbitrary bytes in the least significant bits of WAV audio samples
//! and of the color channels of video frames, and gets them back out.
//!
//! - audio carriers use a `Simple` frame: a 32bit big endian length, then the payload
//! - video carriers use a `Rich` frame: a 32bit big endian header length, a JSON
//!   header `{filename, size, digest}`, then the payload
//!
//! Video is re-encoded losslessly (FFV1 through `ffmpeg`, or a directory of PNG
//! frames), any lossy step would destroy the hidden bits.
//!
//! # Usage Examples
//!
//! ## Hide a message inside audio
//!
//! ```rust
//! use stegano_av_core::media::audio::AudioCarrier;
//! use stegano_av_core::media::{BitsPerUnit, SampleFormat, WavSpec};
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//! let carrier = temp_dir.path().join("carrier.wav");
//! let spec = WavSpec {
//!     channels: 2,
//!     sample_rate: 44_100,
//!     bits_per_sample: 16,
//!     sample_format: SampleFormat::Int,
//! };
//! AudioCarrier::from_samples(spec, vec![0; 4_000])
//!     .and_then(|audio| audio.save_as(&carrier))
//!     .expect("Failed to write carrier");
//!
//! stegano_av_core::api::hide::prepare()
//!     .with_message("Hello, World!")  // will hide this message inside the audio
//!     .using_password("SuperSecret42") // will obfuscate the data with this password
//!     .with_bits_per_unit(BitsPerUnit::Two)
//!     .with_carrier(&carrier)
//!     .with_output(temp_dir.path().join("audio-with-a-secret.wav"))
//!     .execute()
//!     .expect("Failed to hide message in audio");
//! ```
//!
//! ## Unveil data from audio
//!
//! ```rust
//! # use stegano_av_core::media::audio::AudioCarrier;
//! # use stegano_av_core::media::{SampleFormat, WavSpec};
//! # use tempfile::tempdir;
//! # let temp_dir = tempdir().expect("Failed to create temporary directory");
//! # let secret = temp_dir.path().join("secret.wav");
//! # let spec = WavSpec { channels: 1, sample_rate: 8_000, bits_per_sample: 16, sample_format: SampleFormat::Int };
//! # AudioCarrier::from_samples(spec, vec![0; 1_000]).and_then(|a| a.save_as(temp_dir.path().join("c.wav"))).unwrap();
//! # stegano_av_core::api::hide::prepare().with_message("Hi").with_carrier(temp_dir.path().join("c.wav")).with_output(&secret).execute().unwrap();
//! let unveiled = stegano_av_core::api::unveil::prepare()
//!     .from_secret_file(&secret)
//!     .into_destination(temp_dir.path())
//!     .execute()
//!     .expect("Failed to unveil message from audio");
//!
//! assert_eq!(std::fs::read(unveiled).unwrap(), b"Hi");
//! ```

pub mod api;
pub mod commands;
pub mod error;
pub mod media;
pub mod progress;
pub mod result;
pub mod universal_decoder;
pub mod universal_encoder;

pub use crate::error::SteganoError;
pub use crate::media::{BitsPerUnit, DigestPolicy, MediaKind};
pub use crate::progress::{CancelFlag, Progress};
pub use crate::result::Result;
