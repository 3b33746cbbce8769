use std::path::{Path, PathBuf};

use super::shared::ensure_exists;
use super::Password;
use crate::media::{
    audio, video, AudioCodecOptions, BitsPerUnit, DigestPolicy, MediaKind, VideoCodecOptions,
};
use crate::progress::Progress;
use crate::result::Result;
use crate::SteganoError;

pub fn prepare() -> UnveilApi {
    UnveilApi::default()
}

#[derive(Default, Debug)]
pub struct UnveilApi {
    secret_media: Option<PathBuf>,
    destination: Option<PathBuf>,
    password: Password,
    bits_per_unit: BitsPerUnit,
    digest_policy: DigestPolicy,
    progress: Progress,
}

impl UnveilApi {
    /// This is the secret audio or video that contains the data to be unveiled
    pub fn from_secret_file(mut self, secret_media: impl AsRef<Path>) -> Self {
        self.secret_media = Some(secret_media.as_ref().to_path_buf());
        self
    }

    /// A folder, or the file the payload is written to.
    ///
    /// In a folder audio payloads are named `secret-data.bin`, video payloads
    /// keep the name they were hidden with.
    pub fn into_destination(mut self, destination: impl AsRef<Path>) -> Self {
        self.destination = Some(destination.as_ref().to_path_buf());
        self
    }

    /// Set the password that was used when hiding, audio only.
    /// If `None` is passed, no password will be used
    pub fn using_password<P: Into<Password>>(mut self, password: P) -> Self {
        self.password = password.into();
        self
    }

    /// must match the value used when hiding
    pub fn with_bits_per_unit(mut self, bits_per_unit: BitsPerUnit) -> Self {
        self.bits_per_unit = bits_per_unit;
        self
    }

    pub fn with_digest_policy(mut self, digest_policy: DigestPolicy) -> Self {
        self.digest_policy = digest_policy;
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Execute the unveil process and blocks until it is finished.
    /// Returns the path of the written payload.
    pub fn execute(self) -> Result<PathBuf> {
        let Some(secret_media) = self.secret_media else {
            return Err(SteganoError::CarrierNotSet);
        };
        let Some(destination) = self.destination else {
            return Err(SteganoError::TargetNotSet);
        };
        ensure_exists(&secret_media)?;

        if MediaKind::from_path(&secret_media)?.is_video() {
            if self.password.is_set() {
                return Err(SteganoError::UnsupportedOption(
                    "passwords are only supported for audio carriers".to_string(),
                ));
            }
            let options = VideoCodecOptions::default()
                .with_bits_per_unit(self.bits_per_unit)
                .with_digest_policy(self.digest_policy)
                .with_progress(self.progress);

            video::LsbCodec::new(options).unveil_from_file(&secret_media, &destination)
        } else {
            let options = AudioCodecOptions::default()
                .with_bits_per_unit(self.bits_per_unit)
                .with_password(self.password)
                .with_progress(self.progress);

            audio::LsbCodec::new(options).unveil_from_file(&secret_media, &destination)
        }
    }
}
