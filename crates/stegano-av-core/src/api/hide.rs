use std::fs;
use std::path::{Path, PathBuf};

use log::error;

use super::shared::{ensure_exists, MESSAGE_FILE_NAME};
use super::Password;
use crate::media::{audio, video, AudioCodecOptions, BitsPerUnit, MediaKind, VideoCodecOptions};
use crate::progress::Progress;
use crate::result::Result;
use crate::SteganoError;

pub fn prepare() -> HideApi {
    HideApi::default()
}

/// Hides either a text message or a single file in a WAV or video carrier.
#[derive(Default, Debug)]
pub struct HideApi {
    message: Option<String>,
    file: Option<PathBuf>,
    carrier: Option<PathBuf>,
    output: Option<PathBuf>,
    password: Password,
    bits_per_unit: BitsPerUnit,
    progress: Progress,
}

impl HideApi {
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn use_message<S: AsRef<str>>(mut self, message: Option<S>) -> Self {
        self.message = message.map(|s| s.as_ref().to_string());
        self
    }

    /// The file's content is hidden, videos also keep its name
    pub fn with_file<A: AsRef<Path>>(mut self, data_file: A) -> Self {
        self.file = Some(data_file.as_ref().to_path_buf());
        self
    }

    pub fn use_file(mut self, data_file: Option<PathBuf>) -> Self {
        self.file = data_file;
        self
    }

    /// WAV audio, a video file or a directory of PNG frames, used readonly
    pub fn with_carrier<A: AsRef<Path>>(mut self, carrier: A) -> Self {
        self.carrier = Some(carrier.as_ref().to_path_buf());
        self
    }

    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// Set the password, only audio carriers support one.
    /// If `None` is passed, no password will be used
    pub fn using_password<P: Into<Password>>(mut self, password: P) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_bits_per_unit(mut self, bits_per_unit: BitsPerUnit) -> Self {
        self.bits_per_unit = bits_per_unit;
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn execute(self) -> Result<()> {
        self.validate()?;
        let Some(carrier) = self.carrier else {
            return Err(SteganoError::CarrierNotSet);
        };
        let Some(output) = self.output else {
            return Err(SteganoError::TargetNotSet);
        };
        ensure_exists(&carrier)?;

        let (name, payload) = match (self.message, self.file) {
            (Some(message), None) => (MESSAGE_FILE_NAME.to_string(), message.into_bytes()),
            (None, Some(file)) => read_payload_file(&file)?,
            _ => return Err(SteganoError::MissingPayload),
        };

        let kind = MediaKind::from_path(&carrier)?;
        kind.output_kind(&output)?;
        if kind.is_video() {
            if self.password.is_set() {
                return Err(SteganoError::UnsupportedOption(
                    "passwords are only supported for audio carriers".to_string(),
                ));
            }
            let options = VideoCodecOptions::default()
                .with_bits_per_unit(self.bits_per_unit)
                .with_progress(self.progress);

            video::LsbCodec::new(options).hide_in_file(&carrier, &name, &payload, &output)
        } else {
            let options = AudioCodecOptions::default()
                .with_bits_per_unit(self.bits_per_unit)
                .with_password(self.password)
                .with_progress(self.progress);

            audio::LsbCodec::new(options).hide_in_file(&carrier, &payload, &output)
        }
    }

    fn validate(&self) -> Result<()> {
        match (&self.message, &self.file) {
            (None, None) => Err(SteganoError::MissingPayload),
            (Some(_), Some(_)) => Err(SteganoError::UnsupportedOption(
                "either a message or a file can be hidden, not both".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn read_payload_file(file: &Path) -> Result<(String, Vec<u8>)> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(SteganoError::InvalidFileName)?
        .to_string();
    let payload = fs::read(file).map_err(|source| {
        error!("Error reading payload file {file:?}: {source}");
        SteganoError::ReadError { source }
    })?;

    Ok((name, payload))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::media::audio::AudioCarrier;
    use crate::media::{SampleFormat, WavSpec};

    fn write_carrier(path: &Path) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        AudioCarrier::from_samples(spec, vec![100; 4_000])
            .unwrap()
            .save_as(path)
            .unwrap();
    }

    #[test]
    fn illustrate_api_usage() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let carrier = temp_dir.path().join("carrier.wav");
        write_carrier(&carrier);

        crate::api::hide::prepare()
            .with_message("Hello, World!")
            .with_carrier(&carrier)
            .using_password("SuperSecret42")
            .with_output(temp_dir.path().join("audio-with-secret.wav"))
            .execute()
            .expect("Failed to hide message in audio");
    }

    #[test]
    fn should_require_exactly_one_payload() {
        assert!(matches!(
            prepare().with_carrier("a.wav").with_output("b.wav").execute(),
            Err(SteganoError::MissingPayload)
        ));
        assert!(matches!(
            prepare()
                .with_message("a")
                .with_file("Cargo.toml")
                .with_carrier("a.wav")
                .with_output("b.wav")
                .execute(),
            Err(SteganoError::UnsupportedOption(_))
        ));
    }

    #[test]
    fn should_require_carrier_and_output() {
        assert!(matches!(
            prepare().with_message("a").with_output("b.wav").execute(),
            Err(SteganoError::CarrierNotSet)
        ));
        assert!(matches!(
            prepare().with_message("a").with_carrier("a.wav").execute(),
            Err(SteganoError::TargetNotSet)
        ));
        assert!(matches!(
            prepare()
                .with_message("a")
                .with_carrier("missing.wav")
                .with_output("b.wav")
                .execute(),
            Err(SteganoError::CarrierNotFound(_))
        ));
    }

    #[test]
    fn should_reject_a_password_for_video() {
        let temp_dir = tempdir().unwrap();
        let frames = temp_dir.path().join("frames");
        fs::create_dir(&frames).unwrap();

        let result = prepare()
            .with_message("a")
            .with_carrier(&frames)
            .using_password("pw")
            .with_output(temp_dir.path().join("out.mkv"))
            .execute();

        assert!(matches!(result, Err(SteganoError::UnsupportedOption(_))));
    }

    #[test]
    fn should_reject_lossy_video_outputs() {
        let temp_dir = tempdir().unwrap();
        let frames = temp_dir.path().join("frames");
        fs::create_dir(&frames).unwrap();

        let result = prepare()
            .with_message("a")
            .with_carrier(&frames)
            .with_output(temp_dir.path().join("out.mp4"))
            .execute();

        assert!(matches!(result, Err(SteganoError::UnsupportedCarrierFormat(_))));
    }
}
