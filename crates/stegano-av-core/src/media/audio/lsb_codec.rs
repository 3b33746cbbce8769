use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::AudioCarrier;
use crate::media::payload::{Frame, FrameLayout, PayloadCipher, XorCipher, LENGTH_PREFIX_BITS};
use crate::media::{discard_partial_output, AudioCodecOptions, BitsPerUnit, Capacity, Carrier};
use crate::result::Result;
use crate::universal_decoder::UniversalDecoder;
use crate::universal_encoder::UniversalEncoder;
use crate::SteganoError;

/// file name used when audio is unveiled into a folder, audio frames carry no name
pub const AUDIO_UNVEIL_FILE_NAME: &str = "secret-data.bin";

const CHUNK_SIZE: usize = 4096;

/// LSB codec for PCM audio with `Simple` framing
#[derive(Debug, Default)]
pub struct LsbCodec {
    options: AudioCodecOptions,
}

impl LsbCodec {
    pub fn new(options: AudioCodecOptions) -> Self {
        Self { options }
    }

    /// builds a LSB Audio Decoder that implements Read
    pub fn decoder<'i>(input: &'i [i16], bits: BitsPerUnit) -> Box<dyn Read + 'i> {
        Box::new(UniversalDecoder::from_carrier(input, bits))
    }

    /// builds a LSB Audio Encoder that implements Write
    pub fn encoder<'i>(input: &'i mut [i16], bits: BitsPerUnit) -> Box<dyn Write + 'i> {
        Box::new(UniversalEncoder::new(input, bits))
    }

    pub fn capacity<C: Carrier + ?Sized>(&self, carrier: &C) -> Capacity {
        Capacity::new(carrier.unit_count() as u64, self.options.bits_per_unit)
    }

    fn cipher(&self) -> Option<XorCipher> {
        self.options
            .password
            .as_ref()
            .as_deref()
            .and_then(XorCipher::new)
    }

    /// Hides `payload` in a copy of `carrier` and returns that copy.
    ///
    /// The capacity is checked before the copy is touched, `carrier` itself is never modified.
    pub fn encode<C: Carrier + Clone>(&self, carrier: &C, payload: &[u8]) -> Result<C> {
        if payload.is_empty() {
            return Err(SteganoError::MissingPayload);
        }
        let bits = self.options.bits_per_unit;
        self.capacity(carrier)
            .ensure_fits(payload.len() as u64, LENGTH_PREFIX_BITS)?;

        let sealed = match self.cipher() {
            Some(cipher) => cipher.seal(payload),
            None => payload.to_vec(),
        };
        let data = Frame::simple(sealed).to_bytes()?;

        let progress = &self.options.progress;
        let total = data.len() as u64;
        let mut scratch = carrier.clone();
        {
            let mut encoder = UniversalEncoder::new(&mut scratch, bits);
            let mut done = 0;
            for chunk in data.chunks(CHUNK_SIZE) {
                progress.checkpoint()?;
                encoder
                    .write_all(chunk)
                    .map_err(|_e| SteganoError::AudioEncodingError)?;
                done += chunk.len() as u64;
                progress.report(done, total);
            }
            debug!("hid {total} bytes in {} units", encoder.position());
        }

        Ok(scratch)
    }

    /// Unveils the payload hidden by [`LsbCodec::encode`].
    pub fn decode<C: Carrier + ?Sized>(&self, carrier: &C) -> Result<Vec<u8>> {
        let progress = &self.options.progress;
        progress.checkpoint()?;

        let capacity = self.capacity(carrier);
        let mut decoder = UniversalDecoder::from_carrier(carrier, self.options.bits_per_unit);
        let payload = Frame::read_from(&mut decoder, FrameLayout::Simple, capacity.bits())?
            .into_payload();
        progress.report(payload.len() as u64, payload.len() as u64);

        match self.cipher() {
            Some(cipher) => cipher.open(&payload),
            None => Ok(payload),
        }
    }

    /// Reads the WAV `carrier`, hides `payload` and writes the result to `output`.
    ///
    /// On failure a partially written `output` is removed again.
    pub fn hide_in_file(&self, carrier: &Path, payload: &[u8], output: &Path) -> Result<()> {
        let audio = AudioCarrier::open(carrier)?;
        let audio_with_secret = self.encode(&audio, payload)?;

        audio_with_secret.save_as(output).map_err(|e| {
            discard_partial_output(output);
            e
        })?;
        info!(
            "hid {} bytes in {:?}, written to {:?}",
            payload.len(),
            carrier,
            output
        );

        Ok(())
    }

    /// Unveils the payload of the WAV file `secret_media` into `destination`.
    ///
    /// If `destination` is a folder the payload is stored as [`AUDIO_UNVEIL_FILE_NAME`] in it.
    pub fn unveil_from_file(&self, secret_media: &Path, destination: &Path) -> Result<PathBuf> {
        let audio = AudioCarrier::open(secret_media)?;
        let payload = self.decode(&audio)?;

        let target = if destination.is_dir() {
            destination.join(AUDIO_UNVEIL_FILE_NAME)
        } else {
            destination.to_path_buf()
        };
        fs::write(&target, &payload).map_err(|source| SteganoError::WriteError { source })?;
        info!("unveiled {} bytes into {:?}", payload.len(), target);

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use proptest::prelude::*;
    use tempfile::TempDir;

    use super::super::pcm::tests::spec;
    use super::*;
    use crate::progress::{CancelFlag, Progress};

    fn codec(bits: BitsPerUnit) -> LsbCodec {
        LsbCodec::new(AudioCodecOptions::default().with_bits_per_unit(bits))
    }

    /// a quiet sine-ish ramp, enough to not be all zeros
    fn stereo_16bit(samples_per_channel: usize) -> AudioCarrier {
        let samples = (0..samples_per_channel * 2)
            .map(|i| ((i as i32 * 37) % 2000 - 1000) as i16)
            .collect();
        AudioCarrier::from_samples(spec(2, 16), samples).unwrap()
    }

    #[test]
    fn should_reject_one_byte_in_ten_8bit_mono_samples() {
        let carrier = AudioCarrier::from_samples(spec(1, 8), vec![0; 10]).unwrap();

        match codec(BitsPerUnit::One).encode(&carrier, b"x") {
            Err(SteganoError::CapacityExceeded {
                required_bytes,
                available_bytes,
            }) => {
                assert_eq!(required_bytes, 1);
                assert_eq!(available_bytes, 0);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn should_hide_hello_in_2_channel_16bit_audio() {
        let carrier = stereo_16bit(1000);
        let codec = codec(BitsPerUnit::Two);
        assert_eq!(codec.capacity(&carrier).bits(), 4000);

        let with_secret = codec.encode(&carrier, b"hello").unwrap();

        assert_eq!(codec.decode(&with_secret).unwrap(), b"hello");
        assert_ne!(with_secret, carrier);
        assert_eq!(carrier, stereo_16bit(1000), "the input must stay untouched");
    }

    #[test]
    fn should_only_touch_the_low_bits() {
        let carrier = stereo_16bit(100);
        let with_secret = codec(BitsPerUnit::Two).encode(&carrier, b"hi").unwrap();

        for (before, after) in carrier.samples().iter().zip(with_secret.samples()) {
            assert_eq!(before & !0b11, after & !0b11);
        }
    }

    #[test]
    fn should_fill_the_capacity_exactly_but_not_one_byte_more() {
        // 36 units * 2 bits = 32 bits length + 5 bytes
        let carrier: Vec<i16> = vec![7; 36];
        let codec = codec(BitsPerUnit::Two);

        let with_secret = codec.encode(&carrier, b"12345").unwrap();
        assert_eq!(codec.decode(&with_secret).unwrap(), b"12345");

        assert!(matches!(
            codec.encode(&carrier, b"123456"),
            Err(SteganoError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn should_round_trip_with_password() {
        let carrier = stereo_16bit(500);
        let protected = LsbCodec::new(AudioCodecOptions::default().with_password("Secret42"));

        let with_secret = protected.encode(&carrier, b"attack at dawn").unwrap();

        assert_eq!(protected.decode(&with_secret).unwrap(), b"attack at dawn");
        assert_ne!(
            codec(BitsPerUnit::One).decode(&with_secret).unwrap(),
            b"attack at dawn",
            "without the password the payload stays obfuscated"
        );
    }

    #[test]
    fn should_report_silence_as_no_hidden_data() {
        let silence = AudioCarrier::from_samples(spec(1, 16), vec![0; 256]).unwrap();

        assert!(matches!(
            codec(BitsPerUnit::One).decode(&silence),
            Err(SteganoError::NoHiddenData)
        ));
    }

    #[test]
    fn should_report_a_length_beyond_the_carrier_as_corrupt() {
        // all lsb set, the length field reads 0xffffffff
        let noise: Vec<i16> = vec![1; 256];

        assert!(matches!(
            codec(BitsPerUnit::One).decode(&noise),
            Err(SteganoError::CorruptContainer(_))
        ));
    }

    #[test]
    fn should_refuse_empty_payloads() {
        assert!(matches!(
            codec(BitsPerUnit::One).encode(&stereo_16bit(100), b""),
            Err(SteganoError::MissingPayload)
        ));
    }

    #[test]
    fn should_report_progress_and_honour_cancel() {
        let seen = Arc::new(AtomicU64::new(0));
        let seen_in_cb = seen.clone();
        let progress = Progress::new().with_callback(move |done, _| {
            seen_in_cb.store(done, Ordering::Relaxed);
        });
        let codec = LsbCodec::new(AudioCodecOptions::default().with_progress(progress));

        codec.encode(&stereo_16bit(200), b"tick").unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 8);

        let flag = CancelFlag::new();
        flag.cancel();
        let codec =
            LsbCodec::new(AudioCodecOptions::default().with_progress(Progress::new().with_cancel_flag(flag)));
        assert!(matches!(
            codec.encode(&stereo_16bit(200), b"tick"),
            Err(SteganoError::Cancelled)
        ));
    }

    #[test]
    fn should_hide_and_unveil_through_wav_files() -> Result<()> {
        let out_dir = TempDir::new()?;
        let plain = out_dir.path().join("plain.wav");
        let secret = out_dir.path().join("secret.wav");
        stereo_16bit(2000).save_as(&plain)?;

        let codec = LsbCodec::new(
            AudioCodecOptions::default()
                .with_bits_per_unit(BitsPerUnit::Two)
                .with_password("pw"),
        );
        codec.hide_in_file(&plain, b"The answer is 42", &secret)?;
        let unveiled = codec.unveil_from_file(&secret, out_dir.path())?;

        assert_eq!(unveiled, out_dir.path().join(AUDIO_UNVEIL_FILE_NAME));
        assert_eq!(fs::read(unveiled)?, b"The answer is 42");

        Ok(())
    }

    #[test]
    fn should_not_leave_an_output_file_when_the_payload_does_not_fit() -> Result<()> {
        let out_dir = TempDir::new()?;
        let plain = out_dir.path().join("tiny.wav");
        let secret = out_dir.path().join("secret.wav");
        AudioCarrier::from_samples(spec(1, 8), vec![3; 40])?.save_as(&plain)?;

        let result = codec(BitsPerUnit::One).hide_in_file(&plain, b"too long", &secret);

        assert!(matches!(result, Err(SteganoError::CapacityExceeded { .. })));
        assert!(!secret.exists());

        Ok(())
    }

    #[test]
    fn should_work_with_boxed_encoder_and_decoder() {
        let mut samples: Vec<i16> = vec![0; 64];
        LsbCodec::encoder(&mut samples, BitsPerUnit::One)
            .write_all(b"Hi")
            .expect("Cannot write to codec");

        let mut buf = [0u8; 2];
        LsbCodec::decoder(&samples, BitsPerUnit::One)
            .read_exact(&mut buf)
            .expect("Cannot read 2 bytes from codec");

        assert_eq!(&buf, b"Hi");
    }

    proptest! {
        #[test]
        fn decode_reverses_encode(
            payload in proptest::collection::vec(any::<u8>(), 1..64),
            two_bits in any::<bool>(),
            password in proptest::option::of("[a-z]{1,8}"),
        ) {
            let bits = if two_bits { BitsPerUnit::Two } else { BitsPerUnit::One };
            let codec = LsbCodec::new(
                AudioCodecOptions::default()
                    .with_bits_per_unit(bits)
                    .with_password(password),
            );
            let carrier: Vec<i16> = (0..1024).map(|i| (i * 31 - 15_000) as i16).collect();

            let with_secret = codec.encode(&carrier, &payload).unwrap();

            prop_assert_eq!(codec.decode(&with_secret).unwrap(), payload);
        }
    }
}
