use std::io::Write;

use criterion::{criterion_group, criterion_main, Criterion};
use stegano_av_core::media::audio::{AudioCarrier, LsbCodec};
use stegano_av_core::media::{AudioCodecOptions, BitsPerUnit, SampleFormat, WavSpec};

pub fn audio_encoding(c: &mut Criterion) {
    let samples: Vec<i16> = (0..88_200).map(|i| ((i * 13) % 20_000) as i16).collect();
    let secret_message = b"Hello World!";

    c.bench_function("Audio Encoding to memory", |b| {
        let mut samples = samples.clone();

        b.iter(|| {
            LsbCodec::encoder(&mut samples, BitsPerUnit::One)
                .write_all(&secret_message[..])
                .expect("Cannot write to codec");
        })
    });

    c.bench_function("Audio Encoding with framing and password", |b| {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let carrier = AudioCarrier::from_samples(spec, samples.clone()).expect("Cannot create carrier");
        let codec = LsbCodec::new(
            AudioCodecOptions::default()
                .with_bits_per_unit(BitsPerUnit::Two)
                .with_password("Secret42"),
        );
        let payload = vec![42u8; 8 * 1024];

        b.iter(|| codec.encode(&carrier, &payload).expect("Cannot encode"))
    });
}

criterion_group!(benches, audio_encoding);
criterion_main!(benches);
