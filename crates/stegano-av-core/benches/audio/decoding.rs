use std::io::{Read, Write};

use criterion::{criterion_group, criterion_main, Criterion};
use stegano_av_core::media::audio::LsbCodec;
use stegano_av_core::media::BitsPerUnit;

pub fn audio_decoding(c: &mut Criterion) {
    let mut samples: Vec<i16> = (0..44_100).map(|i| ((i * 7) % 30_000) as i16).collect();
    LsbCodec::encoder(&mut samples, BitsPerUnit::One)
        .write_all(b"Hello World!")
        .expect("Cannot write to codec");

    for bits in [BitsPerUnit::One, BitsPerUnit::Two] {
        c.bench_function(&format!("Audio Decoding {bits:?}"), |b| {
            let mut buf = [0; 12];

            b.iter(|| {
                LsbCodec::decoder(&samples, bits)
                    .read_exact(&mut buf)
                    .expect("Cannot read 12 bytes from decoder");
            })
        });
    }
}

criterion_group!(benches, audio_decoding);
criterion_main!(benches);
