use std::io::Write;

use stegano_av_core::media::audio::{AudioCarrier, LsbCodec};
use stegano_av_core::media::payload::{Frame, FrameLayout};
use stegano_av_core::media::{AudioCodecOptions, BitsPerUnit, SampleFormat, WavSpec};
use stegano_av_core::universal_decoder::UniversalDecoder;
use stegano_av_core::universal_encoder::UniversalEncoder;

fn mono(bits_per_sample: u16, samples: usize) -> AudioCarrier {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8_000,
        bits_per_sample,
        sample_format: SampleFormat::Int,
    };
    AudioCarrier::from_samples(spec, vec![0; samples]).unwrap()
}

fn lsbs(carrier: &AudioCarrier, mask: i16) -> Vec<i16> {
    carrier.samples().iter().map(|s| s & mask).collect()
}

#[test]
fn simple_frame_is_a_big_endian_length_then_payload_msb_first() {
    let codec = LsbCodec::new(AudioCodecOptions::default());

    let with_secret = codec.encode(&mono(16, 64), b"A").unwrap();
    let bits = lsbs(&with_secret, 1);

    // length 1 as 32 bit big endian
    assert!(bits[..31].iter().all(|b| *b == 0));
    assert_eq!(bits[31], 1);
    // 'A' = 0b0100_0001
    assert_eq!(&bits[32..40], &[0, 1, 0, 0, 0, 0, 0, 1]);
    assert!(bits[40..].iter().all(|b| *b == 0));
}

#[test]
fn two_bits_per_unit_put_the_earlier_bit_high() {
    let codec = LsbCodec::new(AudioCodecOptions::default().with_bits_per_unit(BitsPerUnit::Two));

    let with_secret = codec.encode(&mono(8, 32), b"A").unwrap();
    let units = lsbs(&with_secret, 0b11);

    assert_eq!(&units[15..20], &[0b01, 0b01, 0b00, 0b00, 0b01]);
}

#[test]
fn rich_frame_can_be_read_from_any_carrier() {
    let frame = Frame::rich("report.pdf", b"%PDF".to_vec());
    let mut samples: Vec<u8> = vec![0x80; frame.required_bits().unwrap() as usize];
    UniversalEncoder::new(&mut samples, BitsPerUnit::One)
        .write_all(&frame.to_bytes().unwrap())
        .unwrap();

    let capacity_bits = samples.len() as u64;
    let mut decoder = UniversalDecoder::from_carrier(&samples, BitsPerUnit::One);
    let parsed = Frame::read_from(&mut decoder, FrameLayout::Rich, capacity_bits).unwrap();

    assert_eq!(parsed, frame);
    assert_eq!(parsed.header().unwrap().filename, "report.pdf");
}
