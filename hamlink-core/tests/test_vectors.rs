//! Fixed Hamming(15,11) codeword vectors
//!
//! Words are written with codeword position 1 in bit 0. Any change to the
//! bit-packing convention shows up here first.

use hamlink_core::{
    decoder::{correct_frame, extract_data, syndrome, Correction},
    encoder::encode_group,
    fec::{ForwardErrorCorrection, HammingCodec},
    types::Frame,
};

/// (payload, expected codewords)
const VECTORS: &[(&[u8], &[u16])] = &[
    (b"\x00", &[0x0000]),
    (b"\x80", &[0x0007]),
    (b"\xff", &[0x0F77]),
    (b"\xab\xcd", &[0x3DA4, 0x01B2]),
    (b"Hi", &[0x6199, 0x0198]),
    (
        b"hamming",
        &[0x61B3, 0x6D8B, 0x2D52, 0x34D5, 0x6634, 0x0007],
    ),
    (
        b"\x00\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a",
        &[0x0000, 0x0181, 0x3004, 0x0181, 0x6053, 0x1C82, 0x40A1, 0x2828],
    ),
    (
        b"\xff\xff\xff\xff\xff\xff\xff\xff\xff\xff\xff",
        &[0x7FFF, 0x7FFF, 0x7FFF, 0x7FFF, 0x7FFF, 0x7FFF, 0x7FFF, 0x7FFF],
    ),
];

#[test]
fn vectors_encode_to_expected_words() {
    let codec = HammingCodec::default();
    for (payload, words) in VECTORS {
        let frames = codec.encode(payload).unwrap();
        let actual: Vec<u16> = frames.iter().map(Frame::word).collect();
        assert_eq!(&actual[..], *words, "payload {:02x?}", payload);
    }
}

#[test]
fn vectors_decode_to_original_payload() {
    let codec = HammingCodec::default();
    for (payload, words) in VECTORS {
        let frames: Vec<Frame> = words.iter().copied().map(Frame::new).collect();
        let decoded = codec.correct_and_decode(&frames, payload.len()).unwrap();
        assert_eq!(&decoded[..], *payload);
    }
}

#[test]
fn group_vectors() {
    assert_eq!(encode_group(0x7FF), Frame::new(0x7FFF));
    assert_eq!(encode_group(0x400), Frame::new(0x0007));
    assert_eq!(encode_group(0x001), Frame::new(0x408B));
    assert_eq!(extract_data(Frame::new(0x408B)), 0x001);
}

#[test]
fn known_flip_is_located() {
    // Flip codeword position 11 (bit 10) of the 0xFF frame
    let damaged = Frame::new(0x0F77 ^ (1 << 10));
    assert_eq!(syndrome(damaged), 11);
    assert_eq!(
        correct_frame(damaged),
        (Frame::new(0x0F77), Correction::Corrected(11))
    );
}

#[test]
fn double_flip_is_miscorrected() {
    // Two flips at positions 1 and 2 look like a single flip at position 3
    let clean = Frame::new(0x0000);
    let damaged = clean.with_flipped_bit(0).with_flipped_bit(1);
    assert_eq!(syndrome(damaged), 3);
    let (fixed, _) = correct_frame(damaged);
    assert_ne!(fixed, clean);
    assert_eq!(fixed.word(), 0x0007);
}
