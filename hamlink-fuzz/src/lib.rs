//! Fuzzing entry points for hamlink-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_decode

use hamlink_core::decoder::{correct_frame, decode_frames};
use hamlink_core::{ForwardErrorCorrection, Frame, HammingCodec};

/// Interpret input as: 2-byte LE payload length, then LE codewords.
pub fn fuzz_decode(data: &[u8]) {
    if data.len() < 2 {
        return;
    }
    let payload_len = u16::from_le_bytes([data[0], data[1]]) as usize;
    let frames: Vec<Frame> = data[2..]
        .chunks_exact(2)
        .map(|c| Frame::new(u16::from_le_bytes([c[0], c[1]])))
        .collect();

    // Arbitrary frames and lengths must error, never panic
    if let Ok((payload, _)) = decode_frames(&frames, payload_len) {
        assert_eq!(payload.len(), payload_len);
    }
}

/// Every 15-bit word corrects to a zero-syndrome codeword or is reported.
pub fn fuzz_correct(data: &[u8]) {
    for c in data.chunks_exact(2) {
        let word = u16::from_le_bytes([c[0], c[1]]) & 0x7FFF;
        let _ = correct_frame(Frame::new(word));
    }
}

/// Clean round trip for any payload the codec accepts.
pub fn fuzz_round_trip(data: &[u8]) {
    let codec = HammingCodec::default();
    let Ok(frames) = codec.encode(data) else {
        return;
    };
    let decoded = codec.correct_and_decode(&frames, data.len());
    assert_eq!(decoded.ok().as_deref(), Some(data));
}
