//! Payload encoding into Hamming(15,11) frames

use crate::constants::{frames_for_len, DATA_BITS, DATA_POSITIONS, PARITY_POSITIONS};
use crate::decoder::syndrome;
use crate::error::CodecError;
use crate::types::Frame;
use alloc::vec::Vec;
use bitvec::prelude::*;

#[cfg(feature = "logging")]
use tracing::trace;

/// Encode a payload into frames
///
/// The payload is read as a bit stream, most significant bit of each byte
/// first. Every consecutive group of 11 bits becomes one frame; the last
/// group is zero-padded on the right. Frames are returned in payload order.
///
/// Fails if the payload is empty or longer than `max_payload` bytes.
pub fn encode_payload(payload: &[u8], max_payload: usize) -> Result<Vec<Frame>, CodecError> {
    if payload.is_empty() {
        return Err(CodecError::EmptyPayload);
    }
    if payload.len() > max_payload {
        return Err(CodecError::PayloadTooLarge(payload.len(), max_payload));
    }

    let bits = payload.view_bits::<Msb0>();
    let mut frames = Vec::with_capacity(frames_for_len(payload.len()));

    for group in bits.chunks(DATA_BITS) {
        // Left-align a short final group so the padding lands on the right
        let mut data = 0u16;
        for bit in group.iter().by_vals() {
            data = (data << 1) | u16::from(bit);
        }
        data <<= DATA_BITS - group.len();

        frames.push(encode_group(data));
    }

    #[cfg(feature = "logging")]
    trace!(
        "Encoded {} bytes into {} frames",
        payload.len(),
        frames.len()
    );

    Ok(frames)
}

/// Encode one 11-bit data group into a codeword
///
/// Bit 10 of `data` is the first bit of the group and goes to codeword
/// position 3; bit 0 goes to position 15. Bits above 10 are ignored.
pub fn encode_group(data: u16) -> Frame {
    let mut word = 0u16;
    for (i, &pos) in DATA_POSITIONS.iter().enumerate() {
        if (data >> (DATA_BITS - 1 - i)) & 1 == 1 {
            word |= 1 << (pos - 1);
        }
    }

    // Setting each parity position whose index bit is odd in the
    // data-only syndrome brings the whole-word syndrome to zero.
    let partial = syndrome(Frame::new(word));
    for (k, &pos) in PARITY_POSITIONS.iter().enumerate() {
        if (partial >> k) & 1 == 1 {
            word |= 1 << (pos - 1);
        }
    }

    Frame::new(word)
}
