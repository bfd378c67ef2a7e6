//! Syndrome correction and payload reconstruction

use crate::constants::{CODEWORD_BITS, DATA_BITS, DATA_POSITIONS};
use crate::error::CodecError;
use crate::types::Frame;
use alloc::vec::Vec;
use bitvec::prelude::*;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// What correction did to a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Zero syndrome, frame taken as-is
    Clean,
    /// Single-bit error at this 1-indexed position was flipped back
    Corrected(u8),
    /// Syndrome names no valid position; data extracted without correction
    Uncorrectable(u8),
}

/// Per-call decoding statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeReport {
    /// Frames examined
    pub frames: usize,
    /// Frames with a nonzero syndrome that were corrected
    pub corrected: usize,
    /// Frames whose syndrome could not be mapped to a position
    pub uncorrectable: usize,
}

/// Compute the 4-bit syndrome of a frame
///
/// The syndrome is the XOR of the 1-indexed positions of every set bit,
/// which is the same as re-checking the four even-parity subsets. Zero
/// means no detected error; otherwise, for a single flip, it is the
/// position of the flipped bit.
pub fn syndrome(frame: Frame) -> u8 {
    let word = frame.word();
    let mut s = 0u8;
    for pos in 1..=CODEWORD_BITS {
        if (word >> (pos - 1)) & 1 == 1 {
            s ^= pos;
        }
    }
    s
}

/// Correct at most one bit error in a frame
pub fn correct_frame(frame: Frame) -> (Frame, Correction) {
    match syndrome(frame) {
        0 => (frame, Correction::Clean),
        pos @ 1..=CODEWORD_BITS => (frame.with_flipped_bit(pos - 1), Correction::Corrected(pos)),
        other => (frame, Correction::Uncorrectable(other)),
    }
}

/// Extract the 11 data bits of a frame, first payload bit in bit 10
pub fn extract_data(frame: Frame) -> u16 {
    DATA_POSITIONS
        .iter()
        .fold(0u16, |acc, &pos| (acc << 1) | u16::from(frame.position(pos)))
}

/// Correct and decode frames back into a payload of exactly `payload_len` bytes
///
/// Each frame is corrected independently, its data bits appended to a bit
/// stream (most significant bit first), and the stream truncated to
/// `payload_len` bytes.
pub fn decode_frames(
    frames: &[Frame],
    payload_len: usize,
) -> Result<(Vec<u8>, DecodeReport), CodecError> {
    if frames.is_empty() {
        return Err(CodecError::NoFrames);
    }
    if payload_len == 0 {
        return Err(CodecError::ZeroLength);
    }
    if let Some((index, frame)) = frames.iter().enumerate().find(|(_, f)| !f.is_well_formed()) {
        return Err(CodecError::FrameTooWide {
            index,
            word: frame.word(),
        });
    }

    let actual = frames.len() * DATA_BITS;
    let expected = match payload_len.checked_mul(8) {
        Some(bits) if bits <= actual => bits,
        Some(bits) => return Err(CodecError::InsufficientFrames { expected: bits, actual }),
        None => {
            return Err(CodecError::InsufficientFrames {
                expected: usize::MAX,
                actual,
            })
        }
    };

    let mut report = DecodeReport {
        frames: frames.len(),
        ..DecodeReport::default()
    };
    let mut bits: BitVec<u8, Msb0> = BitVec::with_capacity(actual);

    for (_index, frame) in frames.iter().enumerate() {
        let (fixed, correction) = correct_frame(*frame);
        match correction {
            Correction::Clean => {}
            Correction::Corrected(_pos) => {
                report.corrected += 1;
                #[cfg(feature = "logging")]
                trace!("Corrected frame {} at position {}", _index, _pos);
            }
            Correction::Uncorrectable(_s) => {
                report.uncorrectable += 1;
                #[cfg(feature = "logging")]
                debug!("Frame {} has uncorrectable syndrome {}", _index, _s);
            }
        }

        let data = extract_data(fixed);
        for shift in (0..DATA_BITS).rev() {
            bits.push((data >> shift) & 1 == 1);
        }
    }

    bits.truncate(expected);
    let mut out = bits.into_vec();
    out.truncate(payload_len);

    Ok((out, report))
}
