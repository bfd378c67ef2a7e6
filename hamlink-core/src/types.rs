//! Core types for Hamlink transfers

use crate::constants::{CODEWORD_BITS, CODEWORD_MASK, PERCENT_SCALE};
use crate::error::CodecError;
use alloc::string::String;
use bytes::Bytes;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One Hamming(15,11) codeword
///
/// Codeword position `p` (1-indexed) is stored at bit `p - 1`. Bit 15 of the
/// word is always clear in a frame produced by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Frame(u16);

impl Frame {
    /// Wrap a raw codeword
    pub const fn new(word: u16) -> Self {
        Self(word)
    }

    /// Get the raw codeword
    pub const fn word(&self) -> u16 {
        self.0
    }

    /// Check that no bit outside the 15-bit codeword is set
    pub const fn is_well_formed(&self) -> bool {
        self.0 & !CODEWORD_MASK == 0
    }

    /// Read the bit at a 1-indexed codeword position
    ///
    /// Positions outside `1..=15` read as clear.
    pub const fn position(&self, pos: u8) -> bool {
        if pos == 0 || pos > CODEWORD_BITS {
            return false;
        }
        (self.0 >> (pos - 1)) & 1 == 1
    }

    /// Flip the bit at 0-indexed `bit`, taken modulo 15
    ///
    /// Never touches bit 15, so a well-formed frame stays well-formed.
    pub fn flip_bit(&mut self, bit: u8) {
        self.0 ^= 1 << (bit % CODEWORD_BITS);
    }

    /// Return a copy with the bit at 0-indexed `bit` flipped
    pub fn with_flipped_bit(mut self, bit: u8) -> Self {
        self.flip_bit(bit);
        self
    }
}

/// A probability expressed as a whole percentage (0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(u8);

impl Percent {
    /// Never triggers
    pub const NEVER: Percent = Percent(0);

    /// Always triggers
    pub const ALWAYS: Percent = Percent(PERCENT_SCALE);

    /// Create a percentage, rejecting values above 100
    pub fn new(value: u8) -> Result<Self, CodecError> {
        if value > PERCENT_SCALE {
            return Err(CodecError::InvalidProbability(value));
        }
        Ok(Self(value))
    }

    /// Get the raw percentage
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Make one draw from `rng`: true with probability `value / 100`
    ///
    /// Always consumes exactly one draw, even for 0 and 100.
    pub fn hits<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_range(0..PERCENT_SCALE) < self.0
    }
}

impl TryFrom<u8> for Percent {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Percent::new(value)
    }
}

/// Message-positioning metadata carried alongside a segment payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentMeta {
    /// Sender identifier
    pub sender: String,

    /// Timestamp, opaque to the pipeline
    pub time: String,

    /// Total segments in the logical message
    pub seg_count: u32,

    /// Index of this segment
    pub seg_num: u32,
}

/// One unit of ingress work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment metadata
    pub meta: SegmentMeta,

    /// Raw payload bytes
    pub payload: Bytes,
}

impl Segment {
    /// Create a new segment
    pub fn new(meta: SegmentMeta, payload: Bytes) -> Self {
        Self { meta, payload }
    }
}

/// Result of one pipeline run, ready for forwarding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Original segment metadata
    pub meta: SegmentMeta,

    /// Decoded payload, same length as the original
    pub payload: Bytes,

    /// At least one byte differs from the original after correction
    pub has_error: bool,
}
