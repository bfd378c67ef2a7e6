//! Forward Error Correction codec interface and the Hamming(15,11) codec
//!
//! The pipeline is written against [`ForwardErrorCorrection`] so tests and
//! benches can drive it with any frame codec; [`HammingCodec`] is the one the
//! service runs.

use crate::constants::MAX_PAYLOAD_SIZE;
use crate::decoder::{decode_frames, DecodeReport};
use crate::encoder::encode_payload;
use crate::error::CodecError;
use crate::types::Frame;
use alloc::vec::Vec;

/// A stateless block code over 15-bit frames
pub trait ForwardErrorCorrection {
    /// Encode a payload into frames, in payload order
    fn encode(&self, payload: &[u8]) -> Result<Vec<Frame>, CodecError>;

    /// Correct and decode frames, returning exactly `payload_len` bytes plus statistics
    fn decode_with_report(
        &self,
        frames: &[Frame],
        payload_len: usize,
    ) -> Result<(Vec<u8>, DecodeReport), CodecError>;

    /// Correct and decode frames, returning exactly `payload_len` bytes
    fn correct_and_decode(&self, frames: &[Frame], payload_len: usize) -> Result<Vec<u8>, CodecError> {
        self.decode_with_report(frames, payload_len)
            .map(|(payload, _)| payload)
    }
}

/// Hamming(15,11) single-error-correcting codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HammingCodec {
    max_payload: usize,
}

impl HammingCodec {
    /// Create a codec that refuses payloads longer than `max_payload` bytes
    pub const fn new(max_payload: usize) -> Self {
        Self { max_payload }
    }

    /// Largest payload this codec will encode
    pub const fn max_payload(&self) -> usize {
        self.max_payload
    }
}

impl Default for HammingCodec {
    fn default() -> Self {
        Self::new(MAX_PAYLOAD_SIZE)
    }
}

impl ForwardErrorCorrection for HammingCodec {
    fn encode(&self, payload: &[u8]) -> Result<Vec<Frame>, CodecError> {
        encode_payload(payload, self.max_payload)
    }

    fn decode_with_report(
        &self,
        frames: &[Frame],
        payload_len: usize,
    ) -> Result<(Vec<u8>, DecodeReport), CodecError> {
        decode_frames(frames, payload_len)
    }
}
