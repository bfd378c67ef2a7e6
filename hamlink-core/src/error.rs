//! Error types for Hamlink codec and pipeline operations

/// Errors that can occur while encoding, decoding or configuring a transfer
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Nothing to encode
    #[cfg_attr(feature = "std", error("Encoding error: payload is empty"))]
    EmptyPayload,

    /// Payload size exceeds the codec's maximum
    #[cfg_attr(feature = "std", error("Encoding error: payload size {0} exceeds maximum {1}"))]
    PayloadTooLarge(usize, usize),

    /// Decoding was asked to work on an empty frame set
    #[cfg_attr(feature = "std", error("Decoding error: no frames to decode"))]
    NoFrames,

    /// A frame uses bits outside the 15-bit codeword
    #[cfg_attr(feature = "std", error("Decoding error: frame {index} is wider than 15 bits ({word:#06x})"))]
    FrameTooWide {
        /// Index of the offending frame.
        index: usize,
        /// The raw word found.
        word: u16,
    },

    /// Decoding was asked to produce zero bytes
    #[cfg_attr(feature = "std", error("Decoding error: expected payload length is zero"))]
    ZeroLength,

    /// The frames carry fewer data bits than the expected payload needs
    #[cfg_attr(feature = "std", error("Decoding error: need {expected} data bits, frames carry {actual}"))]
    InsufficientFrames {
        /// Number of data bits required.
        expected: usize,
        /// Number of data bits available.
        actual: usize,
    },

    /// Probability outside 0..=100
    #[cfg_attr(feature = "std", error("Invalid probability: {0} (expected 0..=100)"))]
    InvalidProbability(u8),
}

impl CodecError {
    /// True for failures raised while encoding a payload
    pub fn is_encoding(&self) -> bool {
        matches!(self, CodecError::EmptyPayload | CodecError::PayloadTooLarge(..))
    }

    /// True for failures raised while correcting and decoding frames
    pub fn is_decoding(&self) -> bool {
        matches!(
            self,
            CodecError::NoFrames
                | CodecError::FrameTooWide { .. }
                | CodecError::ZeroLength
                | CodecError::InsufficientFrames { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(CodecError::EmptyPayload.is_encoding());
        assert!(CodecError::PayloadTooLarge(2, 1).is_encoding());
        assert!(CodecError::NoFrames.is_decoding());
        assert!(CodecError::ZeroLength.is_decoding());
        assert!(!CodecError::InvalidProbability(101).is_encoding());
        assert!(!CodecError::InvalidProbability(101).is_decoding());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_error_messages() {
        let err = CodecError::FrameTooWide {
            index: 3,
            word: 0x8001,
        };
        assert_eq!(
            err.to_string(),
            "Decoding error: frame 3 is wider than 15 bits (0x8001)"
        );
    }
}
