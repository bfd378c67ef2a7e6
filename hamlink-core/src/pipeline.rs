//! One hop of the noisy link: loss, encode, inject, correct, compare
//!
//! The pipeline owns no randomness. Every run takes a caller-supplied
//! [`Rng`], so a seeded generator gives bit-for-bit reproducible runs and
//! concurrent workers never share a generator.

use crate::decoder::DecodeReport;
use crate::error::CodecError;
use crate::fec::{ForwardErrorCorrection, HammingCodec};
use crate::injector::{ErrorInjector, InjectionReport};
use crate::types::{Percent, Segment, TransferOutcome};
use bytes::Bytes;
use rand::Rng;

#[cfg(feature = "logging")]
use tracing::{debug, info};

/// A completed run together with its noise and correction statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The outcome to forward
    pub outcome: TransferOutcome,
    /// What the injector did
    pub injection: InjectionReport,
    /// What the decoder did
    pub decode: DecodeReport,
}

/// Loss model plus codec plus error injector
#[derive(Debug, Clone)]
pub struct TransferPipeline<C = HammingCodec> {
    codec: C,
    message_loss: Percent,
    injector: ErrorInjector,
}

impl TransferPipeline<HammingCodec> {
    /// Create a pipeline over the default Hamming(15,11) codec
    pub fn new(message_loss: Percent, frame_error: Percent) -> Self {
        Self::with_codec(HammingCodec::default(), message_loss, frame_error)
    }
}

impl<C: ForwardErrorCorrection> TransferPipeline<C> {
    /// Create a pipeline over an explicit codec
    pub fn with_codec(codec: C, message_loss: Percent, frame_error: Percent) -> Self {
        Self {
            codec,
            message_loss,
            injector: ErrorInjector::new(frame_error),
        }
    }

    /// Whole-message loss probability
    pub fn message_loss(&self) -> Percent {
        self.message_loss
    }

    /// Per-frame error probability
    pub fn frame_error(&self) -> Percent {
        self.injector.probability()
    }

    /// The codec in use
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Run one segment through the link
    ///
    /// Returns `Ok(None)` when the segment is lost. A lost segment consumes
    /// exactly one draw and never touches the codec.
    pub fn run<R: Rng + ?Sized>(
        &self,
        segment: &Segment,
        rng: &mut R,
    ) -> Result<Option<RunReport>, CodecError> {
        if self.message_loss.hits(rng) {
            #[cfg(feature = "logging")]
            info!(
                "Message lost: sender={} seg={}/{}",
                segment.meta.sender, segment.meta.seg_num, segment.meta.seg_count
            );
            return Ok(None);
        }

        let original = &segment.payload[..];
        let mut frames = self.codec.encode(original)?;
        let injection = self.injector.inject(&mut frames, rng);
        let (decoded, decode) = self.codec.decode_with_report(&frames, original.len())?;

        let mismatch = decoded.iter().zip(original).position(|(a, b)| a != b);
        let has_error = mismatch.is_some();

        #[cfg(feature = "logging")]
        {
            debug!(
                "Segment {}/{} from {}: {} frames, {} corrupted, {} corrected",
                segment.meta.seg_num,
                segment.meta.seg_count,
                segment.meta.sender,
                injection.frames,
                injection.corrupted,
                decode.corrected
            );
            if let Some(at) = mismatch {
                debug!("Decoded payload differs from original at byte {}", at);
            }
        }

        Ok(Some(RunReport {
            outcome: TransferOutcome {
                meta: segment.meta.clone(),
                payload: Bytes::from(decoded),
                has_error,
            },
            injection,
            decode,
        }))
    }

    /// Run one segment and keep only the outcome
    pub fn process<R: Rng + ?Sized>(
        &self,
        segment: &Segment,
        rng: &mut R,
    ) -> Result<Option<TransferOutcome>, CodecError> {
        Ok(self.run(segment, rng)?.map(|report| report.outcome))
    }
}

impl Default for TransferPipeline<HammingCodec> {
    fn default() -> Self {
        Self::new(
            Percent::new(crate::constants::DEFAULT_MESSAGE_LOSS).unwrap_or(Percent::NEVER),
            Percent::new(crate::constants::DEFAULT_FRAME_ERROR).unwrap_or(Percent::NEVER),
        )
    }
}
