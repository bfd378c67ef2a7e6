//! A single pipeline run, start to forward

use std::sync::Arc;

use hamlink_core::{CodecError, ForwardErrorCorrection, HammingCodec, Segment, TransferPipeline};
use rand::Rng;
use tracing::{debug, error, warn};

use crate::forward::{ForwardError, Forwarder};

/// How one run ended
#[derive(Debug)]
pub enum TransferStatus {
    /// Dropped by the loss model; nothing forwarded
    Lost,
    /// Encode or decode failed; nothing forwarded
    Failed(CodecError),
    /// Forwarded and acknowledged
    Forwarded { has_error: bool },
    /// Forwarding attempted and failed; not retried
    ForwardFailed(ForwardError),
}

/// Pipeline plus forwarder, shared by every worker
pub struct Transfer<F, C = HammingCodec> {
    pipeline: Arc<TransferPipeline<C>>,
    forwarder: Arc<F>,
}

impl<F, C> Clone for Transfer<F, C> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            forwarder: Arc::clone(&self.forwarder),
        }
    }
}

impl<F, C> Transfer<F, C>
where
    F: Forwarder,
    C: ForwardErrorCorrection + Send + Sync + 'static,
{
    pub fn new(pipeline: TransferPipeline<C>, forwarder: F) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            forwarder: Arc::new(forwarder),
        }
    }

    /// Run one segment through the link and forward the outcome at most once.
    pub async fn run<R: Rng + Send>(&self, segment: Segment, rng: &mut R) -> TransferStatus {
        let report = match self.pipeline.run(&segment, rng) {
            Ok(Some(report)) => report,
            Ok(None) => return TransferStatus::Lost,
            Err(e) => {
                error!(
                    sender = %segment.meta.sender,
                    seg_num = segment.meta.seg_num,
                    "Error while processing message: {}", e
                );
                return TransferStatus::Failed(e);
            }
        };

        let outcome = report.outcome;
        if outcome.has_error {
            warn!(
                sender = %outcome.meta.sender,
                seg_num = outcome.meta.seg_num,
                corrupted = report.injection.corrupted,
                corrected = report.decode.corrected,
                "Frames inequality after correction"
            );
        }

        match self.forwarder.forward(&outcome).await {
            Ok(()) => {
                debug!(
                    sender = %outcome.meta.sender,
                    seg_num = outcome.meta.seg_num,
                    has_error = outcome.has_error,
                    "Segment forwarded"
                );
                TransferStatus::Forwarded {
                    has_error: outcome.has_error,
                }
            }
            Err(e @ ForwardError::UnexpectedStatus(_)) => {
                warn!(sender = %outcome.meta.sender, seg_num = outcome.meta.seg_num, "{}", e);
                TransferStatus::ForwardFailed(e)
            }
            Err(e) => {
                error!(sender = %outcome.meta.sender, seg_num = outcome.meta.seg_num, "{}", e);
                TransferStatus::ForwardFailed(e)
            }
        }
    }
}
