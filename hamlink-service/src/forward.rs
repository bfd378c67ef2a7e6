//! Egress: hands a finished transfer to the downstream collaborator

use std::future::Future;
use std::time::Duration;

use hamlink_core::TransferOutcome;

use crate::wire::CodeTransferRequest;

/// Why a forwarding call did not succeed
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// Could not connect, or the call timed out
    #[error("transfer request issue: {0}")]
    Transport(#[from] reqwest::Error),

    /// The collaborator answered with a non-success status
    #[error("unexpected status code while transferring: {0}")]
    UnexpectedStatus(u16),
}

/// One-way delivery of a transfer outcome
pub trait Forwarder: Send + Sync + 'static {
    fn forward(
        &self,
        outcome: &TransferOutcome,
    ) -> impl Future<Output = Result<(), ForwardError>> + Send;
}

/// Forwards outcomes as JSON over HTTP POST
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
    url: String,
}

impl HttpForwarder {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Forwarder for HttpForwarder {
    async fn forward(&self, outcome: &TransferOutcome) -> Result<(), ForwardError> {
        let body = CodeTransferRequest::from(outcome);
        let resp = self.client.post(&self.url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ForwardError::UnexpectedStatus(status.as_u16()));
        }
        Ok(())
    }
}
