//! Service configuration
//!
//! Resolution order: command-line flags → config file → defaults.

use anyhow::{ensure, Context, Result};
use clap::Args;
use hamlink_core::constants::{DEFAULT_FRAME_ERROR, DEFAULT_MESSAGE_LOSS, MAX_PAYLOAD_SIZE};
use hamlink_core::{HammingCodec, Percent, TransferPipeline};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Default downstream endpoint
pub const DEFAULT_FORWARD_URL: &str = "http://localhost:8080/encoded-message/transfer";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the ingress listens on.
    pub listen: SocketAddr,
    /// Where processed segments are POSTed.
    pub forward_url: String,
    /// Percent chance a whole segment is lost.
    pub message_loss: u8,
    /// Percent chance each frame receives one flipped bit.
    pub frame_error: u8,
    /// Number of pipeline workers.
    pub workers: usize,
    /// Segments that may wait for a worker before ingress answers 503.
    pub queue_depth: usize,
    /// Timeout for one forwarding call.
    pub forward_timeout_ms: u64,
    /// Largest payload the codec accepts.
    pub max_payload: usize,
    /// Base seed for worker RNGs. Unset = OS entropy.
    pub seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8081)),
            forward_url: DEFAULT_FORWARD_URL.to_string(),
            message_loss: DEFAULT_MESSAGE_LOSS,
            frame_error: DEFAULT_FRAME_ERROR,
            workers: 4,
            queue_depth: 1024,
            forward_timeout_ms: 5000,
            max_payload: MAX_PAYLOAD_SIZE,
            seed: None,
        }
    }
}

impl ServiceConfig {
    /// Load from a TOML file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                Self::from_toml_str(&content)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        Percent::try_from(self.message_loss).context("message_loss")?;
        Percent::try_from(self.frame_error).context("frame_error")?;
        ensure!(self.workers > 0, "workers must be at least 1");
        ensure!(self.queue_depth > 0, "queue_depth must be at least 1");
        ensure!(self.max_payload > 0, "max_payload must be at least 1");
        ensure!(!self.forward_url.is_empty(), "forward_url must not be empty");
        Ok(())
    }

    pub fn pipeline(&self) -> Result<TransferPipeline> {
        Ok(TransferPipeline::with_codec(
            HammingCodec::new(self.max_payload),
            Percent::try_from(self.message_loss).context("message_loss")?,
            Percent::try_from(self.frame_error).context("frame_error")?,
        ))
    }

    pub fn forward_timeout(&self) -> Duration {
        Duration::from_millis(self.forward_timeout_ms)
    }

    /// Request body limit for ingress: base64 payload plus JSON envelope.
    pub fn body_limit(&self) -> usize {
        self.max_payload.div_ceil(3) * 4 + 64 * 1024
    }
}

/// Policy flags shared by `serve` and `simulate`
#[derive(Debug, Clone, Default, Args)]
pub struct PolicyArgs {
    /// Percent chance a whole segment is lost (0-100)
    #[arg(long)]
    pub message_loss: Option<u8>,

    /// Percent chance each frame gets one flipped bit (0-100)
    #[arg(long)]
    pub frame_error: Option<u8>,

    /// Largest accepted payload in bytes
    #[arg(long)]
    pub max_payload: Option<usize>,

    /// Seed for reproducible noise
    #[arg(long)]
    pub seed: Option<u64>,
}

impl PolicyArgs {
    pub fn apply(&self, config: &mut ServiceConfig) {
        if let Some(v) = self.message_loss {
            config.message_loss = v;
        }
        if let Some(v) = self.frame_error {
            config.frame_error = v;
        }
        if let Some(v) = self.max_payload {
            config.max_payload = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        config.validate().unwrap();
        assert_eq!(config.message_loss, 2);
        assert_eq!(config.frame_error, 10);
        assert_eq!(config.forward_url, DEFAULT_FORWARD_URL);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServiceConfig::from_toml_str(
            r#"
            frame_error = 25
            seed = 9
            listen = "0.0.0.0:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.frame_error, 25);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.message_loss, 2);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ServiceConfig {
            frame_error: 101,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());

        config.frame_error = 10;
        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pipeline_rejects_out_of_range_probability() {
        let config = ServiceConfig {
            message_loss: 150,
            ..ServiceConfig::default()
        };
        let err = config.pipeline().unwrap_err();
        assert_eq!(err.to_string(), "message_loss");
    }

    #[test]
    fn test_policy_args_override() {
        let mut config = ServiceConfig::default();
        let args = PolicyArgs {
            message_loss: Some(0),
            frame_error: None,
            max_payload: Some(64),
            seed: Some(1),
        };
        args.apply(&mut config);
        assert_eq!(config.message_loss, 0);
        assert_eq!(config.frame_error, 10);
        assert_eq!(config.max_payload, 64);
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn test_pipeline_from_config() {
        let config = ServiceConfig {
            message_loss: 7,
            frame_error: 3,
            max_payload: 32,
            ..ServiceConfig::default()
        };
        let pipeline = config.pipeline().unwrap();
        assert_eq!(pipeline.message_loss().value(), 7);
        assert_eq!(pipeline.frame_error().value(), 3);
        assert_eq!(pipeline.codec().max_payload(), 32);
    }
}
