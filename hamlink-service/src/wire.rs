//! JSON bodies exchanged with the ingress caller and the downstream collaborator
//!
//! Byte payloads travel as standard base64 strings.

use bytes::Bytes;
use hamlink_core::{Segment, SegmentMeta, TransferOutcome};
use serde::{Deserialize, Serialize};

/// Inbound segment descriptor (`POST /code`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRequest {
    #[serde(flatten)]
    pub meta: SegmentMeta,
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
}

/// Outbound body sent to the forwarding endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTransferRequest {
    #[serde(flatten)]
    pub meta: SegmentMeta,
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
    pub has_error: bool,
}

impl From<CodeRequest> for Segment {
    fn from(req: CodeRequest) -> Self {
        Segment::new(req.meta, Bytes::from(req.payload))
    }
}

impl From<&TransferOutcome> for CodeTransferRequest {
    fn from(outcome: &TransferOutcome) -> Self {
        Self {
            meta: outcome.meta.clone(),
            payload: outcome.payload.to_vec(),
            has_error: outcome.has_error,
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s.as_bytes()).map_err(D::Error::custom)
    }
}
