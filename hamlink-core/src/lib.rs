//! # Hamlink Core
//!
//! One hop of a noisy digital link: a Hamming(15,11) single-error-correcting
//! codec and the probabilistic fault model that exercises it.
//!
//! ## Modules
//!
//! - `constants`: Codeword layout and default policy values
//! - `types`: Core types (Frame, Segment, TransferOutcome, Percent)
//! - `encoder`: Payload to codeword encoding
//! - `decoder`: Syndrome correction and payload reconstruction
//! - `fec`: The codec trait and the Hamming(15,11) codec
//! - `injector`: Per-frame single-bit error injection
//! - `pipeline`: Message loss, encode, inject, correct, compare

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fec;
pub mod injector;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use error::CodecError;
pub use fec::{ForwardErrorCorrection, HammingCodec};
pub use injector::ErrorInjector;
pub use pipeline::TransferPipeline;
pub use types::{Frame, Percent, Segment, SegmentMeta, TransferOutcome};

/// Result type alias for Hamlink operations
pub type Result<T> = core::result::Result<T, CodecError>;
