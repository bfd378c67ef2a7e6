//! Channel noise: per-frame single-bit error injection

use crate::constants::CODEWORD_BITS;
use crate::types::{Frame, Percent};
use alloc::vec::Vec;
use rand::Rng;

/// Outcome of one injection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InjectionReport {
    /// Frames examined
    pub frames: usize,
    /// Frames that received exactly one flipped bit
    pub corrupted: usize,
}

/// Flips at most one uniformly chosen bit per frame with a fixed probability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorInjector {
    probability: Percent,
}

impl ErrorInjector {
    /// Create an injector with the given per-frame error probability
    pub const fn new(probability: Percent) -> Self {
        Self { probability }
    }

    /// Per-frame error probability
    pub const fn probability(&self) -> Percent {
        self.probability
    }

    /// Corrupt frames in place
    ///
    /// Each frame costs one draw for the error decision and, when triggered,
    /// one more for the bit position. Frames are independent of each other.
    pub fn inject<R: Rng + ?Sized>(&self, frames: &mut [Frame], rng: &mut R) -> InjectionReport {
        let mut report = InjectionReport {
            frames: frames.len(),
            corrupted: 0,
        };

        for frame in frames.iter_mut() {
            if self.probability.hits(rng) {
                frame.flip_bit(rng.gen_range(0..CODEWORD_BITS));
                report.corrupted += 1;
            }
        }

        report
    }

    /// Owned form of [`inject`](Self::inject)
    pub fn inject_errors<R: Rng + ?Sized>(&self, mut frames: Vec<Frame>, rng: &mut R) -> Vec<Frame> {
        self.inject(&mut frames, rng);
        frames
    }
}
