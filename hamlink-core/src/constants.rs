//! Constants and limits for the Hamming(15,11) frame layout

/// Number of bits in one codeword
pub const CODEWORD_BITS: u8 = 15;

/// Number of data bits carried by one codeword
pub const DATA_BITS: usize = 11;

/// Number of parity bits in one codeword
pub const PARITY_BITS: usize = 4;

/// Mask of the bits a well-formed frame may use (positions 1..=15)
pub const CODEWORD_MASK: u16 = 0x7FFF;

/// 1-indexed codeword positions holding parity bits
///
/// The parity bit at position `2^k` covers every position whose index has bit `k` set.
pub const PARITY_POSITIONS: [u8; PARITY_BITS] = [1, 2, 4, 8];

/// 1-indexed codeword positions holding data bits, in payload order
///
/// The first bit of an 11-bit data group lands at position 3, the last at 15.
pub const DATA_POSITIONS: [u8; DATA_BITS] = [3, 5, 6, 7, 9, 10, 11, 12, 13, 14, 15];

/// Maximum payload size accepted by the default codec (1 MiB)
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Upper bound of a [`Percent`](crate::types::Percent) value
pub const PERCENT_SCALE: u8 = 100;

/// Default probability (percent) that a whole segment is lost
pub const DEFAULT_MESSAGE_LOSS: u8 = 2;

/// Default probability (percent) that a frame receives one flipped bit
pub const DEFAULT_FRAME_ERROR: u8 = 10;

/// Number of frames needed to carry `payload_len` bytes
pub const fn frames_for_len(payload_len: usize) -> usize {
    (payload_len * 8).div_ceil(DATA_BITS)
}
