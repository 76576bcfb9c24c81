//! # Codec Errors
//!
//! Failure modes of the LSB codec. All of them are detected synchronously
//! before (embedding) or during (extraction) traversal and are never retried.
//!
//! There is no "corrupted payload" variant: the stream carries no
//! checksum, so a wrong secret or an image that was never encoded decodes into
//! meaningless bytes instead of failing.

use thiserror::Error;

/// Errors returned by [`embed`](super::steganography::embed) and
/// [`extract`](super::steganography::extract).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StegoError {
    /// The one-byte length prefix cannot represent the payload length.
    #[error("payload of {len} bytes is too large (maximum is {max} bytes)")]
    PayloadTooLarge { len: usize, max: usize },

    /// The grid has fewer eligible pixels than the framed stream needs.
    #[error("image too small: need {required} eligible pixels but only {available} available")]
    CapacityExceeded { required: u64, available: u64 },

    /// Extraction ran out of eligible pixels before the declared length was read.
    ///
    /// `needed` counts the length byte, so a grid with no eligible pixel at
    /// all reports `needed: 1`.
    #[error("payload truncated: stream needs {needed} eligible pixels but only {available} available")]
    TruncatedPayload { needed: u64, available: u64 },
}
