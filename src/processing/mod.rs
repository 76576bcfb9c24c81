//! # Image Processing and Steganography
//!
//! This module hides a short byte payload in the low bits of an image's RGB
//! channels and recovers it again. It works purely on an in-memory
//! [`PixelGrid`]; reading and writing image files lives in
//! [`common::image_io`](crate::common::image_io).
//!
//! ## Modules
//!
//! - [`grid`]: the pixel grid abstraction and its `image` crate impls
//! - [`steganography`]: the LSB codec (traversal, bit layout, framing, masking)
//! - [`capacity`]: capacity estimate and exact admission checks
//! - [`error`]: codec error kinds

pub mod capacity;
pub mod error;
pub mod grid;
pub mod steganography;

// Re-export main items for convenience
pub use capacity::{capacity, eligible_pixels, CapacityReport};
pub use error::StegoError;
pub use grid::PixelGrid;
pub use steganography::{embed, extract, ChannelLayout, Codec, EmbedReport, Payload};
