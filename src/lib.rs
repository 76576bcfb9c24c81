//! # stego-lsb
//!
//! LSB image steganography: hide up to 255 bytes in the Red, Green and Blue
//! channels of a lossless image and read them back.
//!
//! ```ignore
//! use stego_lsb::{embed, extract, Payload};
//!
//! let mut grid = image::open("cover.png")?.to_rgba8();
//! embed(&mut grid, &Payload::new("Hide me!", "secret"))?;
//! assert_eq!(extract(&grid, "secret")?, b"Hide me!");
//! ```

pub mod common;
pub mod processing;

pub use processing::{
    capacity, eligible_pixels, embed, extract, CapacityReport, ChannelLayout, Codec, Payload,
    PixelGrid, StegoError,
};
