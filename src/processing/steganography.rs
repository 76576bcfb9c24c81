//! # LSB Steganography Implementation
//!
//! Hides up to 255 bytes in the low bits of an image's Red, Green and Blue
//! channels, one byte per pixel.
//!
//! ## Algorithm
//!
//! ### Framing
//! The payload is prefixed with a single length byte: `[len][data...]`.
//! Payloads longer than 255 bytes cannot be framed and are rejected.
//!
//! ### Traversal
//! Pixels are visited row by row (`y` outer, `x` inner). A pixel carries data
//! only if `y * x > 54`, so the whole first row and first column, plus a
//! ragged region near the origin, are never touched. The product rule is
//! kept exactly as-is because it decides which pixels hold data in images
//! that are already out there.
//!
//! ### Per-pixel layout
//! ```text
//! byte:  b7 b6 b5 | b4 b3 | b2 b1 b0
//!        Red[2:0] | Grn[1:0] | Blue[2:0]
//! ```
//!
//! ### Masking
//! With a non-empty secret every payload byte is XORed with a single
//! keystream byte (the wrapping sum of the secret's bytes). The length byte
//! is stored in the clear on both sides, so extracting with the wrong secret
//! still yields the right number of (garbage) bytes. This is obfuscation, not
//! encryption.
//!
//! ### Integrity
//! There is none. Extracting with the wrong secret, or from an image that
//! was never encoded, succeeds and returns garbage.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::capacity;
use super::error::StegoError;
use super::grid::PixelGrid;

/// Largest payload the one-byte length prefix can describe.
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// Pixels with `y * x` at or below this value are skipped.
pub const SKIP_PRODUCT: u64 = 54;

/// Data to hide plus the optional secret used to mask it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub data: Vec<u8>,
    /// Empty means no masking
    pub secret: String,
}

impl Payload {
    pub fn new(data: impl Into<Vec<u8>>, secret: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            secret: secret.into(),
        }
    }

    /// Unmasked UTF-8 text payload.
    pub fn text(text: &str) -> Self {
        Self::new(text.as_bytes(), String::new())
    }
}

/// Derive the masking byte from a secret.
///
/// Returns `None` for an empty secret, meaning no XOR step at all.
pub fn keystream(secret: &str) -> Option<u8> {
    if secret.is_empty() {
        return None;
    }
    Some(secret.bytes().fold(0u8, |acc, b| acc.wrapping_add(b)))
}

/// Whether the pixel at `(x, y)` carries a byte of the framed stream.
pub fn is_eligible(x: u32, y: u32) -> bool {
    u64::from(y) * u64::from(x) > SKIP_PRODUCT
}

/// Row-major walk over the coordinates accepted by a predicate.
///
/// Embedding and extraction both drive this iterator with [`is_eligible`],
/// which fixes the stream-to-pixel assignment.
#[derive(Debug, Clone)]
pub struct Traversal {
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    predicate: fn(u32, u32) -> bool,
}

impl Traversal {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_predicate(width, height, is_eligible)
    }

    pub fn with_predicate(width: u32, height: u32, predicate: fn(u32, u32) -> bool) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: 0,
            predicate,
        }
    }
}

impl Iterator for Traversal {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.width == 0 {
            return None;
        }

        while self.y < self.height {
            let (x, y) = (self.x, self.y);

            self.x += 1;
            if self.x == self.width {
                self.x = 0;
                self.y += 1;
            }

            if (self.predicate)(x, y) {
                return Some((x, y));
            }
        }

        None
    }
}

/// Which value feeds the high bits of the packed Blue channel.
///
/// Legacy encoders built Blue from the already packed Green value, so the
/// Blue channel of their output carries Green's high five bits. Extraction
/// only reads low bits, so images written under either layout decode the
/// same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// `B' = (B & 0xF8) | (byte & 0x07)`
    #[default]
    Corrected,
    /// `B' = (G' & 0xF8) | (byte & 0x07)`, byte-identical to legacy output
    Legacy,
}

impl FromStr for ChannelLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "corrected" => Ok(ChannelLayout::Corrected),
            "legacy" => Ok(ChannelLayout::Legacy),
            other => Err(format!(
                "unknown channel layout '{}' (expected corrected or legacy)",
                other
            )),
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelLayout::Corrected => write!(f, "corrected"),
            ChannelLayout::Legacy => write!(f, "legacy"),
        }
    }
}

/// Red keeps its high 5 bits and takes bits 7-5 of `byte`.
pub fn pack_red((r, _, _): (u8, u8, u8), byte: u8) -> u8 {
    (r & 0xF8) | ((byte >> 5) & 0x07)
}

/// Green keeps its high 6 bits and takes bits 4-3 of `byte`.
pub fn pack_green((_, g, _): (u8, u8, u8), byte: u8) -> u8 {
    (g & 0xFC) | ((byte >> 3) & 0x03)
}

/// Blue takes bits 2-0 of `byte`; its high bits depend on `layout`.
pub fn pack_blue(rgb: (u8, u8, u8), byte: u8, layout: ChannelLayout) -> u8 {
    let high = match layout {
        ChannelLayout::Corrected => rgb.2 & 0xF8,
        ChannelLayout::Legacy => pack_green(rgb, byte) & 0xF8,
    };
    high | (byte & 0x07)
}

/// Reassemble one byte from the low 3 + 2 + 3 bits of a pixel.
pub fn unpack(r: u8, g: u8, b: u8) -> u8 {
    ((r & 0x07) << 5) | ((g & 0x03) << 3) | (b & 0x07)
}

/// Summary of one successful embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    pub payload_len: usize,
    /// Length byte included
    pub pixels_written: u64,
    pub eligible_pixels: u64,
}

/// The embedding/extraction engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    layout: ChannelLayout,
}

impl Codec {
    pub fn new(layout: ChannelLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Embed `payload` into `grid` in place.
    ///
    /// The payload length and the grid capacity are validated before any
    /// pixel is written, so on error the grid is unchanged.
    ///
    /// # Errors
    /// - [`StegoError::PayloadTooLarge`] if the payload exceeds 255 bytes
    /// - [`StegoError::CapacityExceeded`] if the grid has fewer than
    ///   `1 + len` eligible pixels
    pub fn embed<G>(&self, grid: &mut G, payload: &Payload) -> Result<EmbedReport, StegoError>
    where
        G: PixelGrid + ?Sized,
    {
        let (width, height) = (grid.width(), grid.height());
        capacity::check_payload(width, height, payload.data.len())?;

        let mask = keystream(&payload.secret);
        let framed = frame(&payload.data, mask);

        let mut written = 0u64;
        for (&byte, (x, y)) in framed.iter().zip(Traversal::new(width, height)) {
            let rgb = grid.get_channels(x, y);
            grid.set_channels(
                x,
                y,
                pack_red(rgb, byte),
                pack_green(rgb, byte),
                pack_blue(rgb, byte, self.layout),
            );
            written += 1;
        }

        let eligible = capacity::eligible_pixels(width, height);
        if written < framed.len() as u64 {
            return Err(StegoError::CapacityExceeded {
                required: framed.len() as u64,
                available: eligible,
            });
        }

        debug!(
            "Embedded {} bytes into {}x{} grid ({} of {} eligible pixels, layout {}, masked: {})",
            payload.data.len(),
            width,
            height,
            written,
            eligible,
            self.layout,
            mask.is_some()
        );

        Ok(EmbedReport {
            payload_len: payload.data.len(),
            pixels_written: written,
            eligible_pixels: eligible,
        })
    }

    /// Recover the payload hidden in `grid`.
    ///
    /// Traversal stops as soon as the declared number of bytes is read.
    ///
    /// # Errors
    /// - [`StegoError::TruncatedPayload`] if the grid runs out of eligible
    ///   pixels before the length byte or the declared payload is read
    pub fn extract<G>(&self, grid: &G, secret: &str) -> Result<Vec<u8>, StegoError>
    where
        G: PixelGrid + ?Sized,
    {
        let (width, height) = (grid.width(), grid.height());
        let mask = keystream(secret);

        let mut stream = Traversal::new(width, height).map(|(x, y)| {
            let (r, g, b) = grid.get_channels(x, y);
            unpack(r, g, b)
        });

        let truncated = |needed: u64| StegoError::TruncatedPayload {
            needed,
            available: capacity::eligible_pixels(width, height),
        };

        let declared = stream.next().ok_or_else(|| truncated(1))? as usize;
        let data: Vec<u8> = stream
            .take(declared)
            .map(|byte| mask.map_or(byte, |k| byte ^ k))
            .collect();
        if data.len() < declared {
            return Err(truncated(1 + declared as u64));
        }

        debug!(
            "Extracted {} bytes from {}x{} grid (masked: {})",
            data.len(),
            width,
            height,
            mask.is_some()
        );

        Ok(data)
    }
}

/// Embed with the default [`Codec`].
pub fn embed<G>(grid: &mut G, payload: &Payload) -> Result<EmbedReport, StegoError>
where
    G: PixelGrid + ?Sized,
{
    Codec::default().embed(grid, payload)
}

/// Extract with the default [`Codec`].
pub fn extract<G>(grid: &G, secret: &str) -> Result<Vec<u8>, StegoError>
where
    G: PixelGrid + ?Sized,
{
    Codec::default().extract(grid, secret)
}

/// `[len] ++ data`, with only the data bytes masked.
fn frame(data: &[u8], mask: Option<u8>) -> Vec<u8> {
    let mut framed = Vec::with_capacity(data.len() + 1);
    framed.push(data.len() as u8);
    framed.extend(data.iter().map(|&byte| mask.map_or(byte, |k| byte ^ k)));
    framed
}
