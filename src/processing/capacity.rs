//! # Capacity Model
//!
//! Two different numbers live here and they must not be confused:
//!
//! - [`capacity`] is the display estimate the command line prints,
//!   `floor(width * height / 8) - 54`. It is not an admission check.
//! - [`eligible_pixels`] is the exact number of pixels the codec traversal
//!   will write to. [`check_payload`] and the codec use this one.

use serde::{Deserialize, Serialize};

use super::error::StegoError;
use super::steganography::{MAX_PAYLOAD_LEN, SKIP_PRODUCT};

/// Number of characters reported as the capacity of a `width x height` grid.
///
/// Saturates at 0 for grids too small to reach the 54 character offset.
pub fn capacity(width: u32, height: u32) -> u64 {
    let pixels = u64::from(width) * u64::from(height);
    (pixels / 8).saturating_sub(SKIP_PRODUCT)
}

/// Exact number of pixels with `y * x > 54`.
///
/// Row `y` (for `y >= 1`) contributes every `x` strictly greater than
/// `54 / y`, row 0 contributes nothing.
pub fn eligible_pixels(width: u32, height: u32) -> u64 {
    let width = u64::from(width);
    (1..u64::from(height))
        .map(|y| width.saturating_sub(SKIP_PRODUCT / y + 1))
        .sum()
}

/// Largest payload (in bytes) that a `width x height` grid accepts.
pub fn max_payload(width: u32, height: u32) -> usize {
    let slots = eligible_pixels(width, height).saturating_sub(1);
    slots.min(MAX_PAYLOAD_LEN as u64) as usize
}

/// Validate a payload length against the framing limit and the grid.
///
/// # Errors
/// - [`StegoError::PayloadTooLarge`] if `len` exceeds 255, whatever the grid size
/// - [`StegoError::CapacityExceeded`] if `1 + len` exceeds the eligible pixels
pub fn check_payload(width: u32, height: u32, len: usize) -> Result<(), StegoError> {
    if len > MAX_PAYLOAD_LEN {
        return Err(StegoError::PayloadTooLarge {
            len,
            max: MAX_PAYLOAD_LEN,
        });
    }

    let required = 1 + len as u64;
    let available = eligible_pixels(width, height);
    if required > available {
        return Err(StegoError::CapacityExceeded {
            required,
            available,
        });
    }

    Ok(())
}

/// Capacity figures for one image, printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityReport {
    pub width: u32,
    pub height: u32,
    /// Display estimate, see [`capacity`]
    pub estimate: u64,
    pub eligible_pixels: u64,
    /// Exact admission bound, see [`max_payload`]
    pub max_payload: usize,
}

impl CapacityReport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            estimate: capacity(width, height),
            eligible_pixels: eligible_pixels(width, height),
            max_payload: max_payload(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::steganography::Traversal;

    #[test]
    fn test_capacity_estimate() {
        assert_eq!(capacity(100, 100), 1250 - 54);
        assert_eq!(capacity(512, 512), 32768 - 54);
        // 10x10 = 100 pixels, 100 / 8 = 12 which is below the offset
        assert_eq!(capacity(10, 10), 0);
        assert_eq!(capacity(0, 0), 0);
    }

    #[test]
    fn test_eligible_pixels_small_grid() {
        // Only (8,7), (9,7), (7..=9,8), (7..=9,9) have x * y > 54
        assert_eq!(eligible_pixels(10, 10), 8);
        assert_eq!(eligible_pixels(55, 1), 0);
        assert_eq!(eligible_pixels(56, 2), 1);
        assert_eq!(eligible_pixels(0, 100), 0);
        assert_eq!(eligible_pixels(100, 0), 0);
    }

    #[test]
    fn test_eligible_pixels_matches_traversal() {
        for &(w, h) in &[(1, 1), (10, 10), (13, 57), (57, 13), (64, 64), (100, 3), (3, 100)] {
            let walked = Traversal::new(w, h).count() as u64;
            assert_eq!(eligible_pixels(w, h), walked, "grid {}x{}", w, h);
        }
    }

    #[test]
    fn test_max_payload() {
        assert_eq!(max_payload(10, 10), 7);
        assert_eq!(max_payload(1000, 1000), 255);
        assert_eq!(max_payload(5, 5), 0);
    }

    #[test]
    fn test_check_payload() {
        assert_eq!(check_payload(10, 10, 7), Ok(()));
        assert_eq!(
            check_payload(10, 10, 8),
            Err(StegoError::CapacityExceeded {
                required: 9,
                available: 8
            })
        );
        assert_eq!(
            check_payload(4000, 4000, 256),
            Err(StegoError::PayloadTooLarge { len: 256, max: 255 })
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = CapacityReport::new(10, 10);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["eligible_pixels"], 8);
        assert_eq!(json["max_payload"], 7);
        assert_eq!(json["estimate"], 0);
    }
}
