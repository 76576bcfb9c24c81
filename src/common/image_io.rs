//! # Image I/O
//!
//! Turns encoded image files into pixel grids for the codec and back.
//!
//! Any container the `image` crate can decode is accepted as input. Output is
//! written as PNG, JPEG, GIF or BMP, or in the input's own format with
//! [`OutputFormat::Auto`]. Only PNG and BMP are lossless; JPEG and GIF will
//! destroy the embedded bits, which is reported with a warning but not
//! refused.

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::common::config::CodecOptions;
use crate::processing::{CapacityReport, Codec, EmbedReport, Payload};

/// Requested output container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
    Bmp,
    /// Same format as the input image
    Auto,
}

impl OutputFormat {
    /// Concrete format to write, given the format the input was decoded from.
    ///
    /// # Errors
    /// Fails for `Auto` when the input format cannot be written back.
    pub fn resolve(self, input: ImageFormat) -> Result<ImageFormat> {
        match self {
            OutputFormat::Png => Ok(ImageFormat::Png),
            OutputFormat::Jpeg => Ok(ImageFormat::Jpeg),
            OutputFormat::Gif => Ok(ImageFormat::Gif),
            OutputFormat::Bmp => Ok(ImageFormat::Bmp),
            OutputFormat::Auto => match input {
                ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::Bmp => {
                    Ok(input)
                }
                other => Err(anyhow!("unsupported image format: {:?}", other)),
            },
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "gif" => Ok(OutputFormat::Gif),
            "bmp" => Ok(OutputFormat::Bmp),
            "auto" => Ok(OutputFormat::Auto),
            other => Err(format!(
                "unsupported output format '{}' (expected png, jpeg, gif, bmp or auto)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Gif => "gif",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Auto => "auto",
        };
        write!(f, "{}", name)
    }
}

/// File extension used for a written format.
pub fn extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpg",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        _ => "png",
    }
}

fn is_lossy(format: ImageFormat) -> bool {
    matches!(format, ImageFormat::Jpeg | ImageFormat::Gif)
}

/// Decode image bytes into an RGBA grid, returning the detected format too.
pub fn decode_image(image_bytes: &[u8]) -> Result<(RgbaImage, ImageFormat)> {
    let format = image::guess_format(image_bytes).context("unrecognized image format")?;
    let grid = image::load_from_memory_with_format(image_bytes, format)
        .with_context(|| format!("failed to decode {:?} image", format))?
        .to_rgba8();

    debug!(
        "Decoded {:?} image {}x{}",
        format,
        grid.width(),
        grid.height()
    );

    Ok((grid, format))
}

/// Encode a grid into the given container format.
///
/// JPEG has no alpha channel, so it is written from an RGB copy.
pub fn encode_image(grid: &RgbaImage, format: ImageFormat) -> Result<Vec<u8>> {
    if is_lossy(format) {
        warn!(
            "{:?} is lossy; the hidden payload will most likely not survive",
            format
        );
    }

    let mut output_bytes = Vec::new();
    let mut cursor = Cursor::new(&mut output_bytes);
    let written = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(grid.clone())
            .to_rgb8()
            .write_to(&mut cursor, format),
        _ => grid.write_to(&mut cursor, format),
    };
    written.with_context(|| format!("failed to encode {:?} image", format))?;

    Ok(output_bytes)
}

/// An encoded carrier image and what went into it.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub report: EmbedReport,
}

/// Embed `data` into an encoded image and return the re-encoded carrier.
///
/// # Arguments
/// - `image_bytes`: Raw bytes of the cover image (any format supported by `image`)
/// - `data`: Payload to hide, at most 255 bytes
/// - `options`: Output format, channel layout and secret
///
/// # Errors
/// - The cover image cannot be decoded
/// - The payload is too large or the image too small (see [`StegoError`](crate::StegoError))
/// - Encoding the output format fails
///
/// # Example
/// ```ignore
/// let cover = std::fs::read("lena.png")?;
/// let encoded = embed_image_bytes(&cover, b"Hide me!", &CodecOptions::default())?;
/// std::fs::write("lena-enc.png", encoded.bytes)?;
/// ```
pub fn embed_image_bytes(
    image_bytes: &[u8],
    data: &[u8],
    options: &CodecOptions,
) -> Result<EncodedImage> {
    let (mut grid, input_format) = decode_image(image_bytes)?;
    let format = options.output_format.resolve(input_format)?;

    let payload = Payload::new(data, options.secret.as_str());
    let report = Codec::new(options.layout).embed(&mut grid, &payload)?;

    let bytes = encode_image(&grid, format)?;

    info!(
        "Embedded {} bytes into {}x{} image ({:?} -> {:?}, {} bytes)",
        report.payload_len,
        grid.width(),
        grid.height(),
        input_format,
        format,
        bytes.len()
    );

    Ok(EncodedImage {
        bytes,
        format,
        report,
    })
}

/// Extract the payload hidden in an encoded image.
///
/// A wrong secret, or an image that never had anything embedded, is not an
/// error: the result is simply meaningless bytes.
pub fn extract_image_bytes(image_bytes: &[u8], secret: &str) -> Result<Vec<u8>> {
    let (grid, _) = decode_image(image_bytes)?;
    let data = Codec::default().extract(&grid, secret)?;

    info!(
        "Extracted {} bytes from {}x{} image",
        data.len(),
        grid.width(),
        grid.height()
    );

    Ok(data)
}

/// Capacity figures for an encoded image, read from its header only.
pub fn capacity_report(image_bytes: &[u8]) -> Result<CapacityReport> {
    let (width, height) = image::io::Reader::new(Cursor::new(image_bytes))
        .with_guessed_format()
        .context("failed to read image header")?
        .into_dimensions()
        .context("failed to read image dimensions")?;

    Ok(CapacityReport::new(width, height))
}

/// Where to write the carrier image.
///
/// Without an explicit path the output is `<stem>-enc.<ext>` in the current
/// directory. An explicit path without an extension gets one from `format`.
pub fn output_path(requested: Option<&Path>, input: &Path, format: ImageFormat) -> PathBuf {
    match requested {
        Some(path) if path.extension().is_some() => path.to_path_buf(),
        Some(path) => path.with_extension(extension(format)),
        None => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            PathBuf::from(format!("{}-enc.{}", stem, extension(format)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([90, 160, 210, 255]));
        encode_image(&img, ImageFormat::Png).unwrap()
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("PNG".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!("jpg".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("auto".parse::<OutputFormat>(), Ok(OutputFormat::Auto));
        assert!("tiff".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Gif.to_string(), "gif");
    }

    #[test]
    fn test_resolve_auto() {
        assert_eq!(
            OutputFormat::Auto.resolve(ImageFormat::Bmp).unwrap(),
            ImageFormat::Bmp
        );
        assert_eq!(
            OutputFormat::Png.resolve(ImageFormat::Jpeg).unwrap(),
            ImageFormat::Png
        );
        assert!(OutputFormat::Auto.resolve(ImageFormat::Tiff).is_err());
    }

    #[test]
    fn test_output_path() {
        let input = Path::new("photos/lena.jpeg");
        assert_eq!(
            output_path(None, input, ImageFormat::Png),
            PathBuf::from("lena-enc.png")
        );
        assert_eq!(
            output_path(Some(Path::new("out")), input, ImageFormat::Bmp),
            PathBuf::from("out.bmp")
        );
        assert_eq!(
            output_path(Some(Path::new("dir/out.png")), input, ImageFormat::Gif),
            PathBuf::from("dir/out.png")
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn test_png_roundtrip_preserves_payload() {
        let cover = png_bytes(32, 32);
        let options = CodecOptions {
            secret: "pwd".to_string(),
            ..CodecOptions::default()
        };

        let encoded = embed_image_bytes(&cover, b"Hide me!", &options).unwrap();
        assert_eq!(encoded.format, ImageFormat::Png);
        assert_eq!(encoded.report.pixels_written, 9);

        let data = extract_image_bytes(&encoded.bytes, "pwd").unwrap();
        assert_eq!(data, b"Hide me!");
    }

    #[test]
    fn test_bmp_auto_roundtrip() {
        let img = RgbaImage::from_pixel(40, 40, Rgba([1, 2, 3, 255]));
        let cover = encode_image(&img, ImageFormat::Bmp).unwrap();
        let options = CodecOptions {
            output_format: OutputFormat::Auto,
            ..CodecOptions::default()
        };

        let encoded = embed_image_bytes(&cover, b"bitmap", &options).unwrap();
        assert_eq!(encoded.format, ImageFormat::Bmp);
        assert_eq!(extract_image_bytes(&encoded.bytes, "").unwrap(), b"bitmap");
    }

    #[test]
    fn test_capacity_report_from_header() {
        let report = capacity_report(&png_bytes(100, 100)).unwrap();
        assert_eq!(report.width, 100);
        assert_eq!(report.estimate, 1250 - 54);
        assert_eq!(report.max_payload, 255);
    }
}
