//! # Configuration Utilities
//!
//! Configuration is an explicit value handed to the encoding and decoding
//! functions. Nothing in the library reads process-wide state; the binary
//! builds a [`CodecOptions`] from an optional TOML file and its command-line
//! flags and passes it down.
//!
//! ## Example file
//!
//! ```toml
//! [codec]
//! output_format = "png"
//! layout = "corrected"
//! secret = ""
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::common::image_io::OutputFormat;
use crate::processing::ChannelLayout;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegoConfig = load_config("stego.toml")?;
/// ```
pub fn load_config<T>(path: impl AsRef<Path>) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: T = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub codec: CodecOptions,
}

/// Options for one encode or decode call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Container format of the encoded image
    pub output_format: OutputFormat,
    /// Blue channel packing, see [`ChannelLayout`]
    pub layout: ChannelLayout,
    /// Masking secret; empty disables masking
    pub secret: String,
}
