//! # Common Components
//!
//! Shared utilities used by the library API and the command-line binary.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration loading and codec options
//! - [`image_io`]: decoding images into pixel grids and encoding them back

pub mod config;
pub mod image_io;
