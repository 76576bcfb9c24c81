//! # stego Binary Entry Point
//!
//! Thin command-line wrapper around the library.
//!
//! ## Usage
//!
//! ```bash
//! # Hide a message (writes lena-enc.png)
//! stego -e -p lena.png -m "Lena is beautiful."
//!
//! # Hide a masked message as BMP into out.bmp
//! stego -e -p lena.png -m "Lena is beautiful." --pwd secret -f bmp -o out
//!
//! # Recover it
//! stego -d -p out.bmp --pwd secret
//!
//! # Show how many characters an image can hold
//! stego -p lena.png
//! ```
//!
//! Options can also be read from a TOML file with `--config`; flags given on
//! the command line override the file.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use stego_lsb::common::config::{load_config, CodecOptions, StegoConfig};
use stego_lsb::common::image_io::{self, OutputFormat};
use stego_lsb::ChannelLayout;

/// Hide a message in the low bits of an image, or read it back.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Encode a message into the image
    #[arg(short, long, conflicts_with = "decode")]
    encode: bool,

    /// Decode a message from the image
    #[arg(short, long)]
    decode: bool,

    /// Message to be encoded (at most 255 bytes)
    #[arg(short, long)]
    message: Option<String>,

    /// Image file to encode into or decode from
    #[arg(short = 'p', long = "image")]
    image: Option<PathBuf>,

    /// Output file name; the extension is added from the format if missing
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Password used to mask the message
    #[arg(long)]
    pwd: Option<String>,

    /// Output format: png, jpeg, gif, bmp or auto
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Blue channel packing: corrected or legacy
    #[arg(long)]
    layout: Option<ChannelLayout>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the capacity report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// Logs go to stderr so that decoded payloads on stdout stay clean.
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .init();
}

/// Print a usage error and exit, like clap does for its own errors.
fn exit_with_usage(message: &str) -> ! {
    Args::command()
        .error(ErrorKind::MissingRequiredArgument, message)
        .exit()
}

fn codec_options(args: &Args) -> Result<CodecOptions> {
    let mut options = match &args.config {
        Some(path) => load_config::<StegoConfig>(path)?.codec,
        None => CodecOptions::default(),
    };

    if let Some(format) = args.format {
        options.output_format = format;
    }
    if let Some(layout) = args.layout {
        options.layout = layout;
    }
    if let Some(pwd) = &args.pwd {
        options.secret = pwd.clone();
    }

    Ok(options)
}

fn encode(image: &Path, message: &str, output: Option<&Path>, options: &CodecOptions) -> Result<()> {
    let cover = fs::read(image).with_context(|| format!("failed to open {}", image.display()))?;

    let report = image_io::capacity_report(&cover)?;
    if message.len() as u64 > report.estimate {
        warn!(
            "{} is above the estimated capacity of {} characters for {}",
            message.len(),
            report.estimate,
            image.display()
        );
    }

    let encoded = image_io::embed_image_bytes(&cover, message.as_bytes(), options)?;
    let path = image_io::output_path(output, image, encoded.format);
    fs::write(&path, &encoded.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(
        "Wrote {} ({} of {} eligible pixels used)",
        path.display(),
        encoded.report.pixels_written,
        encoded.report.eligible_pixels
    );

    Ok(())
}

fn decode(image: &Path, secret: &str) -> Result<()> {
    let carrier = fs::read(image).with_context(|| format!("failed to open {}", image.display()))?;
    let data = image_io::extract_image_bytes(&carrier, secret)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(&data)?;
    out.flush()?;

    Ok(())
}

fn print_capacity(image: &Path, json: bool) -> Result<()> {
    let bytes = fs::read(image).with_context(|| format!("failed to open {}", image.display()))?;
    let report = image_io::capacity_report(&bytes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} can hold {} characters", image.display(), report.estimate);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let options = codec_options(&args)?;

    if args.encode {
        let (Some(image), Some(message)) = (&args.image, &args.message) else {
            exit_with_usage("need to specify -p and -m");
        };
        return encode(image, message, args.output.as_deref(), &options);
    }

    let Some(image) = &args.image else {
        exit_with_usage("please specify -p");
    };

    if args.decode {
        decode(image, &options.secret)
    } else {
        print_capacity(image, args.json)
    }
}
