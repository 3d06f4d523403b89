// Command line interface module
// Handles parsing of command line arguments and stdin input

use crate::image_loader::ImageSource;
use crate::share::ShareTarget;
use anyhow::{bail, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::PathBuf;

/// reframe - Frame a photo and hand it to a photo-sharing app
#[derive(Parser, Debug)]
#[command(name = "reframe")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the image file (can also be provided via stdin pipe)
    #[arg(value_name = "IMAGE")]
    pub image_path: Option<PathBuf>,

    /// Directory used as the photo library
    #[arg(short, long, value_name = "DIR", default_value = "library")]
    pub library: PathBuf,

    /// Number of taps on the ratio button
    #[arg(short, long, default_value_t = 0)]
    pub ratio_taps: u32,

    /// Number of taps on the background button
    #[arg(short, long, default_value_t = 0)]
    pub background_taps: u32,

    /// Name of the app photos are shared to
    #[arg(long, default_value = "Instagram", value_parser = parse_non_empty)]
    pub target_name: String,

    /// URL scheme of the app photos are shared to
    #[arg(long, default_value = "instagram", value_parser = parse_scheme)]
    pub target_scheme: String,

    /// Only print the framing, do not save or share
    #[arg(long, default_value = "false")]
    pub no_share: bool,
}

/// Parsed arguments with resolved image source
#[derive(Debug)]
pub struct ParsedArgs {
    pub source: ImageSource,
    pub library: PathBuf,
    pub ratio_taps: u32,
    pub background_taps: u32,
    pub target: ShareTarget,
    /// Save and share after framing (default true, set to false with --no-share)
    pub share: bool,
}

fn parse_non_empty(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Value must not be empty".to_string());
    }
    Ok(s.to_string())
}

/// URL schemes: a letter, then letters, digits, '+', '-' or '.'
fn parse_scheme(s: &str) -> Result<String, String> {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return Err("Scheme must start with a letter".to_string()),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return Err("Scheme may only contain letters, digits, '+', '-' and '.'".to_string());
    }
    Ok(s.to_ascii_lowercase())
}

/// Check if stdin has data available (is a pipe)
fn stdin_has_data() -> bool {
    !atty::is(atty::Stream::Stdin)
}

/// Read image data from stdin
fn read_stdin() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Parse command line arguments and handle stdin input
pub fn parse_args() -> Result<ParsedArgs> {
    let args = Args::parse();
    let piped = if args.image_path.is_none() && stdin_has_data() {
        Some(read_stdin()?)
    } else {
        None
    };
    resolve(args, piped)
}

fn resolve(args: Args, piped: Option<Vec<u8>>) -> Result<ParsedArgs> {
    // A path wins over piped data
    let source = match (args.image_path, piped) {
        (Some(path), _) => ImageSource::Path(path),
        (None, Some(data)) => {
            if data.is_empty() {
                bail!("No data received from stdin");
            }
            ImageSource::Bytes(data)
        }
        (None, None) => bail!(
            "No image provided. Please provide an image path or pipe image data to stdin.\n\
             Usage: reframe <IMAGE> [OPTIONS]\n\
             Or:    cat image.png | reframe [OPTIONS]"
        ),
    };

    Ok(ParsedArgs {
        source,
        library: args.library,
        ratio_taps: args.ratio_taps,
        background_taps: args.background_taps,
        target: ShareTarget::new(args.target_name, args.target_scheme),
        share: !args.no_share,
    })
}
