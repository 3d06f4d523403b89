// Image loading module
// Decodes the picture being framed, from a file or from piped bytes

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Where the picture comes from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image file on disk
    Path(PathBuf),
    /// Encoded image bytes (e.g. read from stdin)
    Bytes(Vec<u8>),
}

/// Load and decode the picture
pub fn load_image(source: &ImageSource) -> Result<DynamicImage> {
    match source {
        ImageSource::Bytes(data) => load_from_bytes(data),
        ImageSource::Path(path) => {
            let data = fs::read(path)
                .with_context(|| format!("Failed to read image file: {}", path.display()))?;
            load_from_bytes(&data)
        }
    }
}

/// Load an image from raw bytes, auto-detecting the format
fn load_from_bytes(data: &[u8]) -> Result<DynamicImage> {
    let format = image::guess_format(data).context("Failed to detect image format")?;

    let cursor = Cursor::new(data);
    let img = image::load(cursor, format).context("Failed to decode image")?;

    Ok(img)
}

/// Get the appropriate image format from file extension
pub fn format_from_extension(ext: &str) -> Option<ImageFormat> {
    match ext.to_lowercase().as_str() {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "gif" => Some(ImageFormat::Gif),
        "webp" => Some(ImageFormat::WebP),
        "bmp" => Some(ImageFormat::Bmp),
        "ico" => Some(ImageFormat::Ico),
        "tiff" | "tif" => Some(ImageFormat::Tiff),
        _ => None,
    }
}

/// Image format implied by a path's extension, if any
pub fn format_from_path(path: &Path) -> Option<ImageFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(format_from_extension)
}
