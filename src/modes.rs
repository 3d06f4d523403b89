// Display modes module
// Aspect ratio and background choices for the framing screen

use image::Rgba;
use std::fmt;

/// A solid background color
pub type Color = Rgba<u8>;

/// Opaque black, the color picked when leaving the blurred background
pub const BLACK: Color = Rgba([0, 0, 0, 255]);

/// Frame aspect ratio shown around the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RatioMode {
    /// 1:1
    Square,
    /// 4:5
    #[default]
    Portrait,
    /// 5:4
    Landscape,
}

impl fmt::Display for RatioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RatioMode::Square => "square",
            RatioMode::Portrait => "portrait",
            RatioMode::Landscape => "landscape",
        };
        f.write_str(name)
    }
}

/// What fills the frame outside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundMode {
    /// Blurred copy of the image itself
    #[default]
    Blur,
    /// A flat color
    SolidColor(Color),
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundMode::Blur => f.write_str("blur"),
            BackgroundMode::SolidColor(Rgba([r, g, b, a])) => {
                write!(f, "solid #{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
            }
        }
    }
}

/// Icon asset name for the ratio button
pub fn ratio_icon(mode: RatioMode) -> &'static str {
    match mode {
        RatioMode::Square => "iconRatioSquare",
        RatioMode::Portrait => "iconRatioPortrait",
        RatioMode::Landscape => "iconRatioLandscape",
    }
}

/// Frame height as a multiple of its width
pub fn height_ratio(mode: RatioMode) -> f32 {
    match mode {
        RatioMode::Square => 1.0,
        RatioMode::Portrait => 1.25,
        RatioMode::Landscape => 0.8,
    }
}

/// Frame size for a given width
pub fn canvas_size(width: u32, mode: RatioMode) -> (u32, u32) {
    let height = (f64::from(width) * f64::from(height_ratio(mode))).round();
    // Heights past u32::MAX saturate
    (width, height as u32)
}

/// Ratio that follows `mode` in the Square -> Portrait -> Landscape cycle
pub fn next_ratio(mode: RatioMode) -> RatioMode {
    match mode {
        RatioMode::Square => RatioMode::Portrait,
        RatioMode::Portrait => RatioMode::Landscape,
        RatioMode::Landscape => RatioMode::Square,
    }
}

/// Background that follows `mode`.
///
/// Every solid color, not only black, goes back to blur.
pub fn next_background(mode: &BackgroundMode) -> BackgroundMode {
    match mode {
        BackgroundMode::Blur => BackgroundMode::SolidColor(BLACK),
        BackgroundMode::SolidColor(_) => BackgroundMode::Blur,
    }
}
