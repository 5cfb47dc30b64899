//! Cell colors and color string parsing
//!
//! A grid cell is either [`Color::Transparent`] or an RGBA value. Colors are
//! compared by value and serialize as `"transparent"`, `#RRGGBB` (opaque) or
//! `#RRGGBBAA`.
//!
//! User-supplied color strings accept the following formats:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`, `oklch()`
//! - Named: `red`, `blue`, `transparent`, etc.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    /// Hex body is not 3, 4, 6 or 8 digits long
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// Rejected by the CSS color parser
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// The value held by a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    /// Empty cell; renderers show the background through it.
    #[default]
    Transparent,
    /// A straight (non-premultiplied) RGBA value with non-zero alpha.
    Rgba([u8; 4]),
}

impl Color {
    /// Build a color from RGBA channels. Zero alpha collapses to `Transparent`.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        if a == 0 {
            Color::Transparent
        } else {
            Color::Rgba([r, g, b, a])
        }
    }

    /// Fully opaque color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba([r, g, b, 255])
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, Color::Transparent)
    }

    /// Pixel value for image output; transparent maps to all zeros.
    pub fn to_pixel(&self) -> Rgba<u8> {
        match self {
            Color::Transparent => Rgba([0, 0, 0, 0]),
            Color::Rgba(c) => Rgba(*c),
        }
    }

    /// Inverse of [`Color::to_pixel`].
    pub fn from_pixel(pixel: Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Color::rgba(r, g, b, a)
    }

    /// Scale the alpha channel by `opacity` (clamped to 0.0-1.0).
    pub fn with_opacity(&self, opacity: f32) -> Self {
        match self {
            Color::Transparent => Color::Transparent,
            Color::Rgba([r, g, b, a]) => {
                let scaled = (*a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
                Color::rgba(*r, *g, *b, scaled)
            }
        }
    }

    /// Hex representation: `#rrggbb` when opaque, `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        match self {
            Color::Transparent => "#00000000".to_string(),
            Color::Rgba([r, g, b, 255]) => format!("#{:02x}{:02x}{:02x}", r, g, b),
            Color::Rgba([r, g, b, a]) => format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Transparent => f.write_str("transparent"),
            _ => f.write_str(&self.to_hex()),
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s.trim()).map(Color::from_pixel)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Parse a color string as typed into the editor.
///
/// `#` prefixes take the hex path: short forms double each digit and a
/// missing alpha means opaque. Anything else goes to the CSS color parser,
/// so `rgb(...)`, `hsl(...)` and named colors all work. Cell semantics
/// (alpha 0 is transparent) are applied by [`Color`], not here.
///
/// ```
/// use pixelsprite::color::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("#00ff0080").unwrap(), image::Rgba([0, 255, 0, 128]));
/// assert_eq!(parse_color("blue").unwrap(), image::Rgba([0, 0, 255, 255]));
/// assert!(parse_color("").is_err());
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    // Fast path for hex colors
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    parse_css_color(s)
}

/// Parse the digits of a hex color (without the leading `#`)
fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, ColorError> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c)))
        .collect::<Result<Vec<u8>, _>>()?;

    match digits.as_slice() {
        // #RGB / #RGBA -> doubled digits
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r0, g1, g0, b1, b0] => Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, 255])),
        [r1, r0, g1, g0, b1, b0, a1, a0] => {
            Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, a1 * 16 + a0]))
        }
        _ => Err(ColorError::InvalidLength(digits.len())),
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    css_color_to_rgba(css_color)
}

/// Convert a lightningcss CssColor to RGBA
fn css_color_to_rgba(color: CssColor) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let rgb_color = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            // Components with 'none' values come back as floats
            FloatColor::RGB(rgb) => {
                let r = (rgb.r * 255.0).round() as u8;
                let g = (rgb.g * 255.0).round() as u8;
                let b = (rgb.b * 255.0).round() as u8;
                let a = (rgb.alpha * 255.0).round() as u8;
                Ok(Rgba([r, g, b, a]))
            }
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}
