//! Slab colours: hex parsing, legend formatting and the floor gradient.

use crate::errors::ColorError;
use crate::float_types::Real;
use std::fmt;
use std::str::FromStr;

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (the `#` is optional, case-insensitive).
    ///
    /// ## Errors
    /// [`ColorError::BadHex`] for any other length or a non-hex digit.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let bad = || ColorError::BadHex(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| bad());

        match digits.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, i) in rgb.iter_mut().zip(0..3) {
                    // #abc expands to #aabbcc
                    *slot = channel(&digits[i..i + 1])? * 17;
                }
                Ok(Color::new(rgb[0], rgb[1], rgb[2]))
            },
            6 => Ok(Color::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(bad()),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba(r,g,b,a)`; `alpha` is clamped to `[0, 1]`.
    pub fn to_rgba_string(&self, alpha: Real) -> String {
        let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
        format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }

    /// Linear interpolation per channel, rounded to the nearest integer.
    pub fn lerp(&self, other: &Color, t: Real) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as Real + (b as Real - a as Real) * t).round() as u8;
        Color::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Four-stop linear gradient. Stops sit at 0, 0.33, 0.66 and 1.0 of the range
/// being coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub stops: [Color; 4],
}

const STOP_FRACTIONS: [Real; 4] = [0.0, 0.33, 0.66, 1.0];

impl Default for Gradient {
    fn default() -> Self {
        Gradient::new([
            Color::new(0xfc, 0xb8, 0x43),
            Color::new(0xc2, 0x14, 0x9f),
            Color::new(0x0c, 0xc4, 0xbd),
            Color::new(0x02, 0x70, 0xe9),
        ])
    }
}

impl Gradient {
    pub const fn new(stops: [Color; 4]) -> Self {
        Gradient { stops }
    }

    /// Build a gradient from four hex strings.
    pub fn from_hex(stops: [&str; 4]) -> Result<Self, ColorError> {
        Ok(Gradient::new([
            Color::from_hex(stops[0])?,
            Color::from_hex(stops[1])?,
            Color::from_hex(stops[2])?,
            Color::from_hex(stops[3])?,
        ]))
    }

    /// Colour of `value` in a range spanning `0..=count`.
    pub fn sample(&self, value: Real, count: usize) -> Color {
        let span = count as Real;
        if span <= 0.0 || !value.is_finite() {
            return self.stops[0];
        }
        let value = value.clamp(0.0, span);
        let domain = STOP_FRACTIONS.map(|f| f * span);

        let segment = (0..3).find(|&k| value <= domain[k + 1]).unwrap_or(2);
        let width = domain[segment + 1] - domain[segment];
        let t = if width > 0.0 { (value - domain[segment]) / width } else { 0.0 };
        self.stops[segment].lerp(&self.stops[segment + 1], t)
    }

    /// One colour per slab, slab `i` sampled at `i` over `0..=count`.
    pub fn palette(&self, count: usize) -> Vec<Color> {
        (0..count).map(|i| self.sample(i as Real, count)).collect()
    }
}
