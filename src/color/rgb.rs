use std::{fmt, str::FromStr};

use ::palette::IntoColor as _;
use rand::Rng;

use crate::foundation::error::{TextgenError, TextgenResult};

type PaletteHsl = ::palette::Hsl<::palette::encoding::Srgb, f64>;

/// Opaque 8-bit sRGB colour. Formats as lowercase `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the `#rgb` shorthand. The leading `#` is optional.
    pub fn from_hex(s: &str) -> TextgenResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> TextgenResult<u8> {
            let invalid = || TextgenError::validation(format!("invalid hex byte \"{pair}\""));
            // from_str_radix alone would accept a leading '+'.
            if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            u8::from_str_radix(pair, 16).map_err(|_| invalid())
        }

        match s.len() {
            3 if s.is_ascii() => {
                let r = hex_byte(&s[0..1])?;
                let g = hex_byte(&s[1..2])?;
                let b = hex_byte(&s[2..3])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            6 if s.is_ascii() => Ok(Self::new(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            _ => Err(TextgenError::validation(format!(
                "hex color must be #RGB or #RRGGBB, got \"{s}\""
            ))),
        }
    }

    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// Uniform over the 24-bit colour cube.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let [_, r, g, b] = rng.random_range(0u32..=0xFF_FFFF).to_be_bytes();
        Self::new(r, g, b)
    }

    /// Per-channel `255 - v`. Self-inverse.
    pub fn complementary(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Shift every channel by `amount`, saturating at 0 and 255.
    pub fn family(self, amount: i32) -> Self {
        fn shift(c: u8, amount: i32) -> u8 {
            (i32::from(c) + amount).clamp(0, 255) as u8
        }
        Self::new(
            shift(self.r, amount),
            shift(self.g, amount),
            shift(self.b, amount),
        )
    }

    /// Rotate the hue by `degree_shift` degrees, keeping saturation and lightness.
    pub fn analogous(self, degree_shift: f64) -> Self {
        let mut hsl = self.to_palette_hsl();
        hsl.hue += degree_shift;
        Self::from_palette_hsl(hsl)
    }

    pub fn to_hsl(self) -> Hsl {
        let hsl = self.to_palette_hsl();
        Hsl {
            h: hsl.hue.into_positive_degrees(),
            s: hsl.saturation,
            l: hsl.lightness,
        }
    }

    /// Saturation and lightness are clamped to `[0, 1]`; any hue is accepted.
    pub fn from_hsl(hsl: Hsl) -> Self {
        Self::from_palette_hsl(PaletteHsl::new(
            hsl.h,
            hsl.s.clamp(0.0, 1.0),
            hsl.l.clamp(0.0, 1.0),
        ))
    }

    fn to_palette_hsl(self) -> PaletteHsl {
        ::palette::Srgb::new(self.r, self.g, self.b)
            .into_format::<f64>()
            .into_color()
    }

    fn from_palette_hsl(hsl: PaletteHsl) -> Self {
        let rgb: ::palette::Srgb<f64> = hsl.into_color();
        let rgb: ::palette::Srgb<u8> = rgb.into_format();
        Self::new(rgb.red, rgb.green, rgb.blue)
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn luminance(self) -> f64 {
        luminance(self.r, self.g, self.b)
    }

    /// Euclidean distance in RGB space (0..~441.7).
    pub fn distance(self, other: Self) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = TextgenError;

    fn from_str(s: &str) -> TextgenResult<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = TextgenError;

    fn try_from(s: String) -> TextgenResult<Self> {
        Self::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

/// Colour with an optional alpha byte, written as `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: Option<u8>,
}

impl Rgba {
    pub const fn opaque(rgb: Rgb) -> Self {
        Self { rgb, alpha: None }
    }

    pub fn opacity(self) -> f64 {
        self.alpha.map_or(1.0, |a| f64::from(a) / 255.0)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alpha {
            Some(a) => write!(f, "{}{a:02x}", self.rgb),
            None => write!(f, "{}", self.rgb),
        }
    }
}

/// HSL triple: hue in degrees, saturation and lightness in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// WCAG 2.x relative luminance of an sRGB triple (BT.709 weights on linearized channels).
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    fn linear(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// `(lighter + 0.05) / (darker + 0.05)`; symmetric and always `>= 1`.
pub fn contrast_ratio(l1: f64, l2: f64) -> f64 {
    let (hi, lo) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (hi + 0.05) / (lo + 0.05)
}

pub fn complementary(hex: &str) -> TextgenResult<String> {
    Ok(Rgb::from_hex(hex)?.complementary().to_hex())
}

pub fn family_color(hex: &str, amount: i32) -> TextgenResult<String> {
    Ok(Rgb::from_hex(hex)?.family(amount).to_hex())
}

pub fn analogous_color(hex: &str, degree_shift: f64) -> TextgenResult<String> {
    Ok(Rgb::from_hex(hex)?.analogous(degree_shift).to_hex())
}

#[cfg(test)]
#[path = "../../tests/unit/color/rgb.rs"]
mod tests;
