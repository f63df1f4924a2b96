//! Colour science used by the style engine: hex/RGB/HSL conversions, derived colours,
//! WCAG luminance and contrast, palette extraction and readable-text selection.

pub mod palette;
pub mod readable;
pub mod rgb;

pub use self::palette::{Swatch, dominant_swatches};
pub use self::readable::select_text_color;
pub use self::rgb::{Hsl, Rgb, Rgba, analogous_color, complementary, contrast_ratio, family_color, luminance};
