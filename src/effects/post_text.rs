use std::f64::consts::TAU;

use kurbo::Vec2;
use rand::Rng;

use crate::{
    color::{Rgb, Rgba},
    effects::style::{Shadow, StyleDeclaration},
    foundation::{
        core::{FloatRange, IntRange, Probability},
        error::TextgenResult,
    },
};

/// Outline colour base when no text colour was chosen.
const DEFAULT_TEXT_COLOR: Rgb = Rgb::BLACK;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrokeParams {
    /// Outline radius in px.
    pub size: FloatRange,
    /// Channel shift when the outline is darker than the text.
    pub darken: IntRange,
    /// Channel shift when the outline is lighter than the text.
    pub lighten: IntRange,
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self {
            size: FloatRange::new(0.8, 4.8),
            darken: IntRange::new(-160, -40),
            lighten: IntRange::new(40, 140),
        }
    }
}

impl StrokeParams {
    pub fn validate(&self) -> TextgenResult<()> {
        self.size.validate("stroke.size")?;
        self.darken.validate("stroke.darken")?;
        self.lighten.validate("stroke.lighten")
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextShadowParams {
    pub count: IntRange,
    pub offset: IntRange,
    pub blur: IntRange,
    pub alpha_chance: Probability,
    /// Alpha byte range when a translucent colour is drawn.
    pub alpha: IntRange,
}

impl Default for TextShadowParams {
    fn default() -> Self {
        Self {
            count: IntRange::new(1, 3),
            offset: IntRange::new(-5, 5),
            blur: IntRange::new(0, 14),
            alpha_chance: Probability::literal(0.7),
            alpha: IntRange::new(10, 99),
        }
    }
}

impl TextShadowParams {
    pub fn validate(&self) -> TextgenResult<()> {
        self.count.validate("text_shadow.count")?;
        self.offset.validate("text_shadow.offset")?;
        self.blur.validate("text_shadow.blur")?;
        self.alpha.validate("text_shadow.alpha")?;
        if self.count.min < 1 || self.blur.min < 0 || self.alpha.min < 0 || self.alpha.max > 255 {
            return Err(crate::TextgenError::validation(
                "text_shadow: count must be >= 1, blur >= 0 and alpha within 0..=255",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotationParams {
    /// Degrees; clockwise is positive.
    pub angle: FloatRange,
}

impl Default for RotationParams {
    fn default() -> Self {
        Self {
            angle: FloatRange::symmetric(7.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformParams {
    /// Horizontal translation in percent of the text box width.
    pub x_pct: FloatRange,
    /// Vertical translation in percent of the text box height.
    pub y_pct: FloatRange,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            x_pct: FloatRange::symmetric(22.5),
            y_pct: FloatRange::symmetric(27.5),
        }
    }
}

/// Offsets approximating a circular outline of radius `size`: the angle walks from 0 towards
/// 2π in steps of `1 / size`, one offset per step.
pub fn stroke_offsets(size: f64) -> Vec<Vec2> {
    if !size.is_finite() || size <= 0.0 {
        return Vec::new();
    }
    let step = 1.0 / size;
    let mut out = Vec::with_capacity((TAU / step).ceil() as usize);
    let mut angle = 0.0;
    while angle < TAU {
        out.push(Vec2::from_angle(angle) * size);
        angle += step;
    }
    out
}

/// Outline built from shadow copies in a colour from the text colour's family.
pub fn stroke_with_size<R: Rng + ?Sized>(
    params: &StrokeParams,
    text_color: Option<Rgb>,
    size: f64,
    rng: &mut R,
) -> StyleDeclaration {
    let amount = if rng.random_bool(0.5) {
        params.darken.sample(rng)
    } else {
        params.lighten.sample(rng)
    };
    let amount = i32::try_from(amount).unwrap_or(if amount < 0 { i32::MIN } else { i32::MAX });
    let color = Rgba::opaque(text_color.unwrap_or(DEFAULT_TEXT_COLOR).family(amount));

    StyleDeclaration::TextShadow(
        stroke_offsets(size)
            .into_iter()
            .map(|offset| Shadow {
                offset,
                blur: 0.0,
                color,
            })
            .collect(),
    )
}

pub(crate) fn stroke<R: Rng + ?Sized>(
    params: &StrokeParams,
    text_color: Option<Rgb>,
    rng: &mut R,
) -> StyleDeclaration {
    let size = params.size.sample(rng);
    stroke_with_size(params, text_color, size, rng)
}

pub(crate) fn text_shadow<R: Rng + ?Sized>(
    params: &TextShadowParams,
    rng: &mut R,
) -> StyleDeclaration {
    let n = params.count.sample(rng).max(1);
    let shadows = (0..n)
        .map(|_| {
            let offset = Vec2::new(
                params.offset.sample(rng) as f64,
                params.offset.sample(rng) as f64,
            );
            let blur = params.blur.sample(rng).max(0) as f64;
            let rgb = Rgb::random(rng);
            let alpha = params
                .alpha_chance
                .roll(rng)
                .then(|| params.alpha.sample(rng).clamp(0, 255) as u8);
            Shadow {
                offset,
                blur,
                color: Rgba { rgb, alpha },
            }
        })
        .collect();
    StyleDeclaration::TextShadow(shadows)
}

pub(crate) fn rotation<R: Rng + ?Sized>(params: &RotationParams, rng: &mut R) -> StyleDeclaration {
    StyleDeclaration::Rotate {
        degrees: params.angle.sample(rng),
    }
}

pub(crate) fn transform<R: Rng + ?Sized>(
    params: &TransformParams,
    rng: &mut R,
) -> StyleDeclaration {
    StyleDeclaration::Translate {
        x_pct: params.x_pct.sample(rng),
        y_pct: params.y_pct.sample(rng),
    }
}
