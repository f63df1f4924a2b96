use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    color::Rgb,
    effects::{
        context::{BackgroundDecision, EffectContext},
        style::{Fill, StyleDeclaration},
    },
    foundation::{
        core::{FloatRange, IntRange, Probability},
        error::{TextgenError, TextgenResult},
    },
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundColorParams {
    /// Chance that the gradient's second stop is an analogous colour instead of a random one.
    pub analogous_chance: Probability,
    /// Magnitude of the analogous hue shift, in degrees; the sign is random.
    pub analogous_shift: FloatRange,
    /// Extra chance of a solid fill on top of the one-in-three draw.
    pub solid_bias: Probability,
    pub gradient_angle: IntRange,
}

impl Default for BackgroundColorParams {
    fn default() -> Self {
        Self {
            analogous_chance: Probability::literal(0.5),
            analogous_shift: FloatRange::new(20.0, 60.0),
            solid_bias: Probability::literal(0.4),
            gradient_angle: IntRange::new(0, 360),
        }
    }
}

impl BackgroundColorParams {
    pub fn validate(&self) -> TextgenResult<()> {
        self.analogous_shift.validate("background_color.analogous_shift")?;
        self.gradient_angle.validate("background_color.gradient_angle")
    }
}

/// Background group output: the decision plus the container declarations backing it.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundContribution {
    pub decision: BackgroundDecision,
    pub declarations: Vec<StyleDeclaration>,
}

pub(crate) fn background_color<R: Rng + ?Sized>(
    params: &BackgroundColorParams,
    rng: &mut R,
) -> BackgroundContribution {
    let primary = Rgb::random(rng);
    let secondary = if params.analogous_chance.roll(rng) {
        let shift = params.analogous_shift.sample(rng);
        let shift = if rng.random_bool(0.5) { shift } else { -shift };
        primary.analogous(shift)
    } else {
        Rgb::random(rng)
    };

    let kind = rng.random_range(1..=3u8);
    let fill = if kind == 1 || params.solid_bias.roll(rng) {
        Fill::Solid(primary)
    } else if kind == 2 {
        Fill::LinearGradient {
            angle_deg: params.gradient_angle.sample(rng) as f64,
            from: primary,
            to: secondary,
        }
    } else {
        Fill::RadialGradient {
            from: primary,
            to: secondary,
        }
    };

    BackgroundContribution {
        decision: BackgroundDecision::Color(fill),
        declarations: vec![StyleDeclaration::Background(fill)],
    }
}

/// Picks a random photograph. With an empty pool this declines, or fails with a configuration
/// error when image backgrounds are required.
pub(crate) fn background_image<R: Rng + ?Sized>(
    ctx: &EffectContext<'_>,
    rng: &mut R,
) -> TextgenResult<Option<BackgroundContribution>> {
    let Some(name) = ctx.images.names().choose(rng) else {
        if ctx.require_background_images {
            return Err(TextgenError::config(
                "image backgrounds are required but no background images were supplied",
            ));
        }
        return Ok(None);
    };

    Ok(Some(BackgroundContribution {
        decision: BackgroundDecision::Image { name: name.clone() },
        declarations: vec![
            StyleDeclaration::BackgroundImage { name: name.clone() },
            StyleDeclaration::BackgroundCover,
        ],
    }))
}
