use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
    seq::IndexedRandom as _,
};

use crate::{
    color::{Rgb, dominant_swatches, select_text_color},
    effects::{
        context::{BackgroundDecision, EffectContext},
        style::{FontStyle, StyleDeclaration},
    },
    foundation::{
        core::Probability,
        error::{TextgenError, TextgenResult},
    },
};

/// Frequently seen real-world text colours and their relative weights.
pub const COMMON_TEXT_COLORS: [(Rgb, u32); 30] = [
    (Rgb::new(0x00, 0x00, 0x00), 16),
    (Rgb::new(0xFF, 0xFF, 0xFF), 3),
    (Rgb::new(0x33, 0x33, 0x33), 6),
    (Rgb::new(0x66, 0x66, 0x66), 5),
    (Rgb::new(0x99, 0x99, 0x99), 4),
    (Rgb::new(0xFF, 0x00, 0x00), 2),
    (Rgb::new(0xFF, 0x66, 0x00), 2),
    (Rgb::new(0xFF, 0xD7, 0x00), 1),
    (Rgb::new(0xFF, 0xFF, 0x00), 1),
    (Rgb::new(0x00, 0x80, 0x00), 2),
    (Rgb::new(0x00, 0xFF, 0xFF), 1),
    (Rgb::new(0x00, 0x00, 0xFF), 2),
    (Rgb::new(0x1E, 0x90, 0xFF), 1),
    (Rgb::new(0x80, 0x00, 0x80), 1),
    (Rgb::new(0xFF, 0x69, 0xB4), 1),
    (Rgb::new(0xFF, 0xA5, 0x00), 2),
    (Rgb::new(0xC0, 0xC0, 0xC0), 1),
    (Rgb::new(0xE6, 0xE6, 0xFA), 1),
    (Rgb::new(0xF5, 0xF5, 0xF5), 1),
    (Rgb::new(0xB2, 0x22, 0x22), 1),
    (Rgb::new(0xFF, 0x80, 0xED), 1),
    (Rgb::new(0x06, 0x55, 0x35), 1),
    (Rgb::new(0x13, 0x33, 0x37), 1),
    (Rgb::new(0xFF, 0xC0, 0xCB), 1),
    (Rgb::new(0xFF, 0xE4, 0xE1), 1),
    (Rgb::new(0x00, 0x80, 0x80), 1),
    (Rgb::new(0xC6, 0xE2, 0xFF), 1),
    (Rgb::new(0xB0, 0xE0, 0xE6), 1),
    (Rgb::new(0x40, 0xE0, 0xD0), 1),
    (Rgb::new(0xD3, 0xFF, 0xCE), 1),
];

const FONT_STYLES: [FontStyle; 2] = [FontStyle::Italic, FontStyle::Oblique];

/// Background assumed when no background effect fired.
const DEFAULT_BACKGROUND: Rgb = Rgb::WHITE;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextColorParams {
    /// Swatches taken from a photographic background.
    pub swatch_count: usize,
    /// Chance to replace the complementary colour with a weighted common text colour.
    pub common_color_chance: Probability,
}

impl Default for TextColorParams {
    fn default() -> Self {
        Self {
            swatch_count: 3,
            common_color_chance: Probability::NEVER,
        }
    }
}

impl TextColorParams {
    pub fn validate(&self) -> TextgenResult<()> {
        if self.swatch_count == 0 {
            return Err(TextgenError::validation(
                "text_color.swatch_count must be > 0",
            ));
        }
        Ok(())
    }
}

/// Text group output. `text_color` is what later effects derive related colours from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextContribution {
    pub text_color: Option<Rgb>,
    pub declarations: Vec<StyleDeclaration>,
}

impl TextContribution {
    fn styled(declaration: StyleDeclaration) -> Self {
        Self {
            text_color: None,
            declarations: vec![declaration],
        }
    }
}

pub(crate) fn text_color<R: Rng + ?Sized>(
    params: &TextColorParams,
    ctx: &EffectContext<'_>,
    background: &BackgroundDecision,
    rng: &mut R,
) -> TextgenResult<TextContribution> {
    let color = match background {
        BackgroundDecision::Image { name } => {
            let bitmap = ctx.images.bitmap(name)?;
            let swatches: Vec<Rgb> = dominant_swatches(&bitmap, params.swatch_count)?
                .into_iter()
                .map(|s| s.color)
                .collect();
            select_text_color(&swatches)
        }
        BackgroundDecision::Color(fill) => complementary_or_common(fill.base(), params, rng),
        BackgroundDecision::None => complementary_or_common(DEFAULT_BACKGROUND, params, rng),
    };
    tracing::debug!(background = background.kind(), %color, "text colour chosen");

    Ok(TextContribution {
        text_color: Some(color),
        declarations: vec![StyleDeclaration::Color(color)],
    })
}

fn complementary_or_common<R: Rng + ?Sized>(
    base: Rgb,
    params: &TextColorParams,
    rng: &mut R,
) -> Rgb {
    if params.common_color_chance.roll(rng) {
        weighted_common_color(rng)
    } else {
        base.complementary()
    }
}

pub fn weighted_common_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    match WeightedIndex::new(COMMON_TEXT_COLORS.iter().map(|(_, w)| *w)) {
        Ok(dist) => COMMON_TEXT_COLORS[dist.sample(rng)].0,
        Err(_) => COMMON_TEXT_COLORS[0].0,
    }
}

pub(crate) fn font_style<R: Rng + ?Sized>(rng: &mut R) -> TextContribution {
    let style = *FONT_STYLES.choose(rng).unwrap_or(&FontStyle::Italic);
    TextContribution::styled(StyleDeclaration::FontStyle(style))
}

pub(crate) fn font_weight<R: Rng + ?Sized>(rng: &mut R) -> TextContribution {
    let weight = rng.random_range(1..=9u16) * 100;
    TextContribution::styled(StyleDeclaration::FontWeight(weight))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/text.rs"]
mod tests;
