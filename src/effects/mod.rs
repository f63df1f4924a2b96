pub mod background;
pub mod context;
pub mod post_text;
pub mod style;
pub mod text;

use rand::Rng;

pub use background::{BackgroundColorParams, BackgroundContribution};
pub use context::{BackgroundDecision, EffectContext};
pub use post_text::{
    RotationParams, StrokeParams, TextShadowParams, TransformParams, stroke_offsets,
};
pub use style::{Fill, FontStyle, Shadow, StyleDeclaration, StyleSheet};
pub use text::{COMMON_TEXT_COLORS, TextColorParams, TextContribution, weighted_common_color};

use crate::{
    color::Rgb,
    foundation::{
        core::Probability,
        error::{TextgenError, TextgenResult},
    },
};

/// Pipeline stage an effect belongs to. Stages run in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectGroup {
    Background,
    Text,
    PostText,
}

/// Closed set of style effects, each carrying its tunables.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    BackgroundColor(BackgroundColorParams),
    BackgroundImage,
    TextColor(TextColorParams),
    FontStyle,
    FontWeight,
    Stroke(StrokeParams),
    TextShadow(TextShadowParams),
    Rotation(RotationParams),
    Transform(TransformParams),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BackgroundColor(_) => "background_color",
            Self::BackgroundImage => "background_image",
            Self::TextColor(_) => "text_color",
            Self::FontStyle => "font_style",
            Self::FontWeight => "font_weight",
            Self::Stroke(_) => "stroke",
            Self::TextShadow(_) => "text_shadow",
            Self::Rotation(_) => "rotation",
            Self::Transform(_) => "transform",
        }
    }

    pub fn group(&self) -> EffectGroup {
        match self {
            Self::BackgroundColor(_) | Self::BackgroundImage => EffectGroup::Background,
            Self::TextColor(_) | Self::FontStyle | Self::FontWeight => EffectGroup::Text,
            Self::Stroke(_) | Self::TextShadow(_) | Self::Rotation(_) | Self::Transform(_) => {
                EffectGroup::PostText
            }
        }
    }

    pub fn validate(&self) -> TextgenResult<()> {
        match self {
            Self::BackgroundColor(p) => p.validate(),
            Self::TextColor(p) => p.validate(),
            Self::Stroke(p) => p.validate(),
            Self::TextShadow(p) => p.validate(),
            Self::Rotation(p) => p.angle.validate("rotation.angle"),
            Self::Transform(p) => {
                p.x_pct.validate("transform.x_pct")?;
                p.y_pct.validate("transform.y_pct")
            }
            Self::BackgroundImage | Self::FontStyle | Self::FontWeight => Ok(()),
        }
    }

    /// Background stage. `Ok(None)` means the effect declined.
    pub fn synthesize_background<R: Rng + ?Sized>(
        &self,
        ctx: &EffectContext<'_>,
        rng: &mut R,
    ) -> TextgenResult<Option<BackgroundContribution>> {
        match self {
            Self::BackgroundColor(p) => Ok(Some(background::background_color(p, rng))),
            Self::BackgroundImage => background::background_image(ctx, rng),
            other => Err(other.wrong_group(EffectGroup::Background)),
        }
    }

    /// Text stage, reading the settled background decision.
    pub fn synthesize_text<R: Rng + ?Sized>(
        &self,
        ctx: &EffectContext<'_>,
        background: &BackgroundDecision,
        rng: &mut R,
    ) -> TextgenResult<TextContribution> {
        match self {
            Self::TextColor(p) => text::text_color(p, ctx, background, rng),
            Self::FontStyle => Ok(text::font_style(rng)),
            Self::FontWeight => Ok(text::font_weight(rng)),
            other => Err(other.wrong_group(EffectGroup::Text)),
        }
    }

    /// Post-text stage, reading the chosen text colour.
    pub fn synthesize_post_text<R: Rng + ?Sized>(
        &self,
        text_color: Option<Rgb>,
        rng: &mut R,
    ) -> TextgenResult<StyleDeclaration> {
        match self {
            Self::Stroke(p) => Ok(post_text::stroke(p, text_color, rng)),
            Self::TextShadow(p) => Ok(post_text::text_shadow(p, rng)),
            Self::Rotation(p) => Ok(post_text::rotation(p, rng)),
            Self::Transform(p) => Ok(post_text::transform(p, rng)),
            other => Err(other.wrong_group(EffectGroup::PostText)),
        }
    }

    fn wrong_group(&self, stage: EffectGroup) -> TextgenError {
        TextgenError::validation(format!(
            "effect '{}' belongs to the {:?} stage, not {:?}",
            self.name(),
            self.group(),
            stage
        ))
    }
}

/// An effect plus its occurrence probability, as written in configuration:
/// `{"kind": "stroke", "probability": 0.2, "size": {"min": 1.0, "max": 3.0}}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectSpec {
    pub probability: Probability,
    #[serde(flatten)]
    pub effect: Effect,
}

impl EffectSpec {
    pub fn new(probability: Probability, effect: Effect) -> Self {
        Self {
            probability,
            effect,
        }
    }

    /// Fresh, independent roll on every call.
    pub fn should_apply<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.probability.roll(rng)
    }
}

/// The stock effect set with its stock probabilities.
pub fn default_effects() -> Vec<EffectSpec> {
    let spec = |p: f64, effect: Effect| EffectSpec::new(Probability::literal(p), effect);
    vec![
        spec(1.0, Effect::BackgroundColor(BackgroundColorParams::default())),
        spec(0.6, Effect::BackgroundImage),
        spec(1.0, Effect::TextColor(TextColorParams::default())),
        spec(0.15, Effect::FontStyle),
        spec(0.5, Effect::FontWeight),
        spec(0.2, Effect::Stroke(StrokeParams::default())),
        spec(0.3, Effect::TextShadow(TextShadowParams::default())),
        spec(0.3, Effect::Rotation(RotationParams::default())),
        spec(0.3, Effect::Transform(TransformParams::default())),
    ]
}
