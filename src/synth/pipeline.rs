use rand::Rng;

use crate::{
    color::Rgb,
    corpus::BackgroundImages,
    effects::{
        BackgroundDecision, Effect, EffectContext, EffectGroup, EffectSpec, StyleDeclaration,
        StyleSheet,
    },
    foundation::error::{TextgenError, TextgenResult},
};

/// Output of the background stage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackgroundStage {
    pub decision: BackgroundDecision,
    pub declarations: Vec<StyleDeclaration>,
}

/// Output of the text stage. Carries the background stage forward.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextStage {
    pub background: BackgroundStage,
    pub text_color: Option<Rgb>,
    pub declarations: Vec<StyleDeclaration>,
}

/// Everything the effects decided for one image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SynthesizedStyle {
    pub background: BackgroundDecision,
    pub text_color: Option<Rgb>,
    pub sheet: StyleSheet,
}

/// Ordered effects split into the three stages.
///
/// Stage methods take the previous stage's output by value, so the background, text and
/// post-text groups can only run in that order. The pipeline holds no per-image state and can be
/// shared across threads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectPipeline {
    background: Vec<EffectSpec>,
    text: Vec<EffectSpec>,
    post_text: Vec<EffectSpec>,
}

impl EffectPipeline {
    /// Validates every effect and routes it to its stage, keeping relative order.
    pub fn new(effects: impl IntoIterator<Item = EffectSpec>) -> TextgenResult<Self> {
        let mut out = Self::default();
        for spec in effects {
            spec.effect.validate()?;
            match spec.effect.group() {
                EffectGroup::Background => out.background.push(spec),
                EffectGroup::Text => out.text.push(spec),
                EffectGroup::PostText => out.post_text.push(spec),
            }
        }
        Ok(out)
    }

    pub fn stage(&self, group: EffectGroup) -> &[EffectSpec] {
        match group {
            EffectGroup::Background => &self.background,
            EffectGroup::Text => &self.text,
            EffectGroup::PostText => &self.post_text,
        }
    }

    pub fn len(&self) -> usize {
        self.background.len() + self.text.len() + self.post_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails fast when image backgrounds are required, can fire, and the pool is empty.
    pub fn check_resources(
        &self,
        images: &dyn BackgroundImages,
        require_background_images: bool,
    ) -> TextgenResult<()> {
        let wants_images = self
            .background
            .iter()
            .any(|s| s.effect == Effect::BackgroundImage && s.probability.get() > 0.0);
        if require_background_images && wants_images && images.names().is_empty() {
            return Err(TextgenError::config(
                "image backgrounds are required but no background images were supplied; \
                 add images or disable require_background_images",
            ));
        }
        Ok(())
    }

    pub fn run_background<R: Rng + ?Sized>(
        &self,
        ctx: &EffectContext<'_>,
        rng: &mut R,
    ) -> TextgenResult<BackgroundStage> {
        let mut stage = BackgroundStage::default();
        for spec in &self.background {
            if !spec.should_apply(rng) {
                continue;
            }
            let result = spec.effect.synthesize_background(ctx, rng);
            if let Some(Some(contribution)) = isolate(&spec.effect, result)? {
                stage.decision = contribution.decision;
                stage.declarations.extend(contribution.declarations);
            }
        }
        Ok(stage)
    }

    pub fn run_text<R: Rng + ?Sized>(
        &self,
        ctx: &EffectContext<'_>,
        background: BackgroundStage,
        rng: &mut R,
    ) -> TextgenResult<TextStage> {
        let mut stage = TextStage {
            background,
            ..TextStage::default()
        };
        for spec in &self.text {
            if !spec.should_apply(rng) {
                continue;
            }
            let result = spec
                .effect
                .synthesize_text(ctx, &stage.background.decision, rng);
            if let Some(contribution) = isolate(&spec.effect, result)? {
                if contribution.text_color.is_some() {
                    stage.text_color = contribution.text_color;
                }
                stage.declarations.extend(contribution.declarations);
            }
        }
        Ok(stage)
    }

    pub fn run_post_text<R: Rng + ?Sized>(
        &self,
        text: TextStage,
        rng: &mut R,
    ) -> TextgenResult<SynthesizedStyle> {
        let mut post = Vec::new();
        for spec in &self.post_text {
            if !spec.should_apply(rng) {
                continue;
            }
            let result = spec.effect.synthesize_post_text(text.text_color, rng);
            if let Some(declaration) = isolate(&spec.effect, result)? {
                post.push(declaration);
            }
        }

        let TextStage {
            background,
            text_color,
            declarations,
        } = text;
        let sheet = StyleSheet::partition(
            background
                .declarations
                .into_iter()
                .chain(declarations)
                .chain(post),
        );
        Ok(SynthesizedStyle {
            background: background.decision,
            text_color,
            sheet,
        })
    }

    /// Runs all three stages for one image.
    #[tracing::instrument(skip(self, ctx, rng), fields(font = ctx.font_family))]
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        ctx: &EffectContext<'_>,
        rng: &mut R,
    ) -> TextgenResult<SynthesizedStyle> {
        let background = self.run_background(ctx, rng)?;
        tracing::debug!(background = background.decision.kind(), "background settled");
        let text = self.run_text(ctx, background, rng)?;
        self.run_post_text(text, rng)
    }
}

/// Configuration errors propagate; anything else drops just this effect's contribution.
fn isolate<T>(effect: &Effect, result: TextgenResult<T>) -> TextgenResult<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_config() => Err(e),
        Err(e) => {
            tracing::warn!(effect = effect.name(), error = %e, "effect failed; skipping it");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/synth/pipeline.rs"]
mod tests;
