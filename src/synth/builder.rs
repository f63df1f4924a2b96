use std::sync::Arc;

use rand::Rng;

use crate::{
    config::GeneratorConfig,
    corpus::{BackgroundImages, FontFace},
    effects::EffectContext,
    foundation::{
        core::{Canvas, IntRange},
        error::{TextgenError, TextgenResult},
    },
    render::{MarkupInput, RenderRequest, build_markup},
    synth::{pipeline::EffectPipeline, text_noise::mutate_sentence},
};

/// Turns a sentence and a font into a complete render request.
///
/// Owns the validated configuration and the effect pipeline; shared read-only by every worker.
pub struct ImageSpecBuilder {
    config: GeneratorConfig,
    pipeline: EffectPipeline,
    images: Arc<dyn BackgroundImages>,
}

impl std::fmt::Debug for ImageSpecBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSpecBuilder")
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .field("images", &self.images.names().len())
            .finish()
    }
}

impl ImageSpecBuilder {
    /// Validates the configuration and fails fast on missing required resources.
    pub fn new(config: GeneratorConfig, images: Arc<dyn BackgroundImages>) -> TextgenResult<Self> {
        config.validate()?;
        let pipeline = EffectPipeline::new(config.effects.iter().cloned())?;
        pipeline.check_resources(images.as_ref(), config.require_background_images)?;
        Ok(Self {
            config,
            pipeline,
            images,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &EffectPipeline {
        &self.pipeline
    }

    pub fn images(&self) -> &dyn BackgroundImages {
        self.images.as_ref()
    }

    /// Draws dimensions, quality and font size, mutates the sentence, synthesizes a style and
    /// assembles the markup. Performs no I/O beyond decoding a background for palette analysis.
    pub fn build<R: Rng + ?Sized>(
        &self,
        sentence: &str,
        font: &Arc<FontFace>,
        index: usize,
        rng: &mut R,
    ) -> TextgenResult<RenderRequest> {
        let cfg = &self.config;
        let width = draw_u32(cfg.width, rng)?;
        let height = draw_u32(cfg.height, rng)?;
        let quality = u8::try_from(cfg.quality.sample(rng))
            .map_err(|_| TextgenError::validation("quality out of range"))?;
        let font_size = draw_u32(cfg.font_size, rng)?;
        let text = mutate_sentence(sentence, &cfg.numerals, &cfg.noise, rng);

        let canvas = Canvas::new(width, height)?;
        let ctx = EffectContext {
            canvas,
            font_family: &font.family,
            images: self.images.as_ref(),
            require_background_images: cfg.require_background_images,
        };
        let style = self.pipeline.synthesize(&ctx, rng)?;

        let markup = build_markup(&MarkupInput {
            canvas,
            font_family: &font.family,
            font_size,
            text: &text,
            rtl: cfg.rtl,
            sheet: &style.sheet,
            images: self.images.as_ref(),
        });

        Ok(RenderRequest {
            width,
            height,
            quality,
            format: cfg.format,
            font: font.clone(),
            text,
            sentence: sentence.to_owned(),
            index,
            font_size,
            style,
            markup,
        })
    }
}

fn draw_u32<R: Rng + ?Sized>(range: IntRange, rng: &mut R) -> TextgenResult<u32> {
    let v = range.sample(rng);
    u32::try_from(v).map_err(|_| TextgenError::validation(format!("value {v} is not a valid size")))
}
