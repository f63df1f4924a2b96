//! Per-image style synthesis: the staged effect pipeline, sentence mutations and the builder that
//! turns both into a render request.

pub mod builder;
pub mod pipeline;
pub mod text_noise;

pub use builder::ImageSpecBuilder;
pub use pipeline::{BackgroundStage, EffectPipeline, SynthesizedStyle, TextStage};
pub use text_noise::{
    NoiseConfig, NumeralConfig, NumeralScript, inject_noise, mutate_sentence, random_numerals,
};
