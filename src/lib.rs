//! Synthetic training images for OCR.
//!
//! Each image is a sentence drawn in one font with a randomized style. Styles come from a staged
//! effect pipeline:
//!
//! - background effects settle the surface (solid, gradient or photograph)
//! - text effects pick a text colour readable against it, plus style and weight
//! - post-text effects add outline, shadows, rotation and offset derived from that colour
//!
//! The [`ImageSpecBuilder`] turns a sentence into a [`RenderRequest`] (an SVG document plus
//! output parameters) and a [`Renderer`] rasterizes it. [`Generator`] runs a whole corpus.
#![forbid(unsafe_code)]

pub mod color;
pub mod config;
pub mod corpus;
pub mod effects;
mod foundation;
pub mod render;
pub mod synth;

pub use crate::foundation::core::{Canvas, FloatRange, IntRange, Probability};
pub use crate::foundation::error::{TextgenError, TextgenResult};

pub use crate::color::{Rgb, Rgba};
pub use crate::config::GeneratorConfig;
pub use crate::corpus::{
    BackgroundImages, BatchStats, DirBackgrounds, FontFace, FontFamily, Generator,
    MemoryBackgrounds, NoBackgrounds,
};
pub use crate::effects::{
    BackgroundDecision, Effect, EffectContext, EffectGroup, EffectSpec, StyleDeclaration,
    StyleSheet, default_effects,
};
pub use crate::render::{EncodedImage, OutputFormat, RasterRenderer, RenderRequest, Renderer};
pub use crate::synth::{EffectPipeline, ImageSpecBuilder, SynthesizedStyle};
