use std::sync::Arc;

use crate::{
    corpus::FontFace, foundation::error::TextgenResult, synth::pipeline::SynthesizedStyle,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }
}

/// Everything needed to produce one image.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    pub width: u32,
    pub height: u32,
    /// JPEG quality in `1..=100`; ignored for PNG.
    pub quality: u8,
    pub format: OutputFormat,
    pub font: Arc<FontFace>,
    /// Text actually drawn, after numeral substitution and noise.
    pub text: String,
    /// Sentence the text was derived from.
    pub sentence: String,
    pub index: usize,
    pub font_size: u32,
    pub style: SynthesizedStyle,
    /// Complete SVG document.
    pub markup: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

/// Turns a render request into encoded image bytes.
pub trait Renderer: Send + Sync {
    fn render(&self, request: &RenderRequest) -> TextgenResult<EncodedImage>;
}
