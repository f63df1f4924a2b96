use crate::{
    corpus::backgrounds::BackgroundImages,
    effects::style::Fill,
    foundation::core::Canvas,
};

/// Read-only inputs shared by every effect while one image is styled.
///
/// Built fresh per image; nothing in it outlives that image's synthesis.
#[derive(Clone, Copy)]
pub struct EffectContext<'a> {
    pub canvas: Canvas,
    pub font_family: &'a str,
    pub images: &'a dyn BackgroundImages,
    /// Image backgrounds with an empty pool are a configuration error rather than a no-op.
    pub require_background_images: bool,
}

impl std::fmt::Debug for EffectContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectContext")
            .field("canvas", &self.canvas)
            .field("font_family", &self.font_family)
            .field("images", &self.images.names().len())
            .field("require_background_images", &self.require_background_images)
            .finish()
    }
}

/// What the background group settled on. Later stages derive colours from it.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum BackgroundDecision {
    #[default]
    None,
    Color(Fill),
    Image { name: String },
}

impl BackgroundDecision {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Color(_) => "color",
            Self::Image { .. } => "image",
        }
    }
}
