use std::path::Path;

use anyhow::Context as _;

use crate::{
    effects::{EffectSpec, default_effects},
    foundation::{
        core::IntRange,
        error::{TextgenError, TextgenResult},
    },
    render::OutputFormat,
    synth::text_noise::{NoiseConfig, NumeralConfig},
};

/// Generator settings, read from JSON. Every field has a default, so `{}` is a valid document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub images_per_font: usize,
    pub width: IntRange,
    pub height: IntRange,
    /// JPEG quality bounds; unused for PNG output.
    pub quality: IntRange,
    pub font_size: IntRange,
    pub format: OutputFormat,
    pub numerals: NumeralConfig,
    pub noise: NoiseConfig,
    /// Lay the text out right-to-left.
    pub rtl: bool,
    /// An image background effect with an empty image pool is a configuration error instead of
    /// a silent no-op.
    pub require_background_images: bool,
    /// Worker threads for the batch; `None` uses rayon's default.
    pub threads: Option<usize>,
    pub effects: Vec<EffectSpec>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            images_per_font: 100,
            width: IntRange::new(400, 1200),
            height: IntRange::new(300, 800),
            quality: IntRange::new(50, 100),
            font_size: IntRange::new(24, 96),
            format: OutputFormat::Jpeg,
            numerals: NumeralConfig::default(),
            noise: NoiseConfig::default(),
            rtl: true,
            require_background_images: false,
            threads: None,
            effects: default_effects(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_path(path: &Path) -> TextgenResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let r = std::io::BufReader::new(f);
        let cfg: Self = serde_json::from_reader(r)
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> TextgenResult<()> {
        check_positive(self.width, "width")?;
        check_positive(self.height, "height")?;
        check_positive(self.font_size, "font_size")?;
        self.quality.validate("quality")?;
        if self.quality.min < 1 || self.quality.max > 100 {
            return Err(TextgenError::validation("quality must be within 1..=100"));
        }
        if self.width.max > i64::from(MAX_EDGE) || self.height.max > i64::from(MAX_EDGE) {
            return Err(TextgenError::validation(format!(
                "width/height must be <= {MAX_EDGE}"
            )));
        }
        if let Some(0) = self.threads {
            return Err(TextgenError::validation("threads must be >= 1 when set"));
        }
        self.numerals.validate()?;
        self.noise.validate()?;
        for spec in &self.effects {
            spec.effect.validate()?;
        }
        Ok(())
    }
}

/// Largest accepted canvas edge in pixels.
const MAX_EDGE: u32 = 16_384;

fn check_positive(range: IntRange, what: &str) -> TextgenResult<()> {
    range.validate(what)?;
    if range.min < 1 {
        return Err(TextgenError::validation(format!("{what}.min must be >= 1")));
    }
    Ok(())
}
