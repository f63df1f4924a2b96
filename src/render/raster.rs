use std::{io::Cursor, sync::Arc};

use anyhow::Context as _;
use image::{DynamicImage, RgbaImage};

use crate::{
    corpus::FontFace,
    foundation::error::{TextgenError, TextgenResult},
    render::backend::{EncodedImage, OutputFormat, RenderRequest, Renderer},
};

/// CPU renderer: usvg parses the markup, resvg rasterizes it, `image` encodes the pixels.
#[derive(Clone, Debug, Default)]
pub struct RasterRenderer {
    /// Installed fonts used when a glyph is missing from the request's face.
    system_fonts: Option<Arc<usvg::fontdb::Database>>,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also consult installed system fonts as a fallback.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "system fonts loaded");
        Self {
            system_fonts: Some(Arc::new(db)),
        }
    }

    fn fontdb_for(&self, face: Option<&FontFace>) -> Arc<usvg::fontdb::Database> {
        match (&self.system_fonts, face) {
            (None, Some(face)) => face.fontdb(),
            (None, None) => Arc::new(usvg::fontdb::Database::new()),
            (Some(system), None) => system.clone(),
            (Some(system), Some(face)) => {
                let mut db = (**system).clone();
                db.load_font_source(usvg::fontdb::Source::Binary(face.bytes.clone()));
                Arc::new(db)
            }
        }
    }

    /// Rasterizes an SVG document onto a `width` x `height` canvas. Text renders only when
    /// `face` (or a system font) can supply the glyphs.
    pub fn rasterize(
        &self,
        markup: &str,
        width: u32,
        height: u32,
        face: Option<&FontFace>,
    ) -> TextgenResult<RgbaImage> {
        let opts = usvg::Options {
            fontdb: self.fontdb_for(face),
            font_family: face
                .map(|f| f.family.clone())
                .unwrap_or_else(|| "sans-serif".to_owned()),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(markup, &opts)
            .map_err(|e| TextgenError::render(format!("parse markup: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| TextgenError::render("failed to allocate pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        demultiply(&pixmap)
    }
}

impl Renderer for RasterRenderer {
    #[tracing::instrument(skip_all, fields(index = request.index, w = request.width, h = request.height))]
    fn render(&self, request: &RenderRequest) -> TextgenResult<EncodedImage> {
        let rgba = self.rasterize(
            &request.markup,
            request.width,
            request.height,
            Some(request.font.as_ref()),
        )?;
        let bytes = encode(rgba, request.format, request.quality)?;
        Ok(EncodedImage {
            width: request.width,
            height: request.height,
            format: request.format,
            bytes,
        })
    }
}

fn demultiply(pixmap: &resvg::tiny_skia::Pixmap) -> TextgenResult<RgbaImage> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| TextgenError::render("pixmap size does not match its data"))
}

pub fn encode(rgba: RgbaImage, format: OutputFormat, quality: u8) -> TextgenResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
            let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(
                Cursor::new(&mut buf),
                quality.clamp(1, 100),
            );
            enc.encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
            .context("encode jpeg")?;
        }
        OutputFormat::Png => {
            DynamicImage::ImageRgba8(rgba)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .context("encode png")?;
        }
    }
    Ok(buf)
}

/// Family query with generic fallbacks; when nothing matches, the first loaded face is used so a
/// request's own font still renders under an unexpected family name.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}
