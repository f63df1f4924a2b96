pub mod backend;
pub mod markup;
pub mod raster;

pub use backend::{EncodedImage, OutputFormat, RenderRequest, Renderer};
pub use markup::{MarkupInput, build_markup, escape_xml};
pub use raster::RasterRenderer;
