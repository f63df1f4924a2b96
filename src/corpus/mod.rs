//! Inputs the generator draws from: fonts, sentences and background photographs, plus the batch
//! driver that walks them.

pub mod backgrounds;
pub mod batch;
pub mod fonts;
pub mod sentences;

pub use backgrounds::{BackgroundImages, DirBackgrounds, MemoryBackgrounds, NoBackgrounds};
pub use batch::{BatchStats, Generator};
pub use fonts::{FontFace, FontFamily, discover_families};
pub use sentences::{load_sentences, parse_sentences};
