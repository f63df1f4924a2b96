use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::DynamicImage;

use crate::foundation::error::{TextgenError, TextgenResult};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Pool of photographic backgrounds.
pub trait BackgroundImages: Send + Sync {
    /// Stable, ordered identifiers of the available images.
    fn names(&self) -> &[String];

    /// Decode the bitmap behind `name`.
    fn bitmap(&self, name: &str) -> TextgenResult<DynamicImage>;

    /// Reference the renderer resolves when placing the image in markup.
    fn href(&self, name: &str) -> String;
}

/// No background images at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBackgrounds;

impl BackgroundImages for NoBackgrounds {
    fn names(&self) -> &[String] {
        &[]
    }

    fn bitmap(&self, name: &str) -> TextgenResult<DynamicImage> {
        Err(TextgenError::config(format!(
            "background image '{name}' requested but no images are configured"
        )))
    }

    fn href(&self, name: &str) -> String {
        name.to_owned()
    }
}

/// Images found directly inside one directory, sorted by file name.
#[derive(Clone, Debug)]
pub struct DirBackgrounds {
    root: PathBuf,
    names: Vec<String>,
}

impl DirBackgrounds {
    /// A missing directory yields an empty pool; whether that is acceptable is decided by the
    /// pipeline's `require_background_images` flag.
    pub fn scan(root: impl Into<PathBuf>) -> TextgenResult<Self> {
        let root = root.into();
        let mut names = Vec::new();
        if root.is_dir() {
            let rd = std::fs::read_dir(&root)
                .with_context(|| format!("list background images in '{}'", root.display()))?;
            for entry in rd.flatten() {
                let path = entry.path();
                if path.is_file() && has_image_extension(&path) {
                    if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                        names.push(name.to_owned());
                    }
                }
            }
        } else {
            tracing::warn!(dir = %root.display(), "background image directory does not exist");
        }
        names.sort();
        Ok(Self { root, names })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BackgroundImages for DirBackgrounds {
    fn names(&self) -> &[String] {
        &self.names
    }

    fn bitmap(&self, name: &str) -> TextgenResult<DynamicImage> {
        let path = self.root.join(name);
        let img = image::open(&path)
            .with_context(|| format!("decode background image '{}'", path.display()))?;
        Ok(img)
    }

    fn href(&self, name: &str) -> String {
        let path = self.root.join(name);
        std::path::absolute(&path)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }
}

/// In-memory pool keyed by name.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackgrounds {
    images: BTreeMap<String, DynamicImage>,
    names: Vec<String>,
}

impl MemoryBackgrounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, img: DynamicImage) {
        self.images.insert(name.into(), img);
        self.names = self.images.keys().cloned().collect();
    }
}

impl BackgroundImages for MemoryBackgrounds {
    fn names(&self) -> &[String] {
        &self.names
    }

    fn bitmap(&self, name: &str) -> TextgenResult<DynamicImage> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| TextgenError::effect(format!("unknown background image '{name}'")))
    }

    fn href(&self, name: &str) -> String {
        name.to_owned()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
