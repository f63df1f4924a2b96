use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use rand::{Rng, seq::IndexedRandom as _};

use crate::foundation::error::{TextgenError, TextgenResult};

/// Raw sfnt containers; fontdb cannot read WOFF/WOFF2.
const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// One loaded font file.
///
/// The face lives in its own font database so a render sees exactly this face and nothing that
/// happens to share its family name.
#[derive(Clone)]
pub struct FontFace {
    /// Family name read from the font's name table.
    pub family: String,
    /// Lowercase file extension (`ttf`, `otf`, ...).
    pub extension: String,
    pub bytes: Arc<Vec<u8>>,
    db: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("extension", &self.extension)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    pub fn from_bytes(bytes: Vec<u8>, extension: impl Into<String>) -> TextgenResult<Self> {
        let bytes = Arc::new(bytes);
        let mut db = usvg::fontdb::Database::new();
        db.load_font_source(usvg::fontdb::Source::Binary(bytes.clone()));

        let family = db
            .faces()
            .next()
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .ok_or_else(|| TextgenError::validation("font data contains no usable face"))?;

        Ok(Self {
            family,
            extension: extension.into().to_ascii_lowercase(),
            bytes,
            db: Arc::new(db),
        })
    }

    pub fn from_path(path: &Path) -> TextgenResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font file '{}'", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_owned();
        Self::from_bytes(bytes, ext)
            .map_err(|e| TextgenError::validation(format!("font '{}': {e}", path.display())))
    }

    pub fn fontdb(&self) -> Arc<usvg::fontdb::Database> {
        self.db.clone()
    }
}

/// A directory of faces sharing one output folder.
#[derive(Clone, Debug)]
pub struct FontFamily {
    /// Directory name; also the output sub-directory.
    pub name: String,
    pub faces: Vec<Arc<FontFace>>,
}

impl FontFamily {
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Arc<FontFace>> {
        self.faces.choose(rng)
    }
}

/// Every sub-directory of `dir` is a family; its font files are the faces.
///
/// Unloadable faces and empty families are skipped with a warning. Finding no family at all is a
/// configuration error.
#[tracing::instrument]
pub fn discover_families(dir: &Path) -> TextgenResult<Vec<FontFamily>> {
    if !dir.is_dir() {
        return Err(TextgenError::config(format!(
            "fonts directory '{}' does not exist; create one sub-directory per font family",
            dir.display()
        )));
    }

    let mut family_dirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("list fonts directory '{}'", dir.display()))?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    family_dirs.sort();

    let mut families = Vec::new();
    for family_dir in family_dirs {
        let Some(name) = family_dir.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        let faces = load_faces(&family_dir)?;
        if faces.is_empty() {
            tracing::warn!(family = name, "no loadable font files; skipping family");
            continue;
        }
        tracing::debug!(family = name, faces = faces.len(), "font family loaded");
        families.push(FontFamily {
            name: name.to_owned(),
            faces,
        });
    }

    if families.is_empty() {
        return Err(TextgenError::config(format!(
            "no font families found in '{}'; add .ttf/.otf files in sub-directories",
            dir.display()
        )));
    }
    Ok(families)
}

fn load_faces(dir: &Path) -> TextgenResult<Vec<Arc<FontFace>>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("list font family '{}'", dir.display()))?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_font_extension(p))
        .collect();
    paths.sort();

    let mut faces = Vec::with_capacity(paths.len());
    for path in paths {
        match FontFace::from_path(&path) {
            Ok(face) => faces.push(Arc::new(face)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping font file"),
        }
    }
    Ok(faces)
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| FONT_EXTENSIONS.contains(&ext.as_str()))
}
