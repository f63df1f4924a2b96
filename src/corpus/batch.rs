use std::{
    ops::Add,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use rand::seq::IndexedRandom as _;
use rayon::prelude::*;

use crate::{
    corpus::fonts::FontFamily,
    foundation::error::{TextgenError, TextgenResult},
    render::Renderer,
    synth::ImageSpecBuilder,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub written: u64,
    pub failed: u64,
}

impl Add for BatchStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            written: self.written + rhs.written,
            failed: self.failed + rhs.failed,
        }
    }
}

/// Drives a whole corpus: every family gets `images_per_font` images under
/// `<out>/<family>/image_<n>.<ext>`.
pub struct Generator<'a> {
    builder: &'a ImageSpecBuilder,
    renderer: &'a dyn Renderer,
    families: &'a [FontFamily],
    sentences: &'a [String],
    out_dir: PathBuf,
}

impl<'a> Generator<'a> {
    pub fn new(
        builder: &'a ImageSpecBuilder,
        renderer: &'a dyn Renderer,
        families: &'a [FontFamily],
        sentences: &'a [String],
        out_dir: impl Into<PathBuf>,
    ) -> TextgenResult<Self> {
        if families.is_empty() {
            return Err(TextgenError::config("no font families to generate for"));
        }
        if sentences.is_empty() {
            return Err(TextgenError::config("no sentences to render"));
        }
        Ok(Self {
            builder,
            renderer,
            families,
            sentences,
            out_dir: out_dir.into(),
        })
    }

    /// Families run in parallel. A failed image is logged, counted and left out of the output;
    /// only configuration errors stop the run.
    #[tracing::instrument(skip(self), fields(out = %self.out_dir.display()))]
    pub fn run(&self) -> TextgenResult<BatchStats> {
        let pool = build_thread_pool(self.builder.config().threads)?;
        let stats = pool.install(|| {
            self.families
                .par_iter()
                .map(|family| self.run_family(family))
                .try_reduce(BatchStats::default, |a, b| Ok(a + b))
        })?;
        tracing::info!(written = stats.written, failed = stats.failed, "batch finished");
        Ok(stats)
    }

    pub fn run_family(&self, family: &FontFamily) -> TextgenResult<BatchStats> {
        let dir = self.out_dir.join(&family.name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;

        let mut rng = rand::rng();
        let mut stats = BatchStats::default();
        for index in 0..self.builder.config().images_per_font {
            match self.generate_one(family, &dir, index, &mut rng) {
                Ok(path) => {
                    stats.written += 1;
                    tracing::debug!(path = %path.display(), "image written");
                }
                Err(e) if e.is_config() => return Err(e),
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(family = %family.name, index, error = %e, "image failed; skipping");
                }
            }
        }
        tracing::info!(
            family = %family.name,
            written = stats.written,
            failed = stats.failed,
            "font family done"
        );
        Ok(stats)
    }

    fn generate_one(
        &self,
        family: &FontFamily,
        dir: &Path,
        index: usize,
        rng: &mut impl rand::Rng,
    ) -> TextgenResult<PathBuf> {
        let face = family
            .pick(rng)
            .ok_or_else(|| TextgenError::config(format!("font family '{}' has no faces", family.name)))?;
        let sentence = self
            .sentences
            .choose(rng)
            .ok_or_else(|| TextgenError::config("no sentences to render"))?;

        let request = self.builder.build(sentence, face, index, rng)?;
        let image = self.renderer.render(&request)?;

        let path = dir.join(format!("image_{}.{}", index + 1, image.format.extension()));
        write_atomic(&path, &image.bytes)?;
        Ok(path)
    }
}

/// Writes through a sibling temp file and a rename, so a failure never leaves a partial image.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> TextgenResult<()> {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TextgenError::validation("output path has no file name"))?;
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    let mut guard = TempFileGuard(Some(tmp.clone()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write '{}'", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("move '{}' into place", path.display()))?;
    guard.0 = None;
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> TextgenResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TextgenError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TextgenError::render(format!("failed to build rayon thread pool: {e}")))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
