use image::{DynamicImage, GenericImageView};

use crate::{
    color::rgb::Rgb,
    foundation::error::{TextgenError, TextgenResult},
};

/// Longest thumbnail edge used for palette extraction.
pub const THUMBNAIL_EDGE: u32 = 100;

/// Bits kept per channel when bucketing pixels.
const QUANT_BITS: u32 = 4;

/// Buckets closer than this (RGB distance) collapse into one swatch.
const MERGE_DISTANCE: f64 = 48.0;

/// Pixels with less alpha than this are ignored.
const MIN_ALPHA: u8 = 125;

/// A dominant colour and the number of thumbnail pixels it stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swatch {
    pub color: Rgb,
    pub population: u32,
}

#[derive(Clone, Copy, Default)]
struct Accum {
    sum: [u64; 3],
    count: u32,
}

impl Accum {
    fn add(&mut self, other: &Accum) {
        for (s, o) in self.sum.iter_mut().zip(other.sum) {
            *s += o;
        }
        self.count += other.count;
    }

    fn mean(&self) -> Rgb {
        let n = u64::from(self.count.max(1));
        let ch = |i: usize| ((self.sum[i] + n / 2) / n).min(255) as u8;
        Rgb::new(ch(0), ch(1), ch(2))
    }
}

/// Extract up to `count` dominant colours, most populous first.
///
/// The bitmap is reduced to a thumbnail, pixels are bucketed on a coarse colour grid, and buckets
/// are greedily merged (largest first) into swatches. The result is deterministic for a given
/// bitmap.
pub fn dominant_swatches(img: &DynamicImage, count: usize) -> TextgenResult<Vec<Swatch>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(TextgenError::effect("cannot extract palette from an empty bitmap"));
    }
    let thumb = if w > THUMBNAIL_EDGE || h > THUMBNAIL_EDGE {
        img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgba8()
    } else {
        img.to_rgba8()
    };

    let shift = 8 - QUANT_BITS;
    let mut buckets = vec![Accum::default(); 1 << (3 * QUANT_BITS)];
    for px in thumb.pixels() {
        let [r, g, b, a] = px.0;
        if a < MIN_ALPHA {
            continue;
        }
        let key = (usize::from(r >> shift) << (2 * QUANT_BITS))
            | (usize::from(g >> shift) << QUANT_BITS)
            | usize::from(b >> shift);
        let bucket = &mut buckets[key];
        bucket.sum[0] += u64::from(r);
        bucket.sum[1] += u64::from(g);
        bucket.sum[2] += u64::from(b);
        bucket.count += 1;
    }

    let mut occupied: Vec<(usize, Accum)> = buckets
        .into_iter()
        .enumerate()
        .filter(|(_, a)| a.count > 0)
        .collect();
    if occupied.is_empty() {
        return Err(TextgenError::effect("bitmap has no opaque pixels"));
    }
    occupied.sort_by(|(ka, a), (kb, b)| b.count.cmp(&a.count).then(ka.cmp(kb)));

    let mut clusters: Vec<(Rgb, Accum)> = Vec::new();
    for (_, bucket) in &occupied {
        let color = bucket.mean();
        match clusters
            .iter_mut()
            .find(|(seed, _)| seed.distance(color) < MERGE_DISTANCE)
        {
            Some((_, acc)) => acc.add(bucket),
            None => clusters.push((color, *bucket)),
        }
    }

    let mut swatches: Vec<Swatch> = clusters
        .iter()
        .map(|(_, acc)| Swatch {
            color: acc.mean(),
            population: acc.count,
        })
        .collect();
    // Stable: equal populations keep first-seen order.
    swatches.sort_by(|a, b| b.population.cmp(&a.population));
    swatches.truncate(count);
    Ok(swatches)
}
