use crate::color::rgb::{Hsl, Rgb, contrast_ratio};

/// WCAG AA threshold for body text.
pub const MIN_CONTRAST: f64 = 4.5;
/// Candidates closer than this (RGB distance) to any background swatch are rejected.
pub const MIN_DISTANCE: f64 = 50.0;

const DOMINANCE_DECAY: f64 = 0.7;
const CONTRAST_CAP: f64 = 7.0;
const DISTANCE_CAP: f64 = 150.0;
const NEUTRALS: [Rgb; 4] = [
    Rgb::BLACK,
    Rgb::WHITE,
    Rgb::new(0x33, 0x33, 0x33),
    Rgb::new(0xF0, 0xF0, 0xF0),
];
const DARK_LEVELS: [f64; 3] = [0.15, 0.25, 0.35];
const LIGHT_LEVELS: [f64; 3] = [0.75, 0.85, 0.95];
/// Saturation multipliers applied to the hue-rotated swatch.
const DESATURATION: [f64; 2] = [0.6, 0.25];

/// Luminance of the swatches, weighted `0.7^i` so the most dominant one matters most.
pub fn weighted_luminance(swatches: &[Rgb]) -> f64 {
    let mut total = 0.0;
    let mut weights = 0.0;
    let mut w = 1.0;
    for s in swatches {
        total += s.luminance() * w;
        weights += w;
        w *= DOMINANCE_DECAY;
    }
    if weights == 0.0 { 0.0 } else { total / weights }
}

/// Pick a text colour that stays readable over the given background swatches (most dominant
/// first). Deterministic: candidates are generated and scored in a fixed order.
///
/// Returns black or white when no candidate passes the contrast and distance gates, or when
/// `swatches` is empty.
pub fn select_text_color(swatches: &[Rgb]) -> Rgb {
    let avg = weighted_luminance(swatches);
    let light_background = avg > 0.5;
    let fallback = if light_background {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    };
    if swatches.is_empty() {
        return fallback;
    }

    let levels = if light_background {
        DARK_LEVELS
    } else {
        LIGHT_LEVELS
    };

    let mut candidates: Vec<Rgb> = NEUTRALS.to_vec();
    for swatch in swatches.iter().take(2) {
        let hsl = swatch.to_hsl();
        for l in levels {
            for k in DESATURATION {
                candidates.push(Rgb::from_hsl(Hsl {
                    h: hsl.h + 180.0,
                    s: hsl.s * k,
                    l,
                }));
            }
        }
    }

    let mut best: Option<(Rgb, f64)> = None;
    for c in candidates {
        let Some(score) = score_candidate(c, swatches, avg, light_background) else {
            continue;
        };
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((c, score));
        }
    }

    best.map_or(fallback, |(c, _)| c)
}

/// `None` when the candidate fails the contrast or distance gate.
fn score_candidate(c: Rgb, swatches: &[Rgb], avg: f64, light_background: bool) -> Option<f64> {
    let contrast = contrast_ratio(c.luminance(), avg);
    if contrast < MIN_CONTRAST {
        return None;
    }
    let distance = swatches
        .iter()
        .map(|s| c.distance(*s))
        .fold(f64::INFINITY, f64::min);
    if distance < MIN_DISTANCE {
        return None;
    }

    let hsl = c.to_hsl();
    let lightness_fit = if light_background {
        1.0 - hsl.l
    } else {
        hsl.l
    };

    let mut score = 30.0 * contrast.min(CONTRAST_CAP) / CONTRAST_CAP
        + 25.0 * distance.min(DISTANCE_CAP) / DISTANCE_CAP
        + 20.0 * (1.0 - hsl.s)
        + 15.0 * lightness_fit;
    if c == Rgb::BLACK || c == Rgb::WHITE {
        score += 10.0;
    }
    Some(score)
}

#[cfg(test)]
#[path = "../../tests/unit/color/readable.rs"]
mod tests;
