//! Sentence mutations applied before styling: numeral substitution and punctuation noise.
//!
//! These change what is written, not how it looks, so they are plain string functions rather
//! than effects.

use rand::{Rng, seq::IndexedRandom as _};

use crate::foundation::{
    core::{IntRange, Probability},
    error::{TextgenError, TextgenResult},
};

const LATIN_DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];
const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Punctuation and Arabic-script diacritics used for noise by default.
pub const DEFAULT_NOISE_CHARSET: &str = ".،؛:!؟«»()-ـًٌٍَُِّْ";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumeralScript {
    Latin,
    #[default]
    Persian,
    ArabicIndic,
}

impl NumeralScript {
    pub fn digits(self) -> &'static [char; 10] {
        match self {
            Self::Latin => &LATIN_DIGITS,
            Self::Persian => &PERSIAN_DIGITS,
            Self::ArabicIndic => &ARABIC_INDIC_DIGITS,
        }
    }
}

/// Chance of replacing the sentence with a random digit string.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumeralConfig {
    pub probability: Probability,
    pub script: NumeralScript,
    pub length: IntRange,
}

impl Default for NumeralConfig {
    fn default() -> Self {
        Self {
            probability: Probability::literal(0.05),
            script: NumeralScript::Persian,
            length: IntRange::new(4, 14),
        }
    }
}

impl NumeralConfig {
    pub fn validate(&self) -> TextgenResult<()> {
        self.length.validate("numerals.length")?;
        if self.length.min < 1 {
            return Err(TextgenError::validation("numerals.length.min must be >= 1"));
        }
        Ok(())
    }
}

/// Chance of sprinkling a few noise characters into the sentence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    pub probability: Probability,
    pub count: IntRange,
    pub charset: String,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            probability: Probability::NEVER,
            count: IntRange::new(1, 3),
            charset: DEFAULT_NOISE_CHARSET.to_owned(),
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> TextgenResult<()> {
        self.count.validate("noise.count")?;
        if self.count.min < 0 {
            return Err(TextgenError::validation("noise.count.min must be >= 0"));
        }
        if self.probability.get() > 0.0 && self.charset.is_empty() {
            return Err(TextgenError::validation(
                "noise.charset must not be empty when noise is enabled",
            ));
        }
        Ok(())
    }
}

pub fn random_numerals<R: Rng + ?Sized>(script: NumeralScript, len: usize, rng: &mut R) -> String {
    let digits = script.digits();
    (0..len)
        .filter_map(|_| digits.choose(rng).copied())
        .collect()
}

/// Inserts `count` characters drawn from `charset` at random character positions.
pub fn inject_noise<R: Rng + ?Sized>(
    text: &str,
    charset: &str,
    count: usize,
    rng: &mut R,
) -> String {
    let pool: Vec<char> = charset.chars().collect();
    let mut chars: Vec<char> = text.chars().collect();
    for _ in 0..count {
        let Some(&c) = pool.choose(rng) else {
            break;
        };
        let at = rng.random_range(0..=chars.len());
        chars.insert(at, c);
    }
    chars.into_iter().collect()
}

/// Applies numeral substitution, then noise, each behind its own roll.
pub fn mutate_sentence<R: Rng + ?Sized>(
    sentence: &str,
    numerals: &NumeralConfig,
    noise: &NoiseConfig,
    rng: &mut R,
) -> String {
    let base = if numerals.probability.roll(rng) {
        let len = usize::try_from(numerals.length.sample(rng)).unwrap_or(1);
        random_numerals(numerals.script, len, rng)
    } else {
        sentence.to_owned()
    };
    if noise.probability.roll(rng) {
        let count = usize::try_from(noise.count.sample(rng)).unwrap_or(0);
        inject_noise(&base, &noise.charset, count, rng)
    } else {
        base
    }
}
