use rand::Rng;

use crate::foundation::error::{TextgenError, TextgenResult};

/// Inclusive integer range `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn validate(self, what: &str) -> TextgenResult<()> {
        if self.min > self.max {
            return Err(TextgenError::validation(format!(
                "{what}: min ({}) must be <= max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn contains(self, v: i64) -> bool {
        self.min <= v && v <= self.max
    }

    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> i64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// Half-open float range `[min, max)`. A degenerate range always yields `min`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range centred on zero: `(-half_width, half_width)`.
    pub const fn symmetric(half_width: f64) -> Self {
        Self {
            min: -half_width,
            max: half_width,
        }
    }

    pub fn validate(self, what: &str) -> TextgenResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(TextgenError::validation(format!("{what}: bounds must be finite")));
        }
        if self.min > self.max {
            return Err(TextgenError::validation(format!(
                "{what}: min ({}) must be <= max ({})",
                self.min, self.max
            )));
        }
        // Uniform sampling needs a representable width.
        if !(self.max - self.min).is_finite() {
            return Err(TextgenError::validation(format!(
                "{what}: range [{}, {}) is too wide",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.random_range(self.min..self.max)
    }
}

/// Occurrence probability in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    pub const NEVER: Self = Self(0.0);
    pub const ALWAYS: Self = Self(1.0);

    pub fn new(p: f64) -> TextgenResult<Self> {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(TextgenError::validation(format!(
                "probability must be within [0, 1], got {p}"
            )));
        }
        Ok(Self(p))
    }

    /// For in-crate defaults written as literals in `[0, 1]`.
    pub(crate) const fn literal(p: f64) -> Self {
        Self(p)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// One independent uniform draw; `true` with probability `self`.
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> bool {
        rng.random::<f64>() < self.0
    }
}

impl TryFrom<f64> for Probability {
    type Error = TextgenError;

    fn try_from(p: f64) -> TextgenResult<Self> {
        Self::new(p)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

/// Output surface size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> TextgenResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextgenError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> kurbo::Point {
        kurbo::Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
