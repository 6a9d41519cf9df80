//! Geometric level generator.

use rand::prelude::*;
use thiserror::Error;

use crate::{BRANCH, MAX_LEVEL, level_generator::LevelGenerator};

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The maximum number of levels must not exceed [`MAX_LEVEL`].
    #[error("max must be at most {}.", MAX_LEVEL)]
    MaxTooLarge,
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// This distribution assumes that if a node is present at some level `$n$`,
/// then the probability that it is present at level `$n+1$` is some constant
/// `$p \in (0, 1)$`. This produces a geometric distribution, albeit truncated
/// at the maximum number of levels allowed: `$P(h \geq k) = p^{k-1}$`.
///
/// The [`Default`] generator uses [`MAX_LEVEL`] levels and `$p = 1 / 4$`
/// ([`BRANCH`]), so three quarters of all nodes have height 1.
#[derive(Debug)]
pub struct Geometric {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `total` must be in
    /// `1..=MAX_LEVEL`.
    #[inline]
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::from_rng(&mut rand::rng()),
        })
    }

    /// Like [`new`][Geometric::new], but with a seeded random number generator
    /// so that the sequence of heights is reproducible.
    ///
    /// # Errors
    ///
    /// Same as [`new`][Geometric::new].
    #[inline]
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    fn validate(total: usize, p: f64) -> Result<(), GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if total > MAX_LEVEL {
            return Err(GeometricError::MaxTooLarge);
        }
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(())
    }
}

impl Default for Geometric {
    #[inline]
    #[expect(clippy::float_arithmetic, reason = "Computing p = 1 / BRANCH")]
    fn default() -> Self {
        Geometric {
            total: MAX_LEVEL,
            p: 1.0 / f64::from(BRANCH),
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    /// Start at height 1 and keep climbing with probability `$p$`, stopping at
    /// `total`.
    #[inline]
    fn level(&mut self) -> usize {
        let mut height = 1;
        while height < self.total && self.rng.random_bool(self.p) {
            height += 1;
        }
        height
    }
}
