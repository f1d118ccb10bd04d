//! # Exponential inter-arrival sampler.
//!
//! Draws gaps for a Poisson process by inverse-transform sampling:
//!
//! ```text
//! dt = -ln(U) · mean,   U ~ Uniform(0, 1]
//! ```
//!
//! `U` is taken as `1 - r` with `r` in `[0, 1)`, so `ln(0)` can never occur. The
//! largest possible gap is about `36.7 · mean` (smallest non-zero `U` is `2^-53`).
//! A zero gap (`U = 1`) is clamped to the configured minimum delay.
//!
//! The RNG is a [`StdRng`], seeded from the OS unless an explicit seed is given;
//! fixed seeds make streams reproducible.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ArrivalError, positive_ms};

/// Inverse-transform sampler for exponentially distributed gaps.
#[derive(Debug, Clone)]
pub struct ExponentialSampler {
    mean_ms: f64,
    min_delay: Duration,
    rng: StdRng,
}

impl ExponentialSampler {
    /// Creates a sampler with the given mean gap in milliseconds.
    ///
    /// `seed = None` seeds from the operating system.
    pub fn new(mean_ms: f64, seed: Option<u64>) -> Result<Self, ArrivalError> {
        let mean_ms = positive_ms(mean_ms, |value| ArrivalError::InvalidMean { value })?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            mean_ms,
            min_delay: Duration::from_nanos(1),
            rng,
        })
    }

    /// Sets the floor applied to every drawn delay.
    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay.max(Duration::from_nanos(1));
        self
    }

    /// Mean gap in milliseconds.
    pub fn mean_ms(&self) -> f64 {
        self.mean_ms
    }

    /// Draws one raw gap in milliseconds (may be `0.0`).
    pub fn sample_ms(&mut self) -> f64 {
        let u = 1.0 - self.rng.random::<f64>();
        -u.ln() * self.mean_ms
    }

    /// Draws one gap as a [`Duration`], never shorter than the minimum delay.
    pub fn next_delay(&mut self) -> Duration {
        let ms = self.sample_ms();
        let delay = Duration::try_from_secs_f64(ms / 1_000.0).unwrap_or(Duration::MAX);
        delay.max(self.min_delay)
    }
}
