//! # Process configuration.
//!
//! Provides [`Config`], the settings shared by both process types.
//! The process-defining parameters (tick interval, mean, duration) are given to
//! the builders; `Config` only covers plumbing.
//!
//! ## Sentinel values
//! - `seed = None` → RNG seeded from the operating system
//! - `bus_capacity = 0` → clamped to 1
//! - `min_delay = 0` → clamped to 1ns

use std::time::Duration;

/// Configuration shared by uniform and Poisson processes.
///
/// ## Field semantics
/// - `bus_capacity`: notification ring buffer size per process (min 1)
/// - `min_delay`: floor for sampled Poisson gaps (a zero gap is never armed)
/// - `seed`: fixed RNG seed for reproducible Poisson streams
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the per-process broadcast channel.
    ///
    /// Receivers lagging more than `bus_capacity` events behind observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Smallest delay ever armed for a Poisson gap.
    pub min_delay: Duration,

    /// Seed for the Poisson sampler (`None` = OS entropy).
    pub seed: Option<u64>,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the minimum delay clamped to at least 1ns.
    #[inline]
    pub fn min_delay_clamped(&self) -> Duration {
        self.min_delay.max(Duration::from_nanos(1))
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `min_delay = 1µs`
    /// - `seed = None`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            min_delay: Duration::from_micros(1),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            min_delay: Duration::ZERO,
            seed: None,
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.min_delay_clamped(), Duration::from_nanos(1));
    }
}
