//! Random inter-arrival sampling.
//!
//! ## Contents
//! - [`ExponentialSampler`] inverse-transform sampler for exponential gaps
//!
//! ## Quick wiring
//! ```text
//! PoissonProcess { sampler: ExponentialSampler }
//!      └─► every arm: sampler.next_delay() ─► scheduler.schedule_once(dt, ..)
//! ```

mod exponential;

pub use exponential::ExponentialSampler;
