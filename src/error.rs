//! Error types used by the arrival processes.
//!
//! [`ArrivalError`] covers everything that can go wrong while building a process:
//! rejected parameters and a missing async runtime. Once a process is built,
//! `start`/`stop` are infallible.
//!
//! Like the runtime errors elsewhere in the crate it provides `as_label` /
//! `as_message` helpers for logs and metrics.

use thiserror::Error;

/// # Errors produced when constructing an arrival process.
///
/// Parameters are validated up front so that a built process can never arm a
/// zero-delay or NaN timer.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArrivalError {
    /// Tick interval of a uniform process was zero, negative or not finite.
    #[error("tick interval must be a positive finite number of milliseconds, got {value}")]
    InvalidTickInterval {
        /// The rejected value, in milliseconds.
        value: f64,
    },

    /// Mean inter-arrival time of a Poisson process was zero, negative or not finite.
    #[error("mean inter-arrival time must be a positive finite number of milliseconds, got {value}")]
    InvalidMean {
        /// The rejected value, in milliseconds.
        value: f64,
    },

    /// Duration was negative or not finite.
    #[error("duration must be a non-negative finite number of milliseconds, got {value}")]
    InvalidDuration {
        /// The rejected value, in milliseconds.
        value: f64,
    },

    /// No tokio runtime was running when the default scheduler was created.
    #[error("no tokio runtime available to drive timers")]
    NoRuntime,
}

impl ArrivalError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use arrivals::ArrivalError;
    ///
    /// let err = ArrivalError::InvalidMean { value: 0.0 };
    /// assert_eq!(err.as_label(), "invalid_mean");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ArrivalError::InvalidTickInterval { .. } => "invalid_tick_interval",
            ArrivalError::InvalidMean { .. } => "invalid_mean",
            ArrivalError::InvalidDuration { .. } => "invalid_duration",
            ArrivalError::NoRuntime => "no_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ArrivalError::InvalidTickInterval { value } => format!("tick_interval_ms={value}"),
            ArrivalError::InvalidMean { value } => format!("mean_ms={value}"),
            ArrivalError::InvalidDuration { value } => format!("duration_ms={value}"),
            ArrivalError::NoRuntime => "tokio runtime not found".to_string(),
        }
    }
}

/// Validates a positive, finite millisecond value.
pub(crate) fn positive_ms(value: f64, err: fn(f64) -> ArrivalError) -> Result<f64, ArrivalError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(err(value))
    }
}

/// Validates an optional non-negative, finite millisecond value.
pub(crate) fn duration_ms(value: Option<f64>) -> Result<Option<f64>, ArrivalError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ArrivalError::InvalidDuration { value: v }),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_ms_rejects_degenerate_values() {
        let mk = |value| ArrivalError::InvalidMean { value };
        assert_eq!(positive_ms(5.0, mk), Ok(5.0));
        assert!(positive_ms(0.0, mk).is_err());
        assert!(positive_ms(-1.0, mk).is_err());
        assert!(positive_ms(f64::NAN, mk).is_err());
        assert!(positive_ms(f64::INFINITY, mk).is_err());
    }

    #[test]
    fn test_duration_ms_accepts_zero_and_none() {
        assert_eq!(duration_ms(None), Ok(None));
        assert_eq!(duration_ms(Some(0.0)), Ok(Some(0.0)));
        assert_eq!(
            duration_ms(Some(-0.5)),
            Err(ArrivalError::InvalidDuration { value: -0.5 })
        );
        assert!(duration_ms(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(
            ArrivalError::InvalidTickInterval { value: 0.0 }.as_label(),
            "invalid_tick_interval"
        );
        assert_eq!(ArrivalError::NoRuntime.as_label(), "no_runtime");
        assert_eq!(
            ArrivalError::InvalidDuration { value: -1.0 }.as_message(),
            "duration_ms=-1"
        );
    }
}
