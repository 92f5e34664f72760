// Error types for scale configuration

use thiserror::Error;

use crate::aes::Aes;

/// Misconfigured scales. These abort `Plot::prepare` because every position
/// on the chart depends on a valid scale.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    /// Shape and Stroke have only a finite set of glyphs and dashes.
    #[error("{aes} must be discrete, but is configured as {scale_type}")]
    NotDiscrete {
        /// Offending aesthetic.
        aes: Aes,
        /// Configured scale type.
        scale_type: String,
    },

    /// Logarithmic scale whose limits include zero or negative values.
    #[error("{aes} is logarithmic but its limit [{min}, {max}] is not positive")]
    LogDomain {
        /// Offending aesthetic.
        aes: Aes,
        /// Lower limit.
        min: f64,
        /// Upper limit.
        max: f64,
    },

    /// Bar position not in stack, dodge or fill.
    #[error("unknown bar position {0:?} (use stack, dodge or fill)")]
    UnknownBarPosition(String),
}
