// Scale transformations, modelled after ggplot2's transformation objects

use crate::interval::Interval;
use crate::ticks::Ticker;

/// A named pair of functions mapping one interval onto another.
///
/// `trans(from, to, x)` maps a value of `from` into `to`;
/// `inverse(from, to, y)` maps a value of `to` back into `from`.
/// For x inside `from`, `inverse(from, to, trans(from, to, x)) == x`
/// up to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformation {
    /// No transformation at all: `y = x`.
    Identity,
    /// Affine rescaling of `from` onto `to`.
    Linear,
    /// Maps to an output whose square is linear in the input, so that a
    /// radius computed with it yields areas proportional to the data.
    Sqrt,
    /// Like `Sqrt` but with both lower bounds forced to zero, so 0 always
    /// maps to 0.
    SqrtFix0,
    /// Decadic logarithm. Both bounds of `from` must be positive.
    Log10,
}

impl Transformation {
    pub fn name(&self) -> &'static str {
        match self {
            Transformation::Identity => "Identity",
            Transformation::Linear => "Linear",
            Transformation::Sqrt => "SquareRoot",
            Transformation::SqrtFix0 => "SquareRootFix0",
            Transformation::Log10 => "Log10",
        }
    }

    /// Default ticker for scales using this transformation.
    pub fn ticker(&self) -> Ticker {
        match self {
            Transformation::Identity | Transformation::Linear => Ticker::Nice(4),
            Transformation::Sqrt | Transformation::SqrtFix0 => Ticker::Nice(5),
            Transformation::Log10 => Ticker::Log,
        }
    }

    pub fn trans(&self, from: Interval, to: Interval, x: f64) -> f64 {
        match self {
            Transformation::Identity => x,
            Transformation::Linear => linear(from, to, x),
            Transformation::Sqrt => sqrt_trans(from, to, x),
            Transformation::SqrtFix0 => {
                sqrt_trans(Interval::new(0.0, from.max), Interval::new(0.0, to.max), x)
            }
            Transformation::Log10 => {
                let t = (x / from.min).log10() / (from.max / from.min).log10();
                to.min + t * to.len()
            }
        }
    }

    pub fn inverse(&self, from: Interval, to: Interval, y: f64) -> f64 {
        match self {
            Transformation::Identity => y,
            Transformation::Linear => linear(to, from, y),
            Transformation::Sqrt => sqrt_inverse(from, to, y),
            Transformation::SqrtFix0 => {
                sqrt_inverse(Interval::new(0.0, from.max), Interval::new(0.0, to.max), y)
            }
            Transformation::Log10 => {
                let t = (y - to.min) / to.len();
                from.min * 10_f64.powf(t * (from.max / from.min).log10())
            }
        }
    }
}

fn linear(from: Interval, to: Interval, x: f64) -> f64 {
    to.min + to.len() * (x - from.min) / from.len()
}

fn squared(i: Interval) -> Interval {
    Interval::new(i.min * i.min, i.max * i.max)
}

fn sqrt_trans(from: Interval, to: Interval, x: f64) -> f64 {
    linear(from, squared(to), x).sqrt()
}

fn sqrt_inverse(from: Interval, to: Interval, y: f64) -> f64 {
    linear(squared(to), from, y * y)
}
