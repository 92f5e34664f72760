// Real intervals with an explicit "unset" state

use std::fmt;

/// A (potentially degenerate) real interval.
///
/// Either edge may be NaN, meaning that edge has not been determined yet.
/// The unset interval `[NaN, NaN]` is different from the degenerate
/// interval `[a, a]`, which pins a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// The interval with unspecified (NaN) endpoints.
    pub const UNSET: Interval = Interval {
        min: f64::NAN,
        max: f64::NAN,
    };

    /// The interval `[-Inf, +Inf]`.
    pub const INFINITE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// The unit interval `[0, 1]`.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Interval { min, max }
    }

    /// Degenerate interval `[x, x]`.
    pub const fn pinned(x: f64) -> Self {
        Interval { min: x, max: x }
    }

    /// Expands the interval to include every non-NaN value in `values`.
    pub fn update(&mut self, values: &[f64]) {
        for &v in values {
            self.update_one(v);
        }
    }

    /// Expands the interval to include `v`. NaN is ignored.
    pub fn update_one(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        // Written as negated comparisons so a NaN edge is always replaced.
        if !(self.min < v) {
            self.min = v;
        }
        if !(self.max > v) {
            self.max = v;
        }
    }

    /// Folds `other` into `self`.
    pub fn union(&mut self, other: Interval) {
        self.update_one(other.min);
        self.update_one(other.max);
    }

    /// NaN-aware equality: a NaN edge equals only a NaN edge.
    pub fn equal(&self, other: &Interval) -> bool {
        fn edge_eq(a: f64, b: f64) -> bool {
            if a.is_nan() || b.is_nan() {
                return a.is_nan() && b.is_nan();
            }
            a == b
        }
        edge_eq(self.min, other.min) && edge_eq(self.max, other.max)
    }

    /// Both edges are set.
    pub fn is_set(&self) -> bool {
        !self.min.is_nan() && !self.max.is_nan()
    }

    /// Reports whether the interval has the form `[a, a]`.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn len(&self) -> f64 {
        self.max - self.min
    }

    /// Reports whether x lies in the interval, regardless of edge order.
    pub fn contains(&self, x: f64) -> bool {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        x >= lo && x <= hi
    }

    /// Repairs the interval so it is usable as an axis.
    ///
    /// NaN and Inf edges become -1 (min) and +1 (max), collapsed intervals
    /// `[a, a]` are expanded around a and swapped edges are reordered.
    /// Returns whether anything was changed.
    pub fn degenerate(&mut self) -> bool {
        let mut modified = false;
        if !self.min.is_finite() {
            self.min = -1.0;
            modified = true;
        }
        if !self.max.is_finite() {
            self.max = 1.0;
            modified = true;
        }

        if self.min == self.max {
            if self.min == 0.0 {
                self.min = -1.0;
                self.max = 1.0;
            } else {
                let d = (self.min / 10.0).abs();
                self.min -= d;
                self.max += d;
            }
            modified = true;
        }

        if self.min > self.max {
            std::mem::swap(&mut self.min, &mut self.max);
            modified = true;
        }

        modified
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::UNSET
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}:{:.2}]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn test_update_table() {
        let cases = [
            (Interval::new(3.0, 6.0), 4.0, Interval::new(3.0, 6.0)),
            (Interval::new(3.0, 6.0), 2.0, Interval::new(2.0, 6.0)),
            (Interval::new(3.0, 6.0), 7.0, Interval::new(3.0, 7.0)),
            (Interval::UNSET, NAN, Interval::UNSET),
            (Interval::UNSET, 5.0, Interval::new(5.0, 5.0)),
            (Interval::new(5.0, 5.0), NAN, Interval::new(5.0, 5.0)),
        ];
        for (old, x, want) in cases {
            let mut got = old;
            got.update_one(x);
            assert!(got.equal(&want), "{} update {} = {}, want {}", old, x, got, want);
        }
    }

    #[test]
    fn test_equal_nan_edges() {
        assert!(Interval::UNSET.equal(&Interval::UNSET));
        assert!(!Interval::UNSET.equal(&Interval::new(0.0, 1.0)));
        assert!(Interval::new(NAN, 2.0).equal(&Interval::new(NAN, 2.0)));
        assert!(!Interval::new(NAN, 2.0).equal(&Interval::new(NAN, 3.0)));
    }

    #[test]
    fn test_degenerate_unset() {
        let mut i = Interval::UNSET;
        assert!(i.degenerate());
        assert_eq!(i, Interval::new(-1.0, 1.0));
    }

    #[test]
    fn test_degenerate_collapsed() {
        let mut zero = Interval::pinned(0.0);
        assert!(zero.degenerate());
        assert_eq!(zero, Interval::new(-1.0, 1.0));

        let mut ten = Interval::pinned(10.0);
        assert!(ten.degenerate());
        assert_eq!(ten, Interval::new(9.0, 11.0));

        let mut neg = Interval::pinned(-10.0);
        assert!(neg.degenerate());
        assert_eq!(neg, Interval::new(-11.0, -9.0));
    }

    #[test]
    fn test_degenerate_untouched() {
        let mut i = Interval::new(2.0, 5.0);
        assert!(!i.degenerate());
        assert_eq!(i, Interval::new(2.0, 5.0));
    }

    #[test]
    fn test_contains_order_normalized() {
        assert!(Interval::new(5.0, 1.0).contains(3.0));
        assert!(!Interval::new(1.0, 5.0).contains(6.0));
        assert!(!Interval::UNSET.contains(0.0));
    }

    proptest! {
        #[test]
        fn prop_update_is_min_max_fold(values in prop::collection::vec(-1e6f64..1e6, 1..50)) {
            let mut forward = Interval::UNSET;
            forward.update(&values);

            let mut backward = Interval::UNSET;
            for v in values.iter().rev() {
                backward.update_one(*v);
            }

            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(forward, Interval::new(min, max));
            prop_assert_eq!(backward, forward);
        }

        #[test]
        fn prop_nan_is_noop(values in prop::collection::vec(-1e6f64..1e6, 1..20)) {
            let mut plain = Interval::UNSET;
            plain.update(&values);

            let mut with_nan = Interval::UNSET;
            for v in &values {
                with_nan.update(&[NAN, *v, NAN]);
            }
            prop_assert_eq!(plain, with_nan);
        }
    }
}
