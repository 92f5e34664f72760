// Turning continuous values into discrete interval labels

use crate::interval::Interval;

/// Splits a learned range into `partitions` equally wide buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct Partitioner {
    pub partitions: usize,
    pub range: Interval,
}

impl Partitioner {
    pub fn new(partitions: usize) -> Self {
        Partitioner {
            partitions: partitions.max(1),
            range: Interval::UNSET,
        }
    }

    pub fn learn(&mut self, values: &[f64]) {
        self.range.update(values);
    }

    fn edges(&self, k: usize) -> (f64, f64) {
        let w = self.range.len() / self.partitions as f64;
        (
            self.range.min + k as f64 * w,
            self.range.min + (k + 1) as f64 * w,
        )
    }

    /// Index of the bucket holding x. Values outside the learned range,
    /// NaN included, have none.
    pub fn index(&self, x: f64) -> Option<usize> {
        if !self.range.contains(x) {
            return None;
        }
        if self.range.is_degenerate() {
            return Some(0);
        }
        let k = ((x - self.range.min) / self.range.len() * self.partitions as f64).floor();
        Some((k as usize).min(self.partitions - 1))
    }

    /// Label of the bucket holding x, like `[2, 4)`. The largest learned
    /// value falls into the last bucket; values beyond the range get an
    /// open ended label.
    pub fn bucket(&self, x: f64) -> String {
        let (min, max) = (self.range.min, self.range.max);
        if x < min {
            return format!("(-∞, {})", min);
        }
        if x > max {
            return format!("[{}, ∞)", max);
        }
        match self.index(x) {
            Some(k) => {
                let (lo, hi) = self.edges(k);
                format!("[{}, {})", lo, hi)
            }
            None => "NaN".to_string(),
        }
    }

    /// Labels of all buckets in ascending order.
    pub fn labels(&self) -> Vec<String> {
        if !self.range.is_set() {
            return Vec::new();
        }
        (0..self.partitions)
            .map(|k| {
                let (lo, hi) = self.edges(k);
                format!("[{}, {})", lo, hi)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn learned() -> Partitioner {
        let mut p = Partitioner::new(4);
        p.learn(&[0.0, 3.0, 8.0]);
        p
    }

    #[test]
    fn test_buckets() {
        let p = learned();
        assert_eq!(p.range, Interval::new(0.0, 8.0));
        assert_eq!(p.bucket(0.0), "[0, 2)");
        assert_eq!(p.bucket(3.0), "[2, 4)");
        assert_eq!(p.bucket(8.0), "[6, 8)");
        assert_eq!(p.index(7.9), Some(3));
    }

    #[test]
    fn test_outside_range() {
        let p = learned();
        assert_eq!(p.bucket(-1.0), "(-∞, 0)");
        assert_eq!(p.bucket(9.0), "[8, ∞)");
        assert_eq!(p.index(9.0), None);
        assert_eq!(p.bucket(f64::NAN), "NaN");
    }

    #[test]
    fn test_labels() {
        let p = learned();
        assert_eq!(p.labels(), vec!["[0, 2)", "[2, 4)", "[4, 6)", "[6, 8)"]);
        assert!(Partitioner::new(3).labels().is_empty());
    }

    #[test]
    fn test_single_value() {
        let mut p = Partitioner::new(2);
        p.learn(&[5.0, 5.0]);
        assert_eq!(p.index(5.0), Some(0));
    }
}
