// Aesthetic channels and per-channel data ranges

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::interval::Interval;

/// A visual channel data can be mapped onto.
///
/// X and Y are drawn as axes, all others are explained by guides.
/// Shape and Stroke are discrete only: there is a finite set of glyphs
/// and dash patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Aes {
    X,
    Y,
    Alpha,
    Color,
    Fill,
    Shape,
    Size,
    Stroke,
}

impl Aes {
    pub const COUNT: usize = 8;

    pub const ALL: [Aes; Aes::COUNT] = [
        Aes::X,
        Aes::Y,
        Aes::Alpha,
        Aes::Color,
        Aes::Fill,
        Aes::Shape,
        Aes::Size,
        Aes::Stroke,
    ];

    /// The non-positional aesthetics, in guide order.
    pub const GUIDED: [Aes; 6] = [
        Aes::Alpha,
        Aes::Color,
        Aes::Fill,
        Aes::Shape,
        Aes::Size,
        Aes::Stroke,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_positional(self) -> bool {
        matches!(self, Aes::X | Aes::Y)
    }

    pub fn is_color(self) -> bool {
        matches!(self, Aes::Color | Aes::Fill)
    }

    /// Shape and Stroke can only be discrete.
    pub fn requires_discrete(self) -> bool {
        matches!(self, Aes::Shape | Aes::Stroke)
    }

    pub fn name(self) -> &'static str {
        match self {
            Aes::X => "X-Scale",
            Aes::Y => "Y-Scale",
            Aes::Alpha => "Alpha-Scale",
            Aes::Color => "Color-Scale",
            Aes::Fill => "Fill-Scale",
            Aes::Shape => "Shape-Scale",
            Aes::Size => "Size-Scale",
            Aes::Stroke => "Stroke-Scale",
        }
    }
}

impl fmt::Display for Aes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The ranges covered by some data, one interval per aesthetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRanges([Interval; Aes::COUNT]);

impl DataRanges {
    /// All intervals unset.
    pub fn new() -> Self {
        DataRanges([Interval::UNSET; Aes::COUNT])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Aes, &Interval)> {
        Aes::ALL.iter().copied().zip(self.0.iter())
    }

    /// Folds every interval of `other` into `self`.
    pub fn merge(&mut self, other: &DataRanges) {
        for (aes, interval) in other.iter() {
            self[aes].union(*interval);
        }
    }
}

impl Default for DataRanges {
    fn default() -> Self {
        DataRanges::new()
    }
}

impl Index<Aes> for DataRanges {
    type Output = Interval;

    fn index(&self, aes: Aes) -> &Interval {
        &self.0[aes.index()]
    }
}

impl IndexMut<Aes> for DataRanges {
    fn index_mut(&mut self, aes: Aes) -> &mut Interval {
        &mut self.0[aes.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_in_index_order() {
        for (i, aes) in Aes::ALL.iter().enumerate() {
            assert_eq!(aes.index(), i);
        }
    }

    #[test]
    fn test_guided_excludes_positional() {
        assert!(Aes::GUIDED.iter().all(|a| !a.is_positional()));
        assert_eq!(Aes::GUIDED.len() + 2, Aes::COUNT);
    }

    #[test]
    fn test_data_ranges_start_unset_and_merge() {
        let mut a = DataRanges::new();
        assert!(a.iter().all(|(_, i)| !i.is_set()));

        a[Aes::X].update(&[1.0, 2.0]);
        let mut b = DataRanges::new();
        b[Aes::X].update(&[5.0]);
        b[Aes::Size].update(&[3.0]);

        a.merge(&b);
        assert_eq!(a[Aes::X], Interval::new(1.0, 5.0));
        assert_eq!(a[Aes::Size], Interval::new(3.0, 3.0));
        assert!(!a[Aes::Color].is_set());
    }
}
