// Scales: what is mapped from data onto an aesthetic, and how

use std::fmt;
use std::rc::Rc;

use plotters::style::RGBAColor;

use crate::interval::Interval;
use crate::palette::{ColorMap, GRAY50};
use crate::ticks::{Tick, Ticker};
use crate::trans::Transformation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleType {
    Linear,
    Discrete,
    Time,
    Logarithmic,
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScaleType::Linear => "linear",
            ScaleType::Discrete => "discrete",
            ScaleType::Time => "time",
            ScaleType::Logarithmic => "log",
        };
        f.write_str(name)
    }
}

/// Margin added around the data when autoscaling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Expand {
    /// Added in data units on both sides.
    pub absolute: f64,
    /// Fraction of the data span added on both sides.
    pub relative: f64,
}

/// How the Limit of a scale is derived from its Data.
///
/// `min_range` is the allowed interval for `Limit.min`, `max_range` the one
/// for `Limit.max`. A degenerate interval `[a, a]` fixes that edge to a.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autoscaling {
    pub expand: Expand,
    pub min_range: Interval,
    pub max_range: Interval,
}

impl Default for Autoscaling {
    fn default() -> Self {
        Autoscaling {
            expand: Expand::default(),
            min_range: Interval::UNSET,
            max_range: Interval::UNSET,
        }
    }
}

/// Output interval (in pixels) for the Size aesthetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeMap {
    pub min: f64,
    pub max: f64,
}

impl SizeMap {
    /// From 2 pixels up to half the size of a legend swatch.
    pub fn for_swatch(swatch_size: f64) -> Self {
        SizeMap {
            min: 2.0,
            max: 0.5 * swatch_size,
        }
    }
}

/// A scale tracks three intervals:
///
/// * `data`: the extent of all data seen while learning,
/// * `limit`: the values which will be shown (data after autoscaling),
/// * `range`: the output interval values are mapped onto.
///
/// Data and Limit are recomputed on every render, Range is filled from
/// Limit unless pinned with [`Scale::set_range`].
#[derive(Clone)]
pub struct Scale {
    pub title: String,
    pub trans: Transformation,
    pub scale_type: ScaleType,
    pub autoscaling: Autoscaling,
    /// Overrides the ticker of the transformation.
    pub ticker: Option<Ticker>,
    pub color_map: Option<Rc<dyn ColorMap>>,
    pub size_map: Option<SizeMap>,

    data: Interval,
    limit: Interval,
    range: Interval,
    fixed_range: Interval,
}

impl Scale {
    pub fn new() -> Self {
        Scale {
            title: String::new(),
            trans: Transformation::Identity,
            scale_type: ScaleType::Linear,
            autoscaling: Autoscaling::default(),
            ticker: None,
            color_map: None,
            size_map: None,
            data: Interval::UNSET,
            limit: Interval::UNSET,
            range: Interval::UNSET,
            fixed_range: Interval::UNSET,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_trans(mut self, trans: Transformation) -> Self {
        self.trans = trans;
        self
    }

    pub fn with_type(mut self, scale_type: ScaleType) -> Self {
        self.scale_type = scale_type;
        self
    }

    /// Switches to a decadic logarithmic scale.
    pub fn set_log(&mut self) {
        self.scale_type = ScaleType::Logarithmic;
        self.trans = Transformation::Log10;
    }

    pub fn data(&self) -> Interval {
        self.data
    }

    pub fn limit(&self) -> Interval {
        self.limit
    }

    pub fn range(&self) -> Interval {
        self.range
    }

    /// Fixes the lower limit of the scale to x, disabling autoscaling of
    /// that edge.
    pub fn fix_min(&mut self, x: f64) {
        self.autoscaling.min_range = Interval::pinned(x);
    }

    /// Fixes the upper limit of the scale to x.
    pub fn fix_max(&mut self, x: f64) {
        self.autoscaling.max_range = Interval::pinned(x);
    }

    /// Pins the output range. NaN edges are still filled from the Limit.
    pub fn set_range(&mut self, range: Interval) {
        self.fixed_range = range;
    }

    /// Forgets everything learned by a previous render.
    pub fn reset(&mut self) {
        self.data = Interval::UNSET;
        self.limit = Interval::UNSET;
        self.range = Interval::UNSET;
    }

    pub fn update_data(&mut self, i: Interval) {
        self.data.union(i);
    }

    pub fn has_data(&self) -> bool {
        self.data.is_set()
    }

    /// Reports whether x lies within the Limit.
    pub fn in_range(&self, x: f64) -> bool {
        self.limit.contains(x)
    }

    /// Maps x onto `[0, 1]`. NaN if the Limit is unset or degenerate.
    pub fn map(&self, x: f64) -> f64 {
        if !self.limit.is_set() || self.limit.is_degenerate() {
            return f64::NAN;
        }
        self.trans.trans(self.limit, Interval::UNIT, x)
    }

    /// Turns the Data interval into the Limit.
    ///
    /// Must run exactly once per render: relative expansion compounds.
    pub fn autoscale(&mut self) {
        if !self.has_data() {
            return;
        }
        let a = self.autoscaling;

        self.limit.min = if a.min_range.is_degenerate() {
            a.min_range.min
        } else {
            let mut min = self.expand_edge(true);
            if a.min_range.min > min {
                min = a.min_range.min;
            }
            if a.min_range.max < min {
                min = a.min_range.max;
            }
            min
        };

        self.limit.max = if a.max_range.is_degenerate() {
            a.max_range.min
        } else {
            let mut max = self.expand_edge(false);
            if a.max_range.min > max {
                max = a.max_range.min;
            }
            if a.max_range.max < max {
                max = a.max_range.max;
            }
            max
        };
    }

    // Discrete scales get half a category of room on each side, log scales
    // expand multiplicatively, everything else linearly in data units.
    fn expand_edge(&self, min: bool) -> f64 {
        let e = self.autoscaling.expand;
        if self.scale_type == ScaleType::Discrete {
            return if min {
                self.data.min - 0.5 - e.absolute
            } else {
                self.data.max + 0.5 + e.absolute
            };
        }

        let trans = match self.trans {
            Transformation::Log10 => Transformation::Log10,
            _ => Transformation::Linear,
        };
        if min {
            trans.inverse(self.data, Interval::UNIT, -e.relative) - e.absolute
        } else {
            trans.inverse(self.data, Interval::UNIT, 1.0 + e.relative) + e.absolute
        }
    }

    /// Repairs a non-finite or zero-width Limit. Returns whether it did.
    pub fn de_degenerate(&mut self) -> bool {
        self.limit.degenerate()
    }

    pub fn fill_range(&mut self) {
        self.range.min = if self.fixed_range.min.is_nan() {
            self.limit.min
        } else {
            self.fixed_range.min
        };
        self.range.max = if self.fixed_range.max.is_nan() {
            self.limit.max
        } else {
            self.fixed_range.max
        };
    }

    /// The ticker in effect: explicit, discrete, or the transformation's.
    pub fn effective_ticker(&self) -> Ticker {
        match (&self.ticker, self.scale_type) {
            (Some(t), _) => t.clone(),
            (None, ScaleType::Discrete) => Ticker::Discrete,
            (None, _) => self.trans.ticker(),
        }
    }

    /// Ticks covering the Limit.
    pub fn ticks(&self) -> Vec<Tick> {
        self.effective_ticker().ticks(self.limit.min, self.limit.max)
    }

    /// Color for x. Values outside the Limit, NaN, or values on a scale
    /// without a color map come out as [`GRAY50`].
    pub fn map_color(&self, x: f64) -> RGBAColor {
        if !self.in_range(x) {
            return GRAY50;
        }
        let cm = match &self.color_map {
            Some(cm) => cm,
            None => return GRAY50,
        };

        if self.scale_type == ScaleType::Discrete {
            let ticks = self.ticks();
            let first = self.limit.min.min(self.limit.max).ceil();
            let idx = (x.round() - first) as usize;
            return cm
                .palette(ticks.len())
                .get(idx)
                .copied()
                .unwrap_or(GRAY50);
        }

        let t = self.map(x);
        if t.is_nan() {
            return GRAY50;
        }
        cm.at(cm.min() + t * (cm.max() - cm.min()))
    }

    /// Length for x, 0 for values outside the Limit.
    pub fn map_size(&self, x: f64) -> f64 {
        if !self.in_range(x) {
            return 0.0;
        }
        let sm = match self.size_map {
            Some(sm) => sm,
            None => return 0.0,
        };
        let s = self.trans.trans(self.range, Interval::new(sm.min, sm.max), x);
        if s.is_nan() {
            0.0
        } else {
            s
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::new()
    }
}

impl fmt::Debug for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scale")
            .field("title", &self.title)
            .field("data", &self.data)
            .field("limit", &self.limit)
            .field("range", &self.range)
            .field("trans", &self.trans)
            .field("scale_type", &self.scale_type)
            .field("color_map", &self.color_map.as_ref().map(|cm| cm.name().to_string()))
            .field("size_map", &self.size_map)
            .finish()
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Data={} Limit={} Range={}  {} {:?}",
            self.data, self.limit, self.range, self.scale_type, self.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rainbow;
    use approx::assert_abs_diff_eq;

    fn learned(data: Interval) -> Scale {
        let mut s = Scale::new().with_trans(Transformation::Linear);
        s.update_data(data);
        s
    }

    #[test]
    fn test_new_scale_is_unset() {
        let s = Scale::new();
        assert!(!s.has_data());
        assert!(s.map(1.0).is_nan());
        assert!(!s.in_range(0.0));
        assert_eq!(s.trans, Transformation::Identity);
    }

    #[test]
    fn test_autoscale_without_expansion_keeps_data() {
        let mut s = learned(Interval::new(3.0, 8.0));
        s.autoscale();
        assert_eq!(s.limit(), s.data());
    }

    #[test]
    fn test_autoscale_relative_expansion() {
        let mut s = learned(Interval::new(0.0, 30.0));
        s.autoscaling.expand.relative = 0.05;
        s.autoscale();
        assert_abs_diff_eq!(s.limit().min, -1.5, epsilon = 1e-9);
        assert_abs_diff_eq!(s.limit().max, 31.5, epsilon = 1e-9);

        // Recomputes from Data, no compounding.
        s.autoscale();
        assert_abs_diff_eq!(s.limit().max, 31.5, epsilon = 1e-9);
    }

    #[test]
    fn test_autoscale_absolute_expansion() {
        let mut s = learned(Interval::new(0.0, 10.0));
        s.autoscaling.expand.absolute = 2.0;
        s.autoscale();
        assert_eq!(s.limit(), Interval::new(-2.0, 12.0));
    }

    #[test]
    fn test_fixed_min_overrides_data() {
        let mut s = learned(Interval::new(1.0, 10.0));
        s.autoscaling.expand.relative = 0.1;
        s.fix_min(5.0);
        s.autoscale();
        assert_eq!(s.limit().min, 5.0);
        assert_abs_diff_eq!(s.limit().max, 10.9, epsilon = 1e-9);
    }

    #[test]
    fn test_min_range_clamps() {
        let mut s = learned(Interval::new(-3.0, 10.0));
        s.autoscaling.min_range = Interval::new(0.0, 2.0);
        s.autoscale();
        assert_eq!(s.limit().min, 0.0);
    }

    #[test]
    fn test_log_expansion_is_multiplicative() {
        let mut s = learned(Interval::new(1.0, 1000.0));
        s.set_log();
        s.autoscaling.expand.relative = 1.0 / 3.0;
        s.autoscale();
        assert_abs_diff_eq!(s.limit().min, 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(s.limit().max, 10000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_discrete_pads_half_a_category() {
        let mut s = learned(Interval::new(0.0, 2.0)).with_type(ScaleType::Discrete);
        s.autoscale();
        assert_eq!(s.limit(), Interval::new(-0.5, 2.5));
        let labels: Vec<String> = s.ticks().into_iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_fill_range_respects_pinned_edges() {
        let mut s = learned(Interval::new(0.0, 10.0));
        s.set_range(Interval::new(f64::NAN, 5.0));
        s.autoscale();
        s.fill_range();
        assert_eq!(s.range(), Interval::new(0.0, 5.0));

        s.reset();
        assert!(!s.range().is_set());
    }

    #[test]
    fn test_map_degenerate_limit_is_nan() {
        let mut s = learned(Interval::pinned(4.0));
        s.autoscale();
        assert!(s.map(4.0).is_nan());
        assert!(s.de_degenerate());
        assert_abs_diff_eq!(s.map(4.0), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_map_color_out_of_range_is_gray() {
        let mut s = learned(Interval::new(0.0, 10.0));
        s.color_map = Some(Rc::new(Rainbow::default()));
        s.autoscale();
        assert_eq!(s.map_color(11.0), GRAY50);
        assert_eq!(s.map_color(f64::NAN), GRAY50);
        assert_ne!(s.map_color(5.0), GRAY50);
    }

    #[test]
    fn test_map_size() {
        let mut s = learned(Interval::new(0.0, 10.0));
        s.size_map = Some(SizeMap { min: 2.0, max: 10.0 });
        s.autoscale();
        s.fill_range();
        assert_abs_diff_eq!(s.map_size(0.0), 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.map_size(10.0), 10.0, epsilon = 1e-9);
        assert_eq!(s.map_size(20.0), 0.0);
    }

    #[test]
    fn test_display() {
        let mut s = learned(Interval::new(1.0, 2.0)).with_title("Weight");
        s.autoscale();
        assert_eq!(
            s.to_string(),
            "Data=[1.00:2.00] Limit=[1.00:2.00] Range=[NaN:NaN]  linear \"Weight\""
        );
    }
}
