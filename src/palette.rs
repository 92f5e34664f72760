// Color maps, glyph shapes and dash patterns for data-driven aesthetics

use std::cell::Cell;
use std::fmt;

use plotters::style::RGBAColor;

use crate::interval::Interval;

/// Neutral color used for values which cannot be mapped (what ggplot2 does).
pub const GRAY50: RGBAColor = RGBAColor(0x7f, 0x7f, 0x7f, 1.0);

pub const BLACK: RGBAColor = RGBAColor(0, 0, 0, 1.0);
pub const WHITE: RGBAColor = RGBAColor(0xff, 0xff, 0xff, 1.0);

/// Maps a value in `[min, max]` to a color.
///
/// The bounds take `&self` so a map can be shared between the Color and
/// the Fill scale.
pub trait ColorMap: fmt::Debug {
    fn name(&self) -> &str;

    /// Color for x. Values outside the bounds are clamped or wrapped,
    /// depending on the map.
    fn at(&self, x: f64) -> RGBAColor;

    /// `n` distinct colors for discrete guides.
    fn palette(&self, n: usize) -> Vec<RGBAColor>;

    /// Opacity of the produced colors.
    fn alpha(&self) -> f64 {
        1.0
    }

    fn min(&self) -> f64;
    fn max(&self) -> f64;
    fn set_min(&self, min: f64);
    fn set_max(&self, max: f64);
}

/// Equally spaced hue rainbow.
#[derive(Debug, Clone)]
pub struct Rainbow {
    pub saturation: f64,
    pub value: f64,
    /// Hue used for the min value.
    pub start_hue: f64,
    /// Fraction of the hue circle which is not used.
    pub hue_gap: f64,
    pub alpha: f64,
    bounds: Cell<Interval>,
}

impl Rainbow {
    pub fn new(saturation: f64, value: f64) -> Self {
        Rainbow {
            saturation,
            value,
            start_hue: 0.0,
            hue_gap: 1.0 / 6.0,
            alpha: 1.0,
            bounds: Cell::new(Interval::UNIT),
        }
    }

    pub fn with_start_hue(mut self, hue: f64) -> Self {
        self.start_hue = hue;
        self
    }

    pub fn with_hue_gap(mut self, gap: f64) -> Self {
        self.hue_gap = gap;
        self
    }

    /// # Panics
    /// If alpha is outside `[0, 1]`.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        assert!((0.0..=1.0).contains(&alpha), "Rainbow alpha {} not in [0,1]", alpha);
        self.alpha = alpha;
        self
    }
}

impl Default for Rainbow {
    fn default() -> Self {
        Rainbow::new(0.9, 0.9)
    }
}

impl ColorMap for Rainbow {
    fn name(&self) -> &str {
        "rainbow"
    }

    fn at(&self, x: f64) -> RGBAColor {
        let b = self.bounds.get();
        let mut h = self.start_hue + (1.0 - self.hue_gap) * (x - b.min) / b.len();
        if h > 1.0 {
            h -= h.trunc();
        }
        hsva(h, self.saturation, self.value, self.alpha)
    }

    fn palette(&self, n: usize) -> Vec<RGBAColor> {
        (0..n)
            .map(|i| hsva(i as f64 / (n + 1) as f64, self.saturation, self.value, self.alpha))
            .collect()
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn min(&self) -> f64 {
        self.bounds.get().min
    }

    fn max(&self) -> f64 {
        self.bounds.get().max
    }

    fn set_min(&self, min: f64) {
        let mut b = self.bounds.get();
        b.min = min;
        self.bounds.set(b);
    }

    fn set_max(&self, max: f64) {
        let mut b = self.bounds.get();
        b.max = max;
        self.bounds.set(b);
    }
}

/// Piecewise linear interpolation between evenly spaced color stops.
#[derive(Debug, Clone)]
pub struct Gradient {
    name: String,
    stops: Vec<RGBAColor>,
    bounds: Cell<Interval>,
}

impl Gradient {
    /// # Panics
    /// If fewer than two stops are given.
    pub fn new(name: impl Into<String>, stops: Vec<RGBAColor>) -> Self {
        assert!(stops.len() >= 2, "a gradient needs at least two color stops");
        Gradient {
            name: name.into(),
            stops,
            bounds: Cell::new(Interval::UNIT),
        }
    }

    /// Black over red and yellow to white.
    pub fn black_body() -> Self {
        Gradient::new(
            "black-body",
            vec![
                RGBAColor(0, 0, 0, 1.0),
                RGBAColor(178, 34, 34, 1.0),
                RGBAColor(227, 105, 5, 1.0),
                RGBAColor(238, 210, 20, 1.0),
                RGBAColor(255, 255, 255, 1.0),
            ],
        )
    }

    pub fn blues() -> Self {
        Gradient::new(
            "blues",
            vec![
                RGBAColor(247, 251, 255, 1.0),
                RGBAColor(107, 174, 214, 1.0),
                RGBAColor(8, 48, 107, 1.0),
            ],
        )
    }
}

impl ColorMap for Gradient {
    fn name(&self) -> &str {
        &self.name
    }

    fn at(&self, x: f64) -> RGBAColor {
        let b = self.bounds.get();
        let t = ((x - b.min) / b.len()).clamp(0.0, 1.0);
        if t.is_nan() {
            return GRAY50;
        }
        let segments = (self.stops.len() - 1) as f64;
        let pos = t * segments;
        let i = (pos.floor() as usize).min(self.stops.len() - 2);
        lerp(self.stops[i], self.stops[i + 1], pos - i as f64)
    }

    fn palette(&self, n: usize) -> Vec<RGBAColor> {
        let b = self.bounds.get();
        match n {
            0 => Vec::new(),
            1 => vec![self.at(b.min + 0.5 * b.len())],
            _ => (0..n)
                .map(|i| self.at(b.min + b.len() * i as f64 / (n - 1) as f64))
                .collect(),
        }
    }

    fn min(&self) -> f64 {
        self.bounds.get().min
    }

    fn max(&self) -> f64 {
        self.bounds.get().max
    }

    fn set_min(&self, min: f64) {
        let mut b = self.bounds.get();
        b.min = min;
        self.bounds.set(b);
    }

    fn set_max(&self, max: f64) {
        let mut b = self.bounds.get();
        b.max = max;
        self.bounds.set(b);
    }
}

/// A fixed list of distinct colors.
#[derive(Debug, Clone)]
pub struct Categorical {
    colors: Vec<RGBAColor>,
    bounds: Cell<Interval>,
}

impl Categorical {
    /// Category10 color palette (D3-inspired): blue, orange, green, red,
    /// purple, brown, pink, gray, olive, cyan.
    pub fn category10() -> Self {
        let rgb = [
            0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f,
            0xbcbd22, 0x17becf,
        ];
        Categorical {
            colors: rgb.iter().map(|&c| hex(c)).collect(),
            bounds: Cell::new(Interval::UNIT),
        }
    }

    /// Color for a specific index (wraps around if index > palette size).
    pub fn get_color(&self, index: usize) -> RGBAColor {
        self.colors[index % self.colors.len()]
    }
}

impl ColorMap for Categorical {
    fn name(&self) -> &str {
        "category10"
    }

    fn at(&self, x: f64) -> RGBAColor {
        let b = self.bounds.get();
        let t = (x - b.min) / b.len();
        if t.is_nan() {
            return GRAY50;
        }
        let n = self.colors.len();
        let i = ((t * n as f64).floor().max(0.0) as usize).min(n - 1);
        self.colors[i]
    }

    fn palette(&self, n: usize) -> Vec<RGBAColor> {
        (0..n).map(|i| self.get_color(i)).collect()
    }

    fn min(&self) -> f64 {
        self.bounds.get().min
    }

    fn max(&self) -> f64 {
        self.bounds.get().max
    }

    fn set_min(&self, min: f64) {
        let mut b = self.bounds.get();
        b.min = min;
        self.bounds.set(b);
    }

    fn set_max(&self, max: f64) {
        let mut b = self.bounds.get();
        b.max = max;
        self.bounds.set(b);
    }
}

/// Glyph shapes for the Shape aesthetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
    Plus,
    Ring,
    Star,
}

impl Shape {
    const ALL: [Shape; 8] = [
        Shape::Circle,
        Shape::Square,
        Shape::Triangle,
        Shape::Diamond,
        Shape::Cross,
        Shape::Plus,
        Shape::Ring,
        Shape::Star,
    ];

    /// Shape for a specific index (wraps around, negative indices too).
    pub fn nth(i: i64) -> Shape {
        Shape::ALL[i.rem_euclid(Shape::ALL.len() as i64) as usize]
    }

    /// Whether the glyph is drawn as an outline rather than filled.
    pub fn is_outline(self) -> bool {
        matches!(self, Shape::Cross | Shape::Plus | Shape::Ring)
    }
}

/// Dash pattern (on/off lengths) for the Stroke aesthetic; empty is solid.
pub fn dashes(i: i64) -> Vec<f64> {
    const PATTERNS: [&[f64]; 6] = [
        &[],
        &[6.0, 2.0],
        &[2.0, 2.0],
        &[2.0, 2.0, 6.0, 2.0],
        &[6.0, 2.0, 2.0, 2.0, 2.0, 2.0],
        &[10.0, 4.0],
    ];
    PATTERNS[i.rem_euclid(PATTERNS.len() as i64) as usize].to_vec()
}

/// Scales the opacity of c by alpha.
pub fn fade(c: RGBAColor, alpha: f64) -> RGBAColor {
    RGBAColor(c.0, c.1, c.2, c.3 * alpha)
}

fn hex(rgb: u32) -> RGBAColor {
    RGBAColor((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 1.0)
}

fn lerp(a: RGBAColor, b: RGBAColor, t: f64) -> RGBAColor {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBAColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2), a.3 + (b.3 - a.3) * t)
}

/// HSV (all in `[0, 1]`) plus alpha to RGBA.
pub fn hsva(h: f64, s: f64, v: f64, a: f64) -> RGBAColor {
    let h6 = (h.rem_euclid(1.0)) * 6.0;
    let c = v * s;
    let x = c * (1.0 - (h6 % 2.0 - 1.0).abs());
    let (r, g, b) = match h6 as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    let byte = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    RGBAColor(byte(r), byte(g), byte(b), a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category10_wraps() {
        let palette = Categorical::category10();
        assert_eq!(palette.get_color(0), RGBAColor(0x1f, 0x77, 0xb4, 1.0));
        assert_eq!(palette.get_color(10), palette.get_color(0));
        assert_eq!(palette.get_color(11), palette.get_color(1));
    }

    #[test]
    fn test_categorical_at_buckets() {
        let palette = Categorical::category10();
        assert_eq!(palette.at(0.0), palette.get_color(0));
        assert_eq!(palette.at(1.0), palette.get_color(9));
        assert_eq!(palette.at(0.55), palette.get_color(5));
    }

    #[test]
    fn test_hsva_primaries() {
        assert_eq!(hsva(0.0, 1.0, 1.0, 1.0), RGBAColor(255, 0, 0, 1.0));
        assert_eq!(hsva(1.0 / 3.0, 1.0, 1.0, 1.0), RGBAColor(0, 255, 0, 1.0));
        assert_eq!(hsva(2.0 / 3.0, 1.0, 1.0, 1.0), RGBAColor(0, 0, 255, 1.0));
        assert_eq!(hsva(0.5, 0.0, 0.5, 1.0), RGBAColor(128, 128, 128, 1.0));
    }

    #[test]
    fn test_rainbow_bounds() {
        let rainbow = Rainbow::new(1.0, 1.0);
        assert_eq!(rainbow.at(0.0), RGBAColor(255, 0, 0, 1.0));
        rainbow.set_min(10.0);
        rainbow.set_max(20.0);
        assert_eq!(rainbow.min(), 10.0);
        assert_eq!(rainbow.at(10.0), RGBAColor(255, 0, 0, 1.0));
        assert_ne!(rainbow.at(20.0), rainbow.at(10.0));
    }

    #[test]
    fn test_rainbow_palette_distinct() {
        let colors = Rainbow::default().palette(4);
        assert_eq!(colors.len(), 4);
        for i in 1..colors.len() {
            assert_ne!(colors[i - 1], colors[i]);
        }
    }

    #[test]
    #[should_panic]
    fn test_rainbow_rejects_bad_alpha() {
        let _ = Rainbow::default().with_alpha(1.5);
    }

    #[test]
    fn test_gradient_endpoints() {
        let g = Gradient::black_body();
        assert_eq!(g.at(0.0), RGBAColor(0, 0, 0, 1.0));
        assert_eq!(g.at(1.0), RGBAColor(255, 255, 255, 1.0));
        assert_eq!(g.at(2.0), g.at(1.0));
        assert_eq!(g.palette(3)[2], RGBAColor(255, 255, 255, 1.0));
    }

    #[test]
    fn test_shape_nth_wraps() {
        assert_eq!(Shape::nth(0), Shape::Circle);
        assert_eq!(Shape::nth(1), Shape::Square);
        assert_eq!(Shape::nth(8), Shape::Circle);
        assert_eq!(Shape::nth(-1), Shape::Star);
    }

    #[test]
    fn test_dashes() {
        assert!(dashes(0).is_empty());
        assert_eq!(dashes(1), vec![6.0, 2.0]);
        assert_eq!(dashes(6), dashes(0));
    }

    #[test]
    fn test_fade() {
        assert_eq!(fade(BLACK, 0.5), RGBAColor(0, 0, 0, 0.5));
    }
}
