// Geoms: drawable representations of data inside a panel.
//
// Each geom has required positional data (points, rectangles, ...) and
// optional aesthetics which map a data index to a value on the plot wide
// Alpha, Color, Fill, Shape, Size or Stroke scale.

use std::rc::Rc;

use plotters::style::RGBAColor;

use crate::aes::{Aes, DataRanges};
use crate::canvas::Canvas;
use crate::palette::fade;
use crate::panel::PanelView;

pub mod bar;
pub mod boxplot;
pub mod line;
pub mod point;
pub mod rect;
pub mod text;

pub use bar::{Bar, BarGroups, BarPosition};
pub use boxplot::{BoxStats, Boxplot};
pub use line::{HLine, Line, Path, Segment, Step, VLine};
pub use point::Point;
pub use rect::Rectangle;
pub use text::Text;

/// Anything which can be drawn into a panel.
pub trait Geom {
    /// The interval of values per aesthetic this geom needs mapped.
    fn data_ranges(&self) -> DataRanges;

    /// Draws the geom using the scales of the panel.
    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas);
}

/// Maps data point i to a continuous aesthetic value.
pub type Aesthetic = Rc<dyn Fn(usize) -> f64>;

/// Maps data point i to a discrete aesthetic value like a shape index.
pub type DiscreteAesthetic = Rc<dyn Fn(usize) -> i64>;

/// Two corners (x, y) and (u, v), or a segment from (x, y) to (u, v).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XYUV {
    pub x: f64,
    pub y: f64,
    pub u: f64,
    pub v: f64,
}

impl XYUV {
    pub fn new(x: f64, y: f64, u: f64, v: f64) -> Self {
        XYUV { x, y, u, v }
    }
}

/// The optional aesthetics of a geom. A geom ignores the ones it cannot
/// show (e.g. Fill on a Path).
#[derive(Clone, Default)]
pub struct Aesthetics {
    pub alpha: Option<Aesthetic>,
    pub color: Option<Aesthetic>,
    pub fill: Option<Aesthetic>,
    pub shape: Option<DiscreteAesthetic>,
    pub size: Option<Aesthetic>,
    pub stroke: Option<DiscreteAesthetic>,
}

impl Aesthetics {
    pub fn new() -> Self {
        Aesthetics::default()
    }

    pub fn alpha(mut self, f: impl Fn(usize) -> f64 + 'static) -> Self {
        self.alpha = Some(Rc::new(f));
        self
    }

    pub fn color(mut self, f: impl Fn(usize) -> f64 + 'static) -> Self {
        self.color = Some(Rc::new(f));
        self
    }

    pub fn fill(mut self, f: impl Fn(usize) -> f64 + 'static) -> Self {
        self.fill = Some(Rc::new(f));
        self
    }

    pub fn shape(mut self, f: impl Fn(usize) -> i64 + 'static) -> Self {
        self.shape = Some(Rc::new(f));
        self
    }

    pub fn size(mut self, f: impl Fn(usize) -> f64 + 'static) -> Self {
        self.size = Some(Rc::new(f));
        self
    }

    pub fn stroke(mut self, f: impl Fn(usize) -> i64 + 'static) -> Self {
        self.stroke = Some(Rc::new(f));
        self
    }

    /// The same aesthetics, looked up at `index(i)` instead of i. Used when
    /// a geom is composed of sub-geoms with a different number of items.
    pub fn remapped(&self, index: impl Fn(usize) -> usize + Clone + 'static) -> Self {
        fn cont(f: &Option<Aesthetic>, index: impl Fn(usize) -> usize + 'static) -> Option<Aesthetic> {
            f.clone().map(|f| Rc::new(move |i: usize| f(index(i))) as Aesthetic)
        }
        fn disc(
            f: &Option<DiscreteAesthetic>,
            index: impl Fn(usize) -> usize + 'static,
        ) -> Option<DiscreteAesthetic> {
            f.clone().map(|f| Rc::new(move |i: usize| f(index(i))) as DiscreteAesthetic)
        }

        Aesthetics {
            alpha: cont(&self.alpha, index.clone()),
            color: cont(&self.color, index.clone()),
            fill: cont(&self.fill, index.clone()),
            shape: disc(&self.shape, index.clone()),
            size: cont(&self.size, index.clone()),
            stroke: disc(&self.stroke, index),
        }
    }

    /// Only the aesthetics in `keep`.
    pub fn only(&self, keep: &[Aes]) -> Self {
        let has = |a: Aes| keep.contains(&a);
        Aesthetics {
            alpha: self.alpha.clone().filter(|_| has(Aes::Alpha)),
            color: self.color.clone().filter(|_| has(Aes::Color)),
            fill: self.fill.clone().filter(|_| has(Aes::Fill)),
            shape: self.shape.clone().filter(|_| has(Aes::Shape)),
            size: self.size.clone().filter(|_| has(Aes::Size)),
            stroke: self.stroke.clone().filter(|_| has(Aes::Stroke)),
        }
    }

    /// Folds the values of all n data points into dr.
    pub fn update_ranges(&self, dr: &mut DataRanges, n: usize) {
        for i in 0..n {
            if let Some(f) = &self.alpha {
                dr[Aes::Alpha].update_one(f(i));
            }
            if let Some(f) = &self.color {
                dr[Aes::Color].update_one(f(i));
            }
            if let Some(f) = &self.fill {
                dr[Aes::Fill].update_one(f(i));
            }
            if let Some(f) = &self.shape {
                dr[Aes::Shape].update_one(f(i) as f64);
            }
            if let Some(f) = &self.size {
                dr[Aes::Size].update_one(f(i));
            }
            if let Some(f) = &self.stroke {
                dr[Aes::Stroke].update_one(f(i) as f64);
            }
        }
    }
}

/// Color of data point i: mapped through `color` on the `via` scale (Color
/// or Fill) if present, faded by the mapped alpha. `None` if the alpha
/// cannot be mapped, the point is then not drawn.
pub(crate) fn determine_color(
    base: RGBAColor,
    panel: &PanelView<'_>,
    i: usize,
    color: Option<&Aesthetic>,
    via: Aes,
    alpha: Option<&Aesthetic>,
) -> Option<RGBAColor> {
    assert!(via.is_color(), "{via} has no color map");
    let col = match color {
        Some(f) => panel.scale(via).map_color(f(i)),
        None => base,
    };
    match alpha {
        Some(f) => panel.map_alpha(f(i)).map(|a| fade(col, a)),
        None => Some(col),
    }
}
