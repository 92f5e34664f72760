// One cell of the facet grid and the mapping from data to canvas

use plotters::style::RGBAColor;

use crate::aes::Aes;
use crate::canvas::{Point, Rect};
use crate::geom::Geom;
use crate::interval::Interval;
use crate::scale::Scale;
use crate::style::Style;

/// A panel owns the geoms drawn into it. Its scales are assigned by the
/// plot: the X scale of its column, the Y scale of its row and the plot
/// wide scales for all other aesthetics.
#[derive(Default)]
pub struct Panel {
    /// Shown in a strip above the panel if not empty.
    pub title: String,
    pub geoms: Vec<Box<dyn Geom>>,
    pub(crate) rect: Option<Rect>,
}

impl Panel {
    pub fn new() -> Self {
        Panel::default()
    }

    pub fn add(&mut self, geom: impl Geom + 'static) {
        self.geoms.push(Box::new(geom));
    }

    /// The canvas region of the last draw.
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }
}

/// What a geom sees of its panel while drawing.
#[derive(Clone, Copy)]
pub struct PanelView<'a> {
    pub rect: Rect,
    pub style: &'a Style,
    scales: [&'a Scale; Aes::COUNT],
}

impl<'a> PanelView<'a> {
    pub fn new(rect: Rect, style: &'a Style, scales: [&'a Scale; Aes::COUNT]) -> Self {
        PanelView {
            rect,
            style,
            scales,
        }
    }

    pub fn scale(&self, aes: Aes) -> &'a Scale {
        self.scales[aes.index()]
    }

    /// Maps the data coordinate (x, y) to a canvas point, `None` if it
    /// cannot be positioned.
    pub fn map_xy(&self, x: f64, y: f64) -> Option<Point> {
        Some(Point::new(self.map_x(x)?, self.map_y(y)?))
    }

    pub fn map_x(&self, x: f64) -> Option<f64> {
        let xs = self.scale(Aes::X);
        let cx = xs.trans.trans(xs.range(), self.rect.x_interval(), x);
        if !cx.is_finite() {
            None
        } else {
            Some(cx)
        }
    }

    pub fn map_y(&self, y: f64) -> Option<f64> {
        let ys = self.scale(Aes::Y);
        let cy = ys.trans.trans(ys.range(), self.rect.y_interval(), y);
        if !cy.is_finite() {
            None
        } else {
            Some(cy)
        }
    }

    pub fn in_range_xy(&self, x: f64, y: f64) -> bool {
        self.scale(Aes::X).in_range(x) && self.scale(Aes::Y).in_range(y)
    }

    pub fn x_limit(&self) -> Interval {
        self.scale(Aes::X).limit()
    }

    pub fn y_limit(&self) -> Interval {
        self.scale(Aes::Y).limit()
    }

    pub fn map_color(&self, v: f64) -> RGBAColor {
        self.scale(Aes::Color).map_color(v)
    }

    pub fn map_fill(&self, v: f64) -> RGBAColor {
        self.scale(Aes::Fill).map_color(v)
    }

    pub fn map_size(&self, v: f64) -> f64 {
        self.scale(Aes::Size).map_size(v)
    }

    /// Opacity for v, `None` if v cannot be mapped into `[0, 1]`.
    pub fn map_alpha(&self, v: f64) -> Option<f64> {
        let a = self.scale(Aes::Alpha).map(v);
        if (0.0..=1.0).contains(&a) {
            Some(a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trans::Transformation;

    fn prepared(data: Interval) -> Scale {
        let mut s = Scale::new().with_trans(Transformation::Linear);
        s.update_data(data);
        s.autoscale();
        s.fill_range();
        s
    }

    #[test]
    fn test_map_xy() {
        let x = prepared(Interval::new(0.0, 10.0));
        let y = prepared(Interval::new(0.0, 100.0));
        let other = Scale::new();
        let style = Style::default();
        let mut scales = [&other; Aes::COUNT];
        scales[Aes::X.index()] = &x;
        scales[Aes::Y.index()] = &y;
        let view = PanelView::new(Rect::new(100.0, 50.0, 200.0, 250.0), &style, scales);

        assert_eq!(view.map_xy(0.0, 0.0), Some(Point::new(100.0, 50.0)));
        assert_eq!(view.map_xy(5.0, 100.0), Some(Point::new(150.0, 250.0)));
        assert_eq!(view.map_xy(f64::NAN, 1.0), None);
        assert_eq!(view.map_xy(f64::INFINITY, 1.0), None);
        assert_eq!(view.map_y(f64::NEG_INFINITY), None);
        assert!(view.in_range_xy(10.0, 50.0));
        assert!(!view.in_range_xy(11.0, 50.0));
    }

    #[test]
    fn test_map_alpha_rejects_out_of_range() {
        let alpha = prepared(Interval::new(0.0, 4.0));
        let style = Style::default();
        let mut scales = [&alpha; Aes::COUNT];
        scales[Aes::Alpha.index()] = &alpha;
        let view = PanelView::new(Rect::new(0.0, 0.0, 1.0, 1.0), &style, scales);

        assert_eq!(view.map_alpha(2.0), Some(0.5));
        assert_eq!(view.map_alpha(5.0), None);
        assert_eq!(view.map_alpha(f64::NAN), None);
    }
}
