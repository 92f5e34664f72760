use plotters::style::RGBAColor;

use crate::aes::{Aes, DataRanges};
use crate::canvas::{Canvas, LineStyle};
use crate::geom::{Aesthetics, BarGroups, BarPosition, Geom, Point, Rectangle, Segment, XYUV};
use crate::panel::PanelView;

/// Precomputed five number summary of one box, plus outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub x: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub outliers: Vec<f64>,
}

/// Box and whisker plots.
///
/// Drawn as one rectangle per box, three segments per box (median and the
/// two whiskers) and a point per outlier. The aesthetics of box i apply to
/// all of its parts.
#[derive(Clone, Default)]
pub struct Boxplot {
    pub boxes: Vec<BoxStats>,
    pub aes: Aesthetics,
    pub position: BarPosition,
    pub group_gap: f64,
    pub bar_gap: f64,
    pub default_fill: Option<RGBAColor>,
    pub border: Option<LineStyle>,
}

impl Boxplot {
    pub fn new(boxes: Vec<BoxStats>) -> Self {
        Boxplot {
            boxes,
            ..Default::default()
        }
    }

    pub fn with_aes(mut self, aes: Aesthetics) -> Self {
        self.aes = aes;
        self
    }

    fn groups(&self) -> BarGroups {
        let mut g = BarGroups::new(self.position, self.group_gap, self.bar_gap, true);
        for (i, b) in self.boxes.iter().enumerate() {
            g.record(b.x, i);
        }
        g
    }

    fn parts(&self) -> (Rectangle, Segment, Point) {
        let g = self.groups();
        let n = self.boxes.len();
        let mut rects = Vec::with_capacity(n);
        let mut segs = Vec::with_capacity(3 * n);
        let mut outliers = Vec::new();
        let mut owner = Vec::new();

        for (i, b) in self.boxes.iter().enumerate() {
            let (center, hw) = g.width(b.x, i).unwrap_or((b.x, 0.0));
            let (left, right) = (center - hw, center + hw);

            rects.push(XYUV::new(left, b.q1, right, b.q3));
            segs.push(XYUV::new(left, b.median, right, b.median));
            segs.push(XYUV::new(center, b.min, center, b.q1));
            segs.push(XYUV::new(center, b.q3, center, b.max));
            for &o in &b.outliers {
                outliers.push((center, o));
                owner.push(i);
            }
        }

        let border = self
            .border
            .clone()
            .unwrap_or_else(|| LineStyle::solid(crate::palette::BLACK, 1.0));
        let rect = Rectangle {
            xyuv: rects,
            aes: self.aes.only(&[Aes::Alpha, Aes::Fill]),
            default_fill: self.default_fill,
            border: None,
        };
        let segment = Segment {
            xyuv: segs,
            aes: self
                .aes
                .only(&[Aes::Alpha, Aes::Color, Aes::Size, Aes::Stroke])
                .remapped(|k| k / 3),
            default_color: Some(border.color),
            default_width: Some(border.width),
        };
        let point = Point {
            xy: outliers,
            aes: self
                .aes
                .only(&[Aes::Alpha, Aes::Color, Aes::Shape])
                .remapped(move |k| owner[k]),
            default_color: Some(border.color),
            ..Default::default()
        };
        (rect, segment, point)
    }
}

impl Geom for Boxplot {
    fn data_ranges(&self) -> DataRanges {
        let mut dr = DataRanges::new();
        for b in &self.boxes {
            dr[Aes::X].update_one(b.x);
            dr[Aes::Y].update(&[b.min, b.max]);
            dr[Aes::Y].update(&b.outliers);
        }
        dr[Aes::X].union(self.groups().x_range());
        self.aes.update_ranges(&mut dr, self.boxes.len());
        dr
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        let (rect, segment, point) = self.parts();
        rect.draw(panel, canvas);
        segment.draw(panel, canvas);
        point.draw(panel, canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use crate::geom::testing::Fixture;
    use crate::interval::Interval;

    fn sample() -> BoxStats {
        BoxStats {
            x: 1.0,
            min: 1.0,
            q1: 2.0,
            median: 3.0,
            q3: 4.0,
            max: 5.0,
            outliers: vec![9.0],
        }
    }

    #[test]
    fn test_data_ranges_include_outliers() {
        let bp = Boxplot::new(vec![sample()]);
        let dr = bp.data_ranges();
        assert_eq!(dr[Aes::Y], Interval::new(1.0, 9.0));
        assert!(dr[Aes::X].min < 1.0 && dr[Aes::X].max > 1.0);
    }

    #[test]
    fn test_segments_inherit_box_aesthetics() {
        let mut second = sample();
        second.x = 2.0;
        second.outliers.clear();
        let bp = Boxplot::new(vec![sample(), second])
            .with_aes(Aesthetics::new().stroke(|i| i as i64 * 2).color(|i| i as f64));
        let (rect, segment, point) = bp.parts();

        assert_eq!(rect.xyuv.len(), 2);
        assert_eq!(segment.xyuv.len(), 6);
        let stroke = segment.aes.stroke.as_ref().unwrap();
        assert_eq!(stroke(2), 0);
        assert_eq!(stroke(3), 2);
        assert_eq!(point.xy, vec![(1.0, 9.0)]);
        assert_eq!((point.aes.color.as_ref().unwrap())(0), 0.0);
    }

    #[test]
    fn test_draw_emits_all_parts() {
        let bp = Boxplot::new(vec![sample()]);
        let fixture = Fixture::new(&bp.data_ranges());
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        bp.draw(&fixture.view(), &mut canvas);

        let fills = canvas
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillPath { .. }))
            .count();
        let strokes = canvas
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePath { .. }))
            .count();
        assert_eq!(fills, 1);
        assert_eq!(strokes, 3);
        assert_eq!(canvas.glyphs().len(), 1);
    }
}
