use plotters::style::RGBAColor;

use crate::aes::{Aes, DataRanges};
use crate::canvas::{Canvas, LineStyle};
use crate::geom::{determine_color, Aesthetics, Geom, XYUV};
use crate::palette::dashes;
use crate::panel::PanelView;

const LINE_AES: [Aes; 4] = [Aes::Alpha, Aes::Color, Aes::Size, Aes::Stroke];

/// Line style of segment i, `None` if the segment is not drawn.
fn segment_style(
    aes: &Aesthetics,
    base: &LineStyle,
    panel: &PanelView<'_>,
    i: usize,
) -> Option<LineStyle> {
    let color = determine_color(
        base.color,
        panel,
        i,
        aes.color.as_ref(),
        Aes::Color,
        aes.alpha.as_ref(),
    )?;
    let mut style = LineStyle {
        color,
        ..base.clone()
    };
    if let Some(f) = &aes.stroke {
        style.dashes = dashes(f(i));
    }
    if let Some(f) = &aes.size {
        style.width = panel.map_size(f(i));
    }
    Some(style)
}

fn base_style(panel: &PanelView<'_>, color: Option<RGBAColor>, width: Option<f64>) -> LineStyle {
    LineStyle::solid(
        color.unwrap_or(panel.style.geom.color),
        width.unwrap_or(panel.style.geom.line_width),
    )
}

/// Connects the points in data order. Aesthetics of a segment are those
/// of its first point.
#[derive(Clone, Default)]
pub struct Path {
    pub xy: Vec<(f64, f64)>,
    pub aes: Aesthetics,
    pub default_color: Option<RGBAColor>,
    pub default_width: Option<f64>,
}

impl Path {
    pub fn new(xy: Vec<(f64, f64)>) -> Self {
        Path {
            xy,
            ..Default::default()
        }
    }

    pub fn with_aes(mut self, aes: Aesthetics) -> Self {
        self.aes = aes;
        self
    }
}

impl Geom for Path {
    fn data_ranges(&self) -> DataRanges {
        let mut dr = DataRanges::new();
        for &(x, y) in &self.xy {
            dr[Aes::X].update_one(x);
            dr[Aes::Y].update_one(y);
        }
        self.aes.only(&LINE_AES).update_ranges(&mut dr, self.xy.len());
        dr
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        let base = base_style(panel, self.default_color, self.default_width);
        for (i, w) in self.xy.windows(2).enumerate() {
            let (left, right) = match (panel.map_xy(w[0].0, w[0].1), panel.map_xy(w[1].0, w[1].1)) {
                (Some(l), Some(r)) => (l, r),
                _ => continue,
            };
            if let Some(style) = segment_style(&self.aes, &base, panel, i) {
                canvas.stroke_path(&[left, right], &style);
            }
        }
    }
}

/// Connects the points in order of their x values.
///
/// The aesthetics are looked up with the original data index.
#[derive(Clone, Default)]
pub struct Line {
    pub xy: Vec<(f64, f64)>,
    pub aes: Aesthetics,
    pub default_color: Option<RGBAColor>,
    pub default_width: Option<f64>,
}

impl Line {
    pub fn new(xy: Vec<(f64, f64)>) -> Self {
        Line {
            xy,
            ..Default::default()
        }
    }

    pub fn with_aes(mut self, aes: Aesthetics) -> Self {
        self.aes = aes;
        self
    }

    fn to_path(&self) -> Path {
        let mut order: Vec<usize> = (0..self.xy.len()).collect();
        order.sort_by(|&a, &b| self.xy[a].0.total_cmp(&self.xy[b].0));
        let xy = order.iter().map(|&i| self.xy[i]).collect();
        Path {
            xy,
            aes: self.aes.remapped(move |i| order[i]),
            default_color: self.default_color,
            default_width: self.default_width,
        }
    }
}

impl Geom for Line {
    fn data_ranges(&self) -> DataRanges {
        // Sorting does not change the ranges.
        Path {
            xy: self.xy.clone(),
            aes: self.aes.clone(),
            ..Default::default()
        }
        .data_ranges()
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        self.to_path().draw(panel, canvas);
    }
}

/// Stair steps through the points, sorted by x.
#[derive(Clone, Default)]
pub struct Step {
    pub xy: Vec<(f64, f64)>,
    pub aes: Aesthetics,
    /// Vertical first, then horizontal.
    pub vertical: bool,
    pub default_color: Option<RGBAColor>,
    pub default_width: Option<f64>,
}

impl Step {
    pub fn new(xy: Vec<(f64, f64)>) -> Self {
        Step {
            xy,
            ..Default::default()
        }
    }

    fn to_path(&self) -> Path {
        let mut sorted = self.xy.clone();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut xy = Vec::with_capacity(2 * sorted.len());
        for (i, &p) in sorted.iter().enumerate() {
            if i > 0 {
                let prev = sorted[i - 1];
                xy.push(if self.vertical { (prev.0, p.1) } else { (p.0, prev.1) });
            }
            xy.push(p);
        }
        Path {
            xy,
            aes: self.aes.clone(),
            default_color: self.default_color,
            default_width: self.default_width,
        }
    }
}

impl Geom for Step {
    fn data_ranges(&self) -> DataRanges {
        // The added corners lie within the span of the data.
        Path {
            xy: self.xy.clone(),
            aes: self.aes.clone(),
            ..Default::default()
        }
        .data_ranges()
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        self.to_path().draw(panel, canvas);
    }
}

/// Straight lines from (x, y) to (u, v).
#[derive(Clone, Default)]
pub struct Segment {
    pub xyuv: Vec<XYUV>,
    pub aes: Aesthetics,
    pub default_color: Option<RGBAColor>,
    pub default_width: Option<f64>,
}

impl Segment {
    pub fn new(xyuv: Vec<XYUV>) -> Self {
        Segment {
            xyuv,
            ..Default::default()
        }
    }

    pub fn with_aes(mut self, aes: Aesthetics) -> Self {
        self.aes = aes;
        self
    }
}

impl Geom for Segment {
    fn data_ranges(&self) -> DataRanges {
        let mut dr = DataRanges::new();
        for s in &self.xyuv {
            dr[Aes::X].update(&[s.x, s.u]);
            dr[Aes::Y].update(&[s.y, s.v]);
        }
        self.aes.only(&LINE_AES).update_ranges(&mut dr, self.xyuv.len());
        dr
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        let base = base_style(panel, self.default_color, self.default_width);
        for (i, s) in self.xyuv.iter().enumerate() {
            let (from, to) = match (panel.map_xy(s.x, s.y), panel.map_xy(s.u, s.v)) {
                (Some(f), Some(t)) => (f, t),
                _ => continue,
            };
            if let Some(style) = segment_style(&self.aes, &base, panel, i) {
                canvas.stroke_path(&[from, to], &style);
            }
        }
    }
}

/// Horizontal reference lines at the given y values, spanning the panel.
#[derive(Clone, Default)]
pub struct HLine {
    pub y: Vec<f64>,
    pub aes: Aesthetics,
    pub default_color: Option<RGBAColor>,
    pub default_width: Option<f64>,
}

impl HLine {
    pub fn new(y: Vec<f64>) -> Self {
        HLine {
            y,
            ..Default::default()
        }
    }
}

impl Geom for HLine {
    fn data_ranges(&self) -> DataRanges {
        let mut dr = DataRanges::new();
        dr[Aes::Y].update(&self.y);
        self.aes.only(&LINE_AES).update_ranges(&mut dr, self.y.len());
        dr
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        let x = panel.x_limit();
        let segment = Segment {
            xyuv: self.y.iter().map(|&y| XYUV::new(x.min, y, x.max, y)).collect(),
            aes: self.aes.clone(),
            default_color: self.default_color,
            default_width: self.default_width,
        };
        segment.draw(panel, canvas);
    }
}

/// Vertical reference lines at the given x values, spanning the panel.
#[derive(Clone, Default)]
pub struct VLine {
    pub x: Vec<f64>,
    pub aes: Aesthetics,
    pub default_color: Option<RGBAColor>,
    pub default_width: Option<f64>,
}

impl VLine {
    pub fn new(x: Vec<f64>) -> Self {
        VLine {
            x,
            ..Default::default()
        }
    }
}

impl Geom for VLine {
    fn data_ranges(&self) -> DataRanges {
        let mut dr = DataRanges::new();
        dr[Aes::X].update(&self.x);
        self.aes.only(&LINE_AES).update_ranges(&mut dr, self.x.len());
        dr
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        let y = panel.y_limit();
        let segment = Segment {
            xyuv: self.x.iter().map(|&x| XYUV::new(x, y.min, x, y.max)).collect(),
            aes: self.aes.clone(),
            default_color: self.default_color,
            default_width: self.default_width,
        };
        segment.draw(panel, canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, Point, RecordingCanvas};
    use crate::geom::testing::Fixture;
    use crate::interval::Interval;

    fn strokes(canvas: &RecordingCanvas) -> Vec<(Vec<Point>, LineStyle)> {
        canvas
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokePath { path, style } => Some((path.clone(), style.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_path_keeps_data_order() {
        let path = Path::new(vec![(0.0, 0.0), (10.0, 10.0), (5.0, 0.0)]);
        let fixture = Fixture::new(&path.data_ranges());
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        path.draw(&fixture.view(), &mut canvas);

        let s = strokes(&canvas);
        assert_eq!(s.len(), 2);
        assert_eq!(s[1].0, vec![Point::new(100.0, 100.0), Point::new(50.0, 0.0)]);
    }

    #[test]
    fn test_line_sorts_by_x() {
        let line = Line::new(vec![(10.0, 10.0), (0.0, 0.0), (5.0, 0.0)])
            .with_aes(Aesthetics::new().stroke(|i| i as i64));
        let fixture = Fixture::new(&line.data_ranges());
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        line.draw(&fixture.view(), &mut canvas);

        let s = strokes(&canvas);
        assert_eq!(s[0].0[0], Point::new(0.0, 0.0));
        assert_eq!(s[1].0[1], Point::new(100.0, 100.0));
        // The first segment starts at data point 1.
        assert_eq!(s[0].1.dashes, dashes(1));
    }

    #[test]
    fn test_step_corners() {
        let step = Step::new(vec![(0.0, 0.0), (10.0, 10.0)]);
        assert_eq!(step.to_path().xy, vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);

        let step = Step {
            vertical: true,
            ..step
        };
        assert_eq!(step.to_path().xy, vec![(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
    }

    #[test]
    fn test_segment_ranges_and_size() {
        let seg = Segment::new(vec![XYUV::new(1.0, 2.0, 3.0, -4.0)])
            .with_aes(Aesthetics::new().size(|_| 7.0));
        let dr = seg.data_ranges();
        assert_eq!(dr[Aes::X], Interval::new(1.0, 3.0));
        assert_eq!(dr[Aes::Y], Interval::new(-4.0, 2.0));
        assert_eq!(dr[Aes::Size], Interval::pinned(7.0));
    }

    #[test]
    fn test_hline_spans_limit() {
        let h = HLine::new(vec![5.0]);
        let dr = h.data_ranges();
        assert!(!dr[Aes::X].is_set());
        assert_eq!(dr[Aes::Y], Interval::pinned(5.0));

        let fixture = Fixture::new(&dr);
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        h.draw(&fixture.view(), &mut canvas);
        let s = strokes(&canvas);
        assert_eq!(s[0].0, vec![Point::new(0.0, 50.0), Point::new(100.0, 50.0)]);
    }

    #[test]
    fn test_vline_spans_limit() {
        let v = VLine::new(vec![2.0]);
        let fixture = Fixture::new(&v.data_ranges());
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        v.draw(&fixture.view(), &mut canvas);
        let s = strokes(&canvas);
        assert_eq!(s[0].0, vec![Point::new(20.0, 0.0), Point::new(20.0, 100.0)]);
    }
}
