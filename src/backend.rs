// Canvas implementation on top of plotters, and PNG output

use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, DrawingAreaErrorKind, IntoDrawingArea};
use plotters::element::{Circle, PathElement, Polygon, Rectangle as Square, Text};
use plotters::prelude::{BitMapBackend, DrawingBackend};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontTransform, IntoFont, RGBAColor, ShapeStyle};

use crate::canvas::{Canvas, GlyphStyle, HAlign, LineStyle, Point, Rect, TextStyle, VAlign};
use crate::palette::{Shape, WHITE};

/// Adapts a plotters drawing area. Canvas coordinates have y pointing up,
/// plotters has it pointing down.
///
/// Drawing errors of the backend do not abort the plot; they are collected
/// and handed out by [`PlottersCanvas::finish`].
pub struct PlottersCanvas<DB: DrawingBackend> {
    area: DrawingArea<DB, Shift>,
    width: f64,
    height: f64,
    clip: Option<Rect>,
    errors: Vec<String>,
}

impl<DB: DrawingBackend> PlottersCanvas<DB> {
    pub fn new(area: DrawingArea<DB, Shift>) -> Self {
        let (w, h) = area.dim_in_pixel();
        PlottersCanvas {
            area,
            width: w as f64,
            height: h as f64,
            clip: None,
            errors: Vec::new(),
        }
    }

    /// Presents the drawing and returns the errors collected on the way.
    pub fn finish(self) -> Result<Vec<String>> {
        self.area
            .present()
            .map_err(|e| anyhow!("{}", e))
            .context("Failed to present drawing")?;
        Ok(self.errors)
    }

    fn pixel(&self, p: Point) -> (i32, i32) {
        (p.x.round() as i32, (self.height - p.y).round() as i32)
    }

    fn record(&mut self, result: Result<(), DrawingAreaErrorKind<DB::ErrorType>>) {
        if let Err(e) = result {
            self.errors.push(e.to_string());
        }
    }

    fn visible(&self, p: Point) -> bool {
        self.clip.map_or(true, |c| c.contains(p))
    }

    fn font(&self, style: &TextStyle) -> plotters::style::TextStyle<'static> {
        let mut font = ("sans-serif", style.size).into_font();
        if style.vertical {
            font = font.transform(FontTransform::Rotate270);
        }
        let h = match style.h_align {
            HAlign::Left => HPos::Left,
            HAlign::Center => HPos::Center,
            HAlign::Right => HPos::Right,
        };
        let v = match style.v_align {
            VAlign::Top => VPos::Top,
            VAlign::Middle => VPos::Center,
            VAlign::Bottom => VPos::Bottom,
        };
        font.color(&style.color).pos(Pos::new(h, v))
    }
}

impl<DB: DrawingBackend> Canvas for PlottersCanvas<DB> {
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn fill_path(&mut self, path: &[Point], color: RGBAColor) {
        let path = match self.clip {
            Some(c) => clip_polygon(path, c),
            None => path.to_vec(),
        };
        if path.len() < 3 {
            return;
        }
        let pixels: Vec<(i32, i32)> = path.iter().map(|&p| self.pixel(p)).collect();
        let style = ShapeStyle {
            color,
            filled: true,
            stroke_width: 0,
        };
        let result = self.area.draw(&Polygon::new(pixels, style));
        self.record(result);
    }

    fn stroke_path(&mut self, path: &[Point], style: &LineStyle) {
        if style.width <= 0.0 || path.len() < 2 {
            return;
        }
        let shape = ShapeStyle {
            color: style.color,
            filled: false,
            stroke_width: style.width.round().max(1.0) as u32,
        };
        let visible = self.clip.unwrap_or_else(|| self.bounds());
        for (offset, run) in clip_runs(path, visible) {
            for piece in dash_path(&run, &style.dashes, offset) {
                let pixels: Vec<(i32, i32)> = piece.iter().map(|&p| self.pixel(p)).collect();
                let result = self.area.draw(&PathElement::new(pixels, shape));
                self.record(result);
            }
        }
    }

    fn draw_glyph(&mut self, at: Point, style: &GlyphStyle) {
        if !self.visible(at) || style.radius <= 0.0 {
            return;
        }
        let (x, y) = self.pixel(at);
        let r = style.radius;
        let ri = r.round().max(1.0) as i32;
        let at_offset = |dx: f64, dy: f64| (x + dx.round() as i32, y + dy.round() as i32);
        let filled = ShapeStyle {
            color: style.color,
            filled: true,
            stroke_width: 1,
        };
        let outline = ShapeStyle {
            filled: false,
            ..filled
        };

        let result = match style.shape {
            Shape::Circle => self.area.draw(&Circle::new((x, y), ri, filled)),
            Shape::Ring => self.area.draw(&Circle::new((x, y), ri, outline)),
            Shape::Square => self
                .area
                .draw(&Square::new([(x - ri, y - ri), (x + ri, y + ri)], filled)),
            Shape::Triangle => {
                let pts = vec![
                    at_offset(0.0, -r),
                    at_offset(0.866 * r, 0.5 * r),
                    at_offset(-0.866 * r, 0.5 * r),
                ];
                self.area.draw(&Polygon::new(pts, filled))
            }
            Shape::Diamond => {
                let pts = vec![
                    at_offset(0.0, -r),
                    at_offset(r, 0.0),
                    at_offset(0.0, r),
                    at_offset(-r, 0.0),
                ];
                self.area.draw(&Polygon::new(pts, filled))
            }
            Shape::Cross => {
                let a = vec![at_offset(-r, -r), at_offset(r, r)];
                let b = vec![at_offset(-r, r), at_offset(r, -r)];
                self.area
                    .draw(&PathElement::new(a, outline))
                    .and_then(|_| self.area.draw(&PathElement::new(b, outline)))
            }
            Shape::Plus => {
                let a = vec![at_offset(-r, 0.0), at_offset(r, 0.0)];
                let b = vec![at_offset(0.0, -r), at_offset(0.0, r)];
                self.area
                    .draw(&PathElement::new(a, outline))
                    .and_then(|_| self.area.draw(&PathElement::new(b, outline)))
            }
            Shape::Star => {
                let pts = (0..10)
                    .map(|k| {
                        let angle = (k as f64 * 36.0 - 90.0).to_radians();
                        let radius = if k % 2 == 0 { r } else { 0.4 * r };
                        at_offset(radius * angle.cos(), radius * angle.sin())
                    })
                    .collect::<Vec<_>>();
                self.area.draw(&Polygon::new(pts, filled))
            }
        };
        self.record(result);
    }

    fn fill_text(&mut self, at: Point, text: &str, style: &TextStyle) {
        if text.is_empty() || !self.visible(at) {
            return;
        }
        let font = self.font(style);
        let result = self.area.draw(&Text::new(text.to_string(), self.pixel(at), font));
        self.record(result);
    }

    fn clip(&mut self, rect: Option<Rect>) {
        self.clip = rect;
    }

    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        let font = self.font(&TextStyle {
            vertical: false,
            ..*style
        });
        match self.area.estimate_text_size(text, &font) {
            Ok((w, _)) => w as f64,
            Err(_) => 0.55 * style.size * text.chars().count() as f64,
        }
    }
}

/// Output of [`render_png`].
#[derive(Debug)]
pub struct Rendered {
    pub png: Vec<u8>,
    /// Problems the backend ran into while drawing.
    pub errors: Vec<String>,
}

/// Renders an RGB image of the given size with draw and encodes it as PNG.
pub fn render_png(
    width: u32,
    height: u32,
    draw: impl FnOnce(&mut dyn Canvas) -> Result<()>,
) -> Result<Rendered> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| anyhow!("Image of {}x{} pixels is too large", width, height))?;
    let mut buffer = vec![0u8; len];

    let errors = {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;
        let mut canvas = PlottersCanvas::new(root);
        draw(&mut canvas)?;
        canvas.finish()?
    };

    let mut png = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(Rendered { png, errors })
}

// Liang-Barsky
fn clip_segment(a: Point, b: Point, r: Rect) -> Option<(Point, Point)> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, a.x - r.min.x),
        (dx, r.max.x - a.x),
        (-dy, a.y - r.min.y),
        (dy, r.max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    Some((
        Point::new(a.x + t0 * dx, a.y + t0 * dy),
        Point::new(a.x + t1 * dx, a.y + t1 * dy),
    ))
}

/// The parts of an open path inside r, each with the length of path
/// preceding it. Segments with a non-finite end are dropped.
pub(crate) fn clip_runs(path: &[Point], r: Rect) -> Vec<(f64, Vec<Point>)> {
    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut start = 0.0;
    let mut travelled = 0.0;
    for w in path.windows(2) {
        let (a, b) = (w[0], w[1]);
        let finite = a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite();
        let clipped = if finite { clip_segment(a, b, r) } else { None };
        match clipped {
            Some((p, q)) => {
                if current.last() != Some(&p) {
                    if current.len() > 1 {
                        runs.push((start, std::mem::take(&mut current)));
                    }
                    current.clear();
                    current.push(p);
                    start = travelled + (p.x - a.x).hypot(p.y - a.y);
                }
                current.push(q);
            }
            None => {
                if current.len() > 1 {
                    runs.push((start, std::mem::take(&mut current)));
                }
                current.clear();
            }
        }
        if finite {
            travelled += (b.x - a.x).hypot(b.y - a.y);
        }
    }
    if current.len() > 1 {
        runs.push((start, current));
    }
    runs
}

fn clip_half(
    poly: &[Point],
    inside: impl Fn(Point) -> bool,
    cross: impl Fn(Point, Point) -> Point,
) -> Vec<Point> {
    let mut out = Vec::with_capacity(poly.len() + 4);
    for (i, &b) in poly.iter().enumerate() {
        let a = poly[(i + poly.len() - 1) % poly.len()];
        match (inside(a), inside(b)) {
            (true, true) => out.push(b),
            (true, false) => out.push(cross(a, b)),
            (false, true) => {
                out.push(cross(a, b));
                out.push(b);
            }
            (false, false) => {}
        }
    }
    out
}

/// The part of a closed polygon inside r (Sutherland-Hodgman).
pub(crate) fn clip_polygon(path: &[Point], r: Rect) -> Vec<Point> {
    if path.is_empty() {
        return Vec::new();
    }
    let at_x = |x: f64| {
        move |a: Point, b: Point| {
            let t = (x - a.x) / (b.x - a.x);
            Point::new(x, a.y + t * (b.y - a.y))
        }
    };
    let at_y = |y: f64| {
        move |a: Point, b: Point| {
            let t = (y - a.y) / (b.y - a.y);
            Point::new(a.x + t * (b.x - a.x), y)
        }
    };

    let mut poly = clip_half(path, |p| p.x >= r.min.x, at_x(r.min.x));
    if !poly.is_empty() {
        poly = clip_half(&poly, |p| p.x <= r.max.x, at_x(r.max.x));
    }
    if !poly.is_empty() {
        poly = clip_half(&poly, |p| p.y >= r.min.y, at_y(r.min.y));
    }
    if !poly.is_empty() {
        poly = clip_half(&poly, |p| p.y <= r.max.y, at_y(r.max.y));
    }
    poly
}

/// Splits path into the "on" pieces of the dash pattern, starting offset
/// into the pattern. An empty pattern keeps the path whole.
pub(crate) fn dash_path(path: &[Point], pattern: &[f64], offset: f64) -> Vec<Vec<Point>> {
    let period: f64 = pattern.iter().sum();
    if pattern.is_empty() || period <= 0.0 || path.len() < 2 {
        return vec![path.to_vec()];
    }

    let mut on = true;
    let mut k = 0;
    let mut left = pattern[0];
    let mut skip = if offset.is_finite() { offset.rem_euclid(period) } else { 0.0 };
    while skip >= left {
        skip -= left;
        on = !on;
        k = (k + 1) % pattern.len();
        left = pattern[k];
    }
    left -= skip;

    let mut pieces = Vec::new();
    let mut current = vec![path[0]];
    for w in path.windows(2) {
        let (a, b) = (w[0], w[1]);
        let len = (b.x - a.x).hypot(b.y - a.y);
        let mut pos = 0.0;
        while len - pos > left {
            pos += left;
            let t = pos / len;
            let p = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
            if on {
                current.push(p);
                pieces.push(std::mem::take(&mut current));
            } else {
                current = vec![p];
            }
            on = !on;
            k = (k + 1) % pattern.len();
            left = pattern[k];
        }
        left -= len - pos;
        if on {
            current.push(b);
        }
    }
    if on && current.len() > 1 {
        pieces.push(current);
    }
    pieces
}
