// Drawing surface abstraction used by panels, geoms and guides

use plotters::style::RGBAColor;

use crate::interval::Interval;
use crate::palette::{Shape, BLACK};

/// A point on the canvas. The y axis points up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Axis aligned rectangle, `min` is the lower left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn x_interval(&self) -> Interval {
        Interval::new(self.min.x, self.max.x)
    }

    pub fn y_interval(&self) -> Interval {
        Interval::new(self.min.y, self.max.y)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Closed polygon of the four corners, counter clockwise.
    pub fn path(&self) -> Vec<Point> {
        vec![
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
            self.min,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: RGBAColor,
    pub width: f64,
    /// On/off lengths; empty draws a solid line.
    pub dashes: Vec<f64>,
}

impl LineStyle {
    pub fn solid(color: RGBAColor, width: f64) -> Self {
        LineStyle {
            color,
            width,
            dashes: Vec::new(),
        }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle::solid(BLACK, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    pub color: RGBAColor,
    pub radius: f64,
    pub shape: Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: RGBAColor,
    pub size: f64,
    pub h_align: HAlign,
    pub v_align: VAlign,
    /// Rotated 90 degrees counter clockwise, reading bottom to top.
    pub vertical: bool,
}

impl TextStyle {
    pub fn new(color: RGBAColor, size: f64) -> Self {
        TextStyle {
            color,
            size,
            h_align: HAlign::Center,
            v_align: VAlign::Middle,
            vertical: false,
        }
    }

    pub fn aligned(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn rotated(mut self) -> Self {
        self.vertical = true;
        self
    }
}

/// The primitive operations a plot is drawn with.
pub trait Canvas {
    /// The full drawing area.
    fn bounds(&self) -> Rect;

    fn fill_path(&mut self, path: &[Point], color: RGBAColor);

    fn stroke_path(&mut self, path: &[Point], style: &LineStyle);

    fn draw_glyph(&mut self, at: Point, style: &GlyphStyle);

    fn fill_text(&mut self, at: Point, text: &str, style: &TextStyle);

    /// Restricts all following drawing to rect, `None` lifts the restriction.
    fn clip(&mut self, rect: Option<Rect>);

    /// Approximate width of a rendered text.
    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        0.55 * style.size * text.chars().count() as f64
    }

    fn fill_rect(&mut self, rect: Rect, color: RGBAColor) {
        self.fill_path(&rect.path(), color);
    }

    fn stroke_rect(&mut self, rect: Rect, style: &LineStyle) {
        self.stroke_path(&rect.path(), style);
    }
}

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillPath {
        path: Vec<Point>,
        color: RGBAColor,
    },
    StrokePath {
        path: Vec<Point>,
        style: LineStyle,
    },
    Glyph {
        at: Point,
        style: GlyphStyle,
    },
    Text {
        at: Point,
        text: String,
        style: TextStyle,
    },
    Clip(Option<Rect>),
}

/// Canvas which only records what is drawn.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        RecordingCanvas {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// All texts, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn glyphs(&self) -> Vec<(Point, GlyphStyle)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Glyph { at, style } => Some((*at, *style)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn fill_path(&mut self, path: &[Point], color: RGBAColor) {
        self.commands.push(DrawCommand::FillPath {
            path: path.to_vec(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &[Point], style: &LineStyle) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.to_vec(),
            style: style.clone(),
        });
    }

    fn draw_glyph(&mut self, at: Point, style: &GlyphStyle) {
        self.commands.push(DrawCommand::Glyph { at, style: *style });
    }

    fn fill_text(&mut self, at: Point, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            style: *style,
        });
    }

    fn clip(&mut self, rect: Option<Rect>) {
        self.commands.push(DrawCommand::Clip(rect));
    }
}
