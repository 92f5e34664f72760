// Layout and drawing of a prepared plot

use anyhow::{ensure, Result};

use crate::canvas::{Canvas, LineStyle, Point, Rect};
use crate::diagnostics::{Diagnostics, Verbosity};
use crate::guide;
use crate::plot::Plot;
use crate::style::{StripStyle, TickStyle};

/// Where everything goes on the canvas.
#[derive(Debug, Clone)]
pub struct Layout {
    pub outer: Rect,
    pub title_at: Option<Point>,
    pub guides: Option<Rect>,
    pub x_title_at: Option<Point>,
    pub y_title_at: Option<Point>,
    /// Indexed by row, then column.
    pub panels: Vec<Vec<Rect>>,
    /// Strip above each panel holding its title.
    pub title_strips: Vec<Vec<Rect>>,
    /// Above the top row, empty without column labels.
    pub col_strips: Vec<Rect>,
    /// Right of the last column, empty without row labels.
    pub row_strips: Vec<Rect>,
}

fn any_set(labels: &[String]) -> bool {
    labels.iter().any(|l| !l.is_empty())
}

impl Plot {
    /// Prepares and draws the plot.
    pub fn render(&mut self, canvas: &mut dyn Canvas, diag: &mut dyn Diagnostics) -> Result<()> {
        self.prepare(diag)?;
        self.draw(canvas, diag)
    }

    /// Draws the plot onto canvas. [`Plot::prepare`] must have run before.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, diag: &mut dyn Diagnostics) -> Result<()> {
        let prepared = self
            .x_scales
            .iter()
            .chain(&self.y_scales)
            .all(|&id| self.scales[id].range().is_set());
        ensure!(prepared, "the plot must be prepared before it can be drawn");

        let layout = self.layout(&*canvas);
        for (row, rects) in layout.panels.iter().enumerate() {
            for (col, rect) in rects.iter().enumerate() {
                self.panels[row][col].rect = Some(*rect);
            }
        }
        diag.debug(
            Verbosity::Info,
            &format!("drawing {}x{} panels", self.rows, self.cols),
        );
        self.paint(canvas, &layout, diag);
        Ok(())
    }

    fn y_tick_width(&self, canvas: &dyn Canvas) -> f64 {
        let tick = &self.style.y_axis.major_tick;
        let widest = (0..self.rows)
            .flat_map(|row| self.y_scale(row).ticks())
            .filter(|t| !t.minor)
            .map(|t| canvas.text_width(&t.label, &tick.label))
            .fold(0.0, f64::max);
        widest + tick.length + 4.0
    }

    /// Splits the canvas into title, guides, axis areas, strips and panels.
    pub fn layout(&self, canvas: &dyn Canvas) -> Layout {
        let s = &self.style;
        let outer = canvas.bounds();
        let mut top = outer.max.y;

        let title_at = if self.title.is_empty() {
            None
        } else {
            let at = Point::new(
                outer.min.x + outer.width() / 2.0,
                top - (s.title_height - s.title.size) / 2.0,
            );
            top -= s.title_height;
            Some(at)
        };

        let mut right = outer.max.x - s.panel.pad_x;
        let gw = guide::guides_width(self, canvas);
        let guides = if gw > 0.0 {
            right = outer.max.x - gw;
            Some(Rect::new(right, outer.min.y, outer.max.x, top))
        } else {
            None
        };

        let x_title = !self.x_scale(0).title.is_empty();
        let y_title = !self.y_scale(0).title.is_empty();
        let w1 = if y_title { s.y_axis.title_size } else { 0.0 };
        let w2 = self.y_tick_width(canvas);
        let w4 = if any_set(&self.row_labels) { s.v_strip.size } else { 0.0 };
        let h1 = if x_title { s.x_axis.title_size } else { 0.0 };
        let h2 = s.x_axis.major_tick.length + 1.5 * s.x_axis.major_tick.label.size;
        let h4 = if any_set(&self.col_labels) { s.h_strip.size } else { 0.0 };
        let strip = if self.panels.iter().flatten().any(|p| !p.title.is_empty()) {
            s.h_strip.size
        } else {
            0.0
        };

        let left = outer.min.x + w1 + w2;
        let bottom = outer.min.y + h1 + h2;
        let w3 = right - w4 - left;
        let h3 = top - h4 - bottom;
        let (rows, cols) = (self.rows as f64, self.cols as f64);
        let pw = (w3 - s.panel.pad_x * (cols - 1.0)) / cols;
        let cell = (h3 - s.panel.pad_y * (rows - 1.0)) / rows;

        let mut panels = Vec::with_capacity(self.rows);
        let mut title_strips = Vec::with_capacity(self.rows);
        let mut row_strips = Vec::new();
        for row in 0..self.rows {
            let y1 = top - h4 - row as f64 * (cell + s.panel.pad_y);
            let y0 = y1 - cell;
            let mut rects = Vec::with_capacity(self.cols);
            let mut strips = Vec::with_capacity(self.cols);
            for col in 0..self.cols {
                let x0 = left + col as f64 * (pw + s.panel.pad_x);
                rects.push(Rect::new(x0, y0, x0 + pw, y1 - strip));
                strips.push(Rect::new(x0, y1 - strip, x0 + pw, y1));
            }
            if w4 > 0.0 {
                row_strips.push(Rect::new(right - w4, y0, right, y1 - strip));
            }
            panels.push(rects);
            title_strips.push(strips);
        }

        let col_strips = if h4 > 0.0 {
            (0..self.cols)
                .map(|col| {
                    let x0 = left + col as f64 * (pw + s.panel.pad_x);
                    Rect::new(x0, top - h4, x0 + pw, top)
                })
                .collect()
        } else {
            Vec::new()
        };

        Layout {
            outer,
            title_at,
            guides,
            x_title_at: x_title.then(|| Point::new(left + w3 / 2.0, outer.min.y + h1 / 2.0)),
            y_title_at: y_title.then(|| Point::new(outer.min.x + w1 / 2.0, bottom + h3 / 2.0)),
            panels,
            title_strips: if strip > 0.0 { title_strips } else { Vec::new() },
            col_strips,
            row_strips,
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas, layout: &Layout, diag: &mut dyn Diagnostics) {
        let s = &self.style;
        canvas.fill_rect(layout.outer, s.background);

        if let Some(at) = layout.title_at {
            canvas.fill_text(at, &self.title, &s.title);
        }
        if let Some(area) = layout.guides {
            guide::draw_guides(self, canvas, area, diag);
        }
        if let Some(at) = layout.x_title_at {
            canvas.fill_text(at, &self.x_scale(0).title, &s.x_axis.title);
        }
        if let Some(at) = layout.y_title_at {
            canvas.fill_text(at, &self.y_scale(0).title, &s.y_axis.title);
        }

        for (rect, label) in layout.col_strips.iter().zip(&self.col_labels) {
            draw_strip(canvas, *rect, label, &s.h_strip);
        }
        for (rect, label) in layout.row_strips.iter().zip(&self.row_labels) {
            draw_strip(canvas, *rect, label, &s.v_strip);
        }
        for (row, strips) in layout.title_strips.iter().enumerate() {
            for (col, rect) in strips.iter().enumerate() {
                draw_strip(canvas, *rect, &self.panels[row][col].title, &s.h_strip);
            }
        }

        for (row, rects) in layout.panels.iter().enumerate() {
            for (col, &rect) in rects.iter().enumerate() {
                canvas.fill_rect(rect, s.panel.background);
                self.draw_grid(canvas, row, col, rect);
            }
        }

        for (row, rects) in layout.panels.iter().enumerate() {
            for (col, &rect) in rects.iter().enumerate() {
                let panel = &self.panels[row][col];
                diag.debug(
                    Verbosity::Trace,
                    &format!("panel ({row}, {col}): {} geoms in {:?}", panel.geoms.len(), rect),
                );
                let view = self.view(row, col, rect);
                canvas.clip(Some(rect));
                for geom in &panel.geoms {
                    geom.draw(&view, canvas);
                }
                canvas.clip(None);
            }
        }

        self.draw_ticks(canvas, layout);
    }

    fn draw_grid(&self, canvas: &mut dyn Canvas, row: usize, col: usize, rect: Rect) {
        let view = self.view(row, col, rect);
        let major = &self.style.grid;
        let minor = LineStyle {
            width: major.width / 2.0,
            ..major.clone()
        };

        for tick in self.x_scale(col).ticks() {
            let Some(x) = view.map_x(tick.value) else {
                continue;
            };
            if x < rect.min.x || x > rect.max.x {
                continue;
            }
            let style = if tick.minor { &minor } else { major };
            canvas.stroke_path(&[Point::new(x, rect.min.y), Point::new(x, rect.max.y)], style);
        }
        for tick in self.y_scale(row).ticks() {
            let Some(y) = view.map_y(tick.value) else {
                continue;
            };
            if y < rect.min.y || y > rect.max.y {
                continue;
            }
            let style = if tick.minor { &minor } else { major };
            canvas.stroke_path(&[Point::new(rect.min.x, y), Point::new(rect.max.x, y)], style);
        }
    }

    // X ticks under the bottom row, Y ticks left of the first column.
    fn draw_ticks(&self, canvas: &mut dyn Canvas, layout: &Layout) {
        let last = self.rows - 1;
        let x_tick = &self.style.x_axis.major_tick;
        for (col, &rect) in layout.panels[last].iter().enumerate() {
            let view = self.view(last, col, rect);
            for tick in self.x_scale(col).ticks() {
                let Some(x) = view.map_x(tick.value) else {
                    continue;
                };
                if x < rect.min.x - 0.5 || x > rect.max.x + 0.5 {
                    continue;
                }
                let len = tick_length(x_tick, tick.minor);
                canvas.stroke_path(
                    &[Point::new(x, rect.min.y), Point::new(x, rect.min.y - len)],
                    &x_tick.line,
                );
                if !tick.minor {
                    canvas.fill_text(
                        Point::new(x, rect.min.y - len - 1.0),
                        &tick.label,
                        &x_tick.label,
                    );
                }
            }
        }

        let y_tick = &self.style.y_axis.major_tick;
        for (row, rects) in layout.panels.iter().enumerate() {
            let rect = rects[0];
            let view = self.view(row, 0, rect);
            for tick in self.y_scale(row).ticks() {
                let Some(y) = view.map_y(tick.value) else {
                    continue;
                };
                if y < rect.min.y - 0.5 || y > rect.max.y + 0.5 {
                    continue;
                }
                let len = tick_length(y_tick, tick.minor);
                canvas.stroke_path(
                    &[Point::new(rect.min.x - len, y), Point::new(rect.min.x, y)],
                    &y_tick.line,
                );
                if !tick.minor {
                    canvas.fill_text(
                        Point::new(rect.min.x - len - 1.0, y),
                        &tick.label,
                        &y_tick.label,
                    );
                }
            }
        }
    }
}

fn tick_length(style: &TickStyle, minor: bool) -> f64 {
    if minor {
        style.length / 2.0
    } else {
        style.length
    }
}

fn draw_strip(canvas: &mut dyn Canvas, rect: Rect, label: &str, style: &StripStyle) {
    if label.is_empty() {
        return;
    }
    canvas.fill_rect(rect, style.background);
    let center = Point::new(rect.min.x + rect.width() / 2.0, rect.min.y + rect.height() / 2.0);
    canvas.fill_text(center, label, &style.text);
}
