use plotters::style::RGBAColor;

use crate::aes::{Aes, DataRanges};
use crate::canvas::{Canvas, LineStyle, Rect};
use crate::geom::{determine_color, Aesthetics, Geom, XYUV};
use crate::palette::dashes;
use crate::panel::PanelView;

/// Rectangles with corners (x, y) and (u, v).
///
/// The border is drawn inside the rectangle. Fill maps the interior, Color
/// the border, Size the border width and Stroke its dashes.
#[derive(Clone, Default)]
pub struct Rectangle {
    pub xyuv: Vec<XYUV>,
    pub aes: Aesthetics,
    pub default_fill: Option<RGBAColor>,
    /// No border unless set or the Size aesthetic is mapped.
    pub border: Option<LineStyle>,
}

impl Rectangle {
    pub fn new(xyuv: Vec<XYUV>) -> Self {
        Rectangle {
            xyuv,
            ..Default::default()
        }
    }

    pub fn with_aes(mut self, aes: Aesthetics) -> Self {
        self.aes = aes;
        self
    }
}

fn intersect(a: Rect, b: Rect) -> Option<Rect> {
    let min_x = a.min.x.max(b.min.x);
    let min_y = a.min.y.max(b.min.y);
    let max_x = a.max.x.min(b.max.x);
    let max_y = a.max.y.min(b.max.y);
    if min_x > max_x || min_y > max_y {
        return None;
    }
    Some(Rect::new(min_x, min_y, max_x, max_y))
}

impl Geom for Rectangle {
    fn data_ranges(&self) -> DataRanges {
        let mut dr = DataRanges::new();
        for r in &self.xyuv {
            dr[Aes::X].update(&[r.x, r.u]);
            dr[Aes::Y].update(&[r.y, r.v]);
        }
        self.aes
            .only(&[Aes::Alpha, Aes::Color, Aes::Fill, Aes::Size, Aes::Stroke])
            .update_ranges(&mut dr, self.xyuv.len());
        dr
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        let fill = self.default_fill.unwrap_or(panel.style.geom.fill);
        let border = self
            .border
            .clone()
            .unwrap_or_else(|| LineStyle::solid(panel.style.geom.color, 0.0));

        for (i, r) in self.xyuv.iter().enumerate() {
            let (min, max) = match (panel.map_xy(r.x, r.y), panel.map_xy(r.u, r.v)) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };
            let rect = match intersect(Rect::new(min.x, min.y, max.x, max.y), panel.rect) {
                Some(rect) => rect,
                None => continue,
            };

            if let Some(col) = determine_color(
                fill,
                panel,
                i,
                self.aes.fill.as_ref(),
                Aes::Fill,
                self.aes.alpha.as_ref(),
            ) {
                canvas.fill_rect(rect, col);
            }

            let mut style = border.clone();
            if let Some(f) = &self.aes.size {
                style.width = panel.map_size(f(i));
            }
            if style.width <= 0.0 {
                continue;
            }
            if let Some(f) = &self.aes.stroke {
                style.dashes = dashes(f(i));
            }
            style.color = match determine_color(
                style.color,
                panel,
                i,
                self.aes.color.as_ref(),
                Aes::Color,
                self.aes.alpha.as_ref(),
            ) {
                Some(c) => c,
                None => continue,
            };
            let w = 0.499 * style.width;
            let inner = Rect::new(rect.min.x + w, rect.min.y + w, rect.max.x - w, rect.max.y - w);
            canvas.stroke_rect(inner, &style);
        }
    }
}
