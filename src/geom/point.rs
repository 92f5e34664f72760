use plotters::style::RGBAColor;

use crate::aes::{Aes, DataRanges};
use crate::canvas::{Canvas, GlyphStyle};
use crate::geom::{determine_color, Aesthetics, Geom};
use crate::palette::Shape;
use crate::panel::PanelView;

/// Points / symbols at the given coordinates.
///
/// Honors the Alpha, Color, Shape and Size aesthetics.
#[derive(Clone, Default)]
pub struct Point {
    pub xy: Vec<(f64, f64)>,
    pub aes: Aesthetics,
    pub default_color: Option<RGBAColor>,
    pub default_size: Option<f64>,
    pub default_shape: Option<Shape>,
}

impl Point {
    pub fn new(xy: Vec<(f64, f64)>) -> Self {
        Point {
            xy,
            ..Default::default()
        }
    }

    pub fn with_aes(mut self, aes: Aesthetics) -> Self {
        self.aes = aes;
        self
    }
}

impl Geom for Point {
    fn data_ranges(&self) -> DataRanges {
        let mut dr = DataRanges::new();
        for &(x, y) in &self.xy {
            dr[Aes::X].update_one(x);
            dr[Aes::Y].update_one(y);
        }
        self.aes
            .only(&[Aes::Alpha, Aes::Color, Aes::Shape, Aes::Size])
            .update_ranges(&mut dr, self.xy.len());
        dr
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        let base = self.default_color.unwrap_or(panel.style.geom.color);
        let mut radius = self.default_size.unwrap_or(panel.style.geom.point_size);
        let mut shape = self.default_shape.unwrap_or(Shape::Circle);

        for (i, &(x, y)) in self.xy.iter().enumerate() {
            // Points which cannot be positioned are dropped.
            let center = match panel.map_xy(x, y) {
                Some(c) => c,
                None => continue,
            };
            let color = match determine_color(
                base,
                panel,
                i,
                self.aes.color.as_ref(),
                Aes::Color,
                self.aes.alpha.as_ref(),
            ) {
                Some(c) => c,
                None => continue,
            };

            if let Some(f) = &self.aes.shape {
                shape = Shape::nth(f(i));
            }
            if let Some(f) = &self.aes.size {
                radius = panel.map_size(f(i));
                if radius == 0.0 {
                    continue;
                }
            }

            canvas.draw_glyph(
                center,
                &GlyphStyle {
                    color,
                    radius,
                    shape,
                },
            );
        }
    }
}
