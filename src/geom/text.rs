use plotters::style::RGBAColor;

use crate::aes::{Aes, DataRanges};
use crate::canvas::{Canvas, TextStyle};
use crate::geom::{determine_color, Aesthetics, Geom};
use crate::panel::PanelView;

/// Text labels centered at the given coordinates.
///
/// Honors Alpha, Color and Size; a mapped size is half the font size.
#[derive(Clone, Default)]
pub struct Text {
    pub items: Vec<(f64, f64, String)>,
    pub aes: Aesthetics,
    pub default_color: Option<RGBAColor>,
    pub default_size: Option<f64>,
}

impl Text {
    pub fn new(items: Vec<(f64, f64, String)>) -> Self {
        Text {
            items,
            ..Default::default()
        }
    }

    pub fn with_aes(mut self, aes: Aesthetics) -> Self {
        self.aes = aes;
        self
    }
}

impl Geom for Text {
    fn data_ranges(&self) -> DataRanges {
        let mut dr = DataRanges::new();
        for (x, y, _) in &self.items {
            dr[Aes::X].update_one(*x);
            dr[Aes::Y].update_one(*y);
        }
        self.aes
            .only(&[Aes::Alpha, Aes::Color, Aes::Size])
            .update_ranges(&mut dr, self.items.len());
        dr
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        let base = self.default_color.unwrap_or(panel.style.geom.color);
        let mut size = self.default_size.unwrap_or(panel.style.x_axis.title.size);

        for (i, (x, y, text)) in self.items.iter().enumerate() {
            let Some(at) = panel.map_xy(*x, *y) else {
                continue;
            };
            let Some(color) = determine_color(
                base,
                panel,
                i,
                self.aes.color.as_ref(),
                Aes::Color,
                self.aes.alpha.as_ref(),
            ) else {
                continue;
            };
            if let Some(f) = &self.aes.size {
                size = 2.0 * panel.map_size(f(i));
                if size == 0.0 {
                    continue;
                }
            }
            canvas.fill_text(at, text, &TextStyle::new(color, size));
        }
    }
}
