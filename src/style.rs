// Plot theme; the defaults mimic the appearance of ggplot2

use plotters::style::RGBAColor;

use crate::canvas::{HAlign, LineStyle, TextStyle, VAlign};
use crate::palette::{BLACK, WHITE};
use crate::scale::Expand;

const fn gray(v: u8) -> RGBAColor {
    RGBAColor(v, v, v, 1.0)
}

#[derive(Debug, Clone)]
pub struct PanelStyle {
    pub background: RGBAColor,
    pub pad_x: f64,
    pub pad_y: f64,
}

#[derive(Debug, Clone)]
pub struct StripStyle {
    pub background: RGBAColor,
    /// Height of horizontal strips, width of vertical ones.
    pub size: f64,
    pub text: TextStyle,
}

#[derive(Debug, Clone)]
pub struct TickStyle {
    pub line: LineStyle,
    pub length: f64,
    pub label: TextStyle,
}

#[derive(Debug, Clone)]
pub struct AxisStyle {
    pub title: TextStyle,
    /// Space reserved for the title.
    pub title_size: f64,
    pub major_tick: TickStyle,
    pub expand: Expand,
}

#[derive(Debug, Clone)]
pub struct LegendStyle {
    pub title: TextStyle,
    pub label: TextStyle,
    /// Edge length of one swatch of a discrete guide.
    pub discrete_size: f64,
    pub discrete_pad: f64,
    /// Width of the bar of a continuous guide.
    pub continuous_size: f64,
    pub continuous_length: f64,
    pub continuous_tick: LineStyle,
    pub continuous_tick_length: f64,
    /// Draw ticks on both sides of the bar.
    pub continuous_tick_mirror: bool,
}

/// Fallbacks for geoms whose aesthetics are not mapped.
#[derive(Debug, Clone)]
pub struct GeomStyle {
    pub color: RGBAColor,
    pub fill: RGBAColor,
    pub point_size: f64,
    pub line_width: f64,
}

/// Everything which controls how a plot looks.
#[derive(Debug, Clone)]
pub struct Style {
    pub background: RGBAColor,
    pub title: TextStyle,
    pub title_height: f64,
    pub panel: PanelStyle,
    /// Strips above the panels, showing column labels.
    pub h_strip: StripStyle,
    /// Strips right of the panels, showing row labels.
    pub v_strip: StripStyle,
    pub grid: LineStyle,
    pub x_axis: AxisStyle,
    pub y_axis: AxisStyle,
    pub legend: LegendStyle,
    pub geom: GeomStyle,
}

impl Style {
    /// The base size is used for axis titles and strip labels, the title is
    /// a bit bigger and tick labels a bit smaller.
    pub fn default_with_font_size(base: f64) -> Self {
        let scaled = |f: f64| (f * base).round();
        let title_size = scaled(1.2);
        let tick_size = scaled(1.0 / 1.2);

        let tick = |h_align, v_align| TickStyle {
            line: LineStyle::solid(gray(0x11), 1.0),
            length: 5.0,
            label: TextStyle::new(BLACK, tick_size).aligned(h_align, v_align),
        };
        let expand = Expand {
            absolute: 0.0,
            relative: 0.05,
        };

        Style {
            background: WHITE,
            title: TextStyle::new(BLACK, title_size).aligned(HAlign::Center, VAlign::Top),
            title_height: scaled(3.0),
            panel: PanelStyle {
                background: gray(0xee),
                pad_x: scaled(0.5),
                pad_y: scaled(0.5),
            },
            h_strip: StripStyle {
                background: gray(0xcc),
                size: scaled(2.0),
                text: TextStyle::new(BLACK, base),
            },
            v_strip: StripStyle {
                background: gray(0xcc),
                size: scaled(2.5),
                text: TextStyle::new(BLACK, base).rotated(),
            },
            grid: LineStyle::solid(WHITE, 1.0),
            x_axis: AxisStyle {
                title: TextStyle::new(BLACK, base),
                title_size: scaled(2.0),
                major_tick: tick(HAlign::Center, VAlign::Top),
                expand,
            },
            y_axis: AxisStyle {
                title: TextStyle::new(BLACK, base).rotated(),
                title_size: scaled(2.0),
                major_tick: tick(HAlign::Right, VAlign::Middle),
                expand,
            },
            legend: LegendStyle {
                title: TextStyle::new(BLACK, base).aligned(HAlign::Left, VAlign::Top),
                label: TextStyle::new(BLACK, tick_size).aligned(HAlign::Left, VAlign::Middle),
                discrete_size: 20.0,
                discrete_pad: 4.0,
                continuous_size: 20.0,
                continuous_length: 150.0,
                continuous_tick: LineStyle::solid(BLACK, 1.0),
                continuous_tick_length: 3.0,
                continuous_tick_mirror: true,
            },
            geom: GeomStyle {
                color: BLACK,
                fill: gray(0x59),
                point_size: 3.0,
                line_width: 1.0,
            },
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::default_with_font_size(12.0)
    }
}
