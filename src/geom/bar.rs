use std::fmt;
use std::str::FromStr;

use plotters::style::RGBAColor;

use crate::aes::DataRanges;
use crate::canvas::{Canvas, LineStyle};
use crate::error::ScaleError;
use crate::geom::{Aesthetics, Geom, Rectangle, XYUV};
use crate::interval::Interval;
use crate::panel::PanelView;

/// How bars sharing the same x are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarPosition {
    /// On top of each other, negative values hang below zero.
    #[default]
    Stack,
    /// Next to each other.
    Dodge,
    /// Stacked and normalized to a total height of 1.
    Fill,
}

impl FromStr for BarPosition {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stack" => Ok(BarPosition::Stack),
            "dodge" => Ok(BarPosition::Dodge),
            "fill" => Ok(BarPosition::Fill),
            other => Err(ScaleError::UnknownBarPosition(other.to_string())),
        }
    }
}

impl fmt::Display for BarPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BarPosition::Stack => "stack",
            BarPosition::Dodge => "dodge",
            BarPosition::Fill => "fill",
        })
    }
}

/// Groups data indices by x to determine bar centers and widths, for bars
/// and boxplots.
#[derive(Debug, Clone)]
pub struct BarGroups {
    pub position: BarPosition,
    /// Gap between groups as a fraction of the smallest x distance.
    pub group_gap: f64,
    /// Gap between dodged bars inside a group.
    pub bar_gap: f64,
    /// All dodged bars get the width of a bar in the largest group.
    pub same_width: bool,
    // Sorted by x.
    groups: Vec<(f64, Vec<usize>)>,
}

impl BarGroups {
    /// A zero group gap is replaced by 0.2.
    pub fn new(position: BarPosition, group_gap: f64, bar_gap: f64, same_width: bool) -> Self {
        BarGroups {
            position,
            group_gap: if group_gap == 0.0 { 0.2 } else { group_gap },
            bar_gap,
            same_width,
            groups: Vec::new(),
        }
    }

    /// Records data point i at x.
    pub fn record(&mut self, x: f64, i: usize) {
        match self.groups.binary_search_by(|(gx, _)| gx.total_cmp(&x)) {
            Ok(pos) => self.groups[pos].1.push(i),
            Err(pos) => self.groups.insert(pos, (x, vec![i])),
        }
    }

    /// The recorded x values in ascending order.
    pub fn xs(&self) -> Vec<f64> {
        self.groups.iter().map(|(x, _)| *x).collect()
    }

    /// Indices recorded at x, in recording order.
    pub fn group(&self, x: f64) -> &[usize] {
        self.groups
            .iter()
            .find(|(gx, _)| *gx == x)
            .map(|(_, is)| is.as_slice())
            .unwrap_or(&[])
    }

    /// Smallest distance between two recorded x values, 1 for a single x.
    pub fn min_delta(&self) -> f64 {
        match self.groups.len() {
            0 => 0.0,
            1 => 1.0,
            _ => self
                .groups
                .windows(2)
                .map(|w| w[1].0 - w[0].0)
                .fold(f64::INFINITY, f64::min),
        }
    }

    pub fn max_group_size(&self) -> usize {
        self.groups.iter().map(|(_, is)| is.len()).max().unwrap_or(0)
    }

    /// Center and half width of the bar for data point i at x, `None` if
    /// i was not recorded at x.
    pub fn width(&self, x: f64, i: usize) -> Option<(f64, f64)> {
        let group = self.group(x);
        let g = group.iter().position(|&k| k == i)?;

        let min_delta = self.min_delta();
        let non_gap = min_delta * (1.0 - self.group_gap);
        if self.position != BarPosition::Dodge {
            return Some((x, non_gap / 2.0));
        }

        let m = group.len();
        let n = if self.same_width {
            self.max_group_size()
        } else {
            m
        };
        let half = non_gap / (2 * n) as f64;
        let center = x + (2.0 * g as f64 - m as f64 + 1.0) * half;
        Some((center, half - min_delta * self.bar_gap))
    }

    /// The x extent covered by all bars.
    pub fn x_range(&self) -> Interval {
        let mut r = Interval::UNSET;
        if let (Some((left, li)), Some((right, ri))) = (self.groups.first(), self.groups.last()) {
            if let Some((c, hw)) = li.first().and_then(|&i| self.width(*left, i)) {
                r.update_one(c - hw);
            }
            if let Some((c, hw)) = ri.last().and_then(|&i| self.width(*right, i)) {
                r.update_one(c + hw);
            }
        }
        r
    }
}

/// Bars standing on (or hanging from) y = 0.
///
/// Honors the aesthetics of [`Rectangle`].
#[derive(Clone, Default)]
pub struct Bar {
    pub xy: Vec<(f64, f64)>,
    pub aes: Aesthetics,
    pub position: BarPosition,
    pub group_gap: f64,
    pub bar_gap: f64,
    pub default_fill: Option<RGBAColor>,
    pub border: Option<LineStyle>,
}

impl Bar {
    pub fn new(xy: Vec<(f64, f64)>) -> Self {
        Bar {
            xy,
            ..Default::default()
        }
    }

    pub fn with_aes(mut self, aes: Aesthetics) -> Self {
        self.aes = aes;
        self
    }

    pub fn with_position(mut self, position: BarPosition) -> Self {
        self.position = position;
        self
    }

    fn groups(&self) -> BarGroups {
        let mut g = BarGroups::new(self.position, self.group_gap, self.bar_gap, true);
        for (i, &(x, _)) in self.xy.iter().enumerate() {
            g.record(x, i);
        }
        g
    }

    fn rects(&self) -> Rectangle {
        let mut xyuv = vec![XYUV::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN); self.xy.len()];
        let g = self.groups();

        for x in g.xs() {
            let is = g.group(x);
            match self.position {
                BarPosition::Stack | BarPosition::Fill => {
                    let (mut below, mut above) = (0.0, 0.0);
                    for &i in is {
                        let Some((center, hw)) = g.width(x, i) else {
                            continue;
                        };
                        let y = self.xy[i].1;
                        let (from, to) = if y < 0.0 {
                            below += y;
                            (below - y, below)
                        } else {
                            above += y;
                            (above - y, above)
                        };
                        xyuv[i] = XYUV::new(center - hw, from, center + hw, to);
                    }
                    if self.position == BarPosition::Fill {
                        for &i in is {
                            let total = if xyuv[i].v < 0.0 { -below } else { above };
                            if total > 0.0 {
                                xyuv[i].y /= total;
                                xyuv[i].v /= total;
                            }
                        }
                    }
                }
                BarPosition::Dodge => {
                    for &i in is {
                        if let Some((center, hw)) = g.width(x, i) {
                            xyuv[i] = XYUV::new(center - hw, 0.0, center + hw, self.xy[i].1);
                        }
                    }
                }
            }
        }

        Rectangle {
            xyuv,
            aes: self.aes.clone(),
            default_fill: self.default_fill,
            border: self.border.clone(),
        }
    }
}

impl Geom for Bar {
    fn data_ranges(&self) -> DataRanges {
        self.rects().data_ranges()
    }

    fn draw(&self, panel: &PanelView<'_>, canvas: &mut dyn Canvas) {
        self.rects().draw(panel, canvas);
    }
}
