// The facet grid and the scale pipeline run before every draw

use std::rc::Rc;

use anyhow::Result;

use crate::aes::Aes;
use crate::canvas::Rect;
use crate::diagnostics::{Diagnostics, Verbosity};
use crate::error::ScaleError;
use crate::geom::Geom;
use crate::palette::{Categorical, ColorMap, Gradient, Rainbow};
use crate::panel::{Panel, PanelView};
use crate::scale::{Scale, ScaleType, SizeMap};
use crate::style::Style;
use crate::trans::Transformation;

/// Index of a scale in the arena of its plot.
pub type ScaleId = usize;

/// A grid of `rows` x `cols` panels.
///
/// All scales live in one arena. A shared X axis is a single arena entry
/// referenced by every column, a free one has an entry per column; the same
/// holds for Y and rows. Alpha, Color, Fill, Shape, Size and Stroke always
/// have exactly one scale for the whole plot.
pub struct Plot {
    pub title: String,
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<Vec<Panel>>,
    /// Strip labels right of each row, none if all are empty.
    pub row_labels: Vec<String>,
    /// Strip labels above each column, none if all are empty.
    pub col_labels: Vec<String>,
    pub style: Style,

    pub(crate) scales: Vec<Scale>,
    pub(crate) x_scales: Vec<ScaleId>,
    pub(crate) y_scales: Vec<ScaleId>,
    // Indexed by Aes; the X and Y slots point at the first column/row.
    pub(crate) aes_scales: [ScaleId; Aes::COUNT],
}

impl Plot {
    /// Sets up the grid and the default scales.
    ///
    /// # Panics
    ///
    /// If rows or cols is zero.
    pub fn new(rows: usize, cols: usize, free_x: bool, free_y: bool) -> Self {
        assert!(rows > 0 && cols > 0, "a plot needs at least one panel, got {rows}x{cols}");
        let style = Style::default();

        let mut scales = Vec::new();
        let mut alloc = |scale: Scale| {
            scales.push(scale);
            scales.len() - 1
        };

        let axis = |expand| {
            let mut s = Scale::new().with_trans(Transformation::Linear);
            s.autoscaling.expand = expand;
            s
        };
        let x_scales: Vec<ScaleId> = if free_x {
            (0..cols).map(|_| alloc(axis(style.x_axis.expand))).collect()
        } else {
            let id = alloc(axis(style.x_axis.expand));
            vec![id; cols]
        };
        let y_scales: Vec<ScaleId> = if free_y {
            (0..rows).map(|_| alloc(axis(style.y_axis.expand))).collect()
        } else {
            let id = alloc(axis(style.y_axis.expand));
            vec![id; rows]
        };

        let mut aes_scales = [0; Aes::COUNT];
        aes_scales[Aes::X.index()] = x_scales[0];
        aes_scales[Aes::Y.index()] = y_scales[0];
        for aes in Aes::GUIDED {
            let scale = match aes {
                Aes::Size => Scale::new().with_trans(Transformation::Sqrt),
                Aes::Shape | Aes::Stroke => Scale::new()
                    .with_trans(Transformation::Linear)
                    .with_type(ScaleType::Discrete),
                _ => Scale::new().with_trans(Transformation::Linear),
            };
            aes_scales[aes.index()] = alloc(scale);
        }

        Plot {
            title: String::new(),
            rows,
            cols,
            panels: (0..rows)
                .map(|_| (0..cols).map(|_| Panel::new()).collect())
                .collect(),
            row_labels: vec![String::new(); rows],
            col_labels: vec![String::new(); cols],
            style,
            scales,
            x_scales,
            y_scales,
            aes_scales,
        }
    }

    /// A single panel plot.
    pub fn simple() -> Self {
        Plot::new(1, 1, false, false)
    }

    fn check_cell(&self, row: usize, col: usize) {
        assert!(
            row < self.rows && col < self.cols,
            "panel ({row}, {col}) outside of the {}x{} grid",
            self.rows,
            self.cols
        );
    }

    pub fn panel(&self, row: usize, col: usize) -> &Panel {
        self.check_cell(row, col);
        &self.panels[row][col]
    }

    pub fn panel_mut(&mut self, row: usize, col: usize) -> &mut Panel {
        self.check_cell(row, col);
        &mut self.panels[row][col]
    }

    pub fn add_geom(&mut self, row: usize, col: usize, geom: impl Geom + 'static) {
        self.panel_mut(row, col).add(geom);
    }

    pub fn x_scale(&self, col: usize) -> &Scale {
        &self.scales[self.x_scales[col]]
    }

    pub fn x_scale_mut(&mut self, col: usize) -> &mut Scale {
        &mut self.scales[self.x_scales[col]]
    }

    pub fn y_scale(&self, row: usize) -> &Scale {
        &self.scales[self.y_scales[row]]
    }

    pub fn y_scale_mut(&mut self, row: usize) -> &mut Scale {
        &mut self.scales[self.y_scales[row]]
    }

    /// The plot wide scale of aes. For X and Y this is the scale of the
    /// first column or row.
    pub fn scale(&self, aes: Aes) -> &Scale {
        &self.scales[self.aes_scales[aes.index()]]
    }

    pub fn scale_mut(&mut self, aes: Aes) -> &mut Scale {
        &mut self.scales[self.aes_scales[aes.index()]]
    }

    /// Every distinct scale, each exactly once.
    pub fn scales(&self) -> &[Scale] {
        &self.scales
    }

    /// Sets the title of every X scale.
    pub fn set_x_title(&mut self, title: &str) {
        for id in self.x_scales.clone() {
            self.scales[id].title = title.to_string();
        }
    }

    pub fn set_y_title(&mut self, title: &str) {
        for id in self.y_scales.clone() {
            self.scales[id].title = title.to_string();
        }
    }

    /// Shares one color map between the Color and the Fill scale so they
    /// can be explained by a single guide.
    pub fn share_color_map(&mut self, cm: Rc<dyn ColorMap>) {
        self.scale_mut(Aes::Color).color_map = Some(Rc::clone(&cm));
        self.scale_mut(Aes::Fill).color_map = Some(cm);
    }

    /// Scale ids seen by the panel at (row, col), indexed by Aes.
    pub(crate) fn panel_scale_ids(&self, row: usize, col: usize) -> [ScaleId; Aes::COUNT] {
        let mut ids = self.aes_scales;
        ids[Aes::X.index()] = self.x_scales[col];
        ids[Aes::Y.index()] = self.y_scales[row];
        ids
    }

    /// The view a geom gets of the panel at (row, col) drawn into rect.
    pub fn view(&self, row: usize, col: usize, rect: Rect) -> PanelView<'_> {
        self.check_cell(row, col);
        let ids = self.panel_scale_ids(row, col);
        let scales: [&Scale; Aes::COUNT] = std::array::from_fn(|i| &self.scales[ids[i]]);
        PanelView::new(rect, &self.style, scales)
    }

    /// Runs the scale pipeline. Must be called before drawing.
    ///
    /// Afterwards every scale with data has a valid Limit and Range, the X
    /// and Y scales always do.
    pub fn prepare(&mut self, diag: &mut dyn Diagnostics) -> Result<()> {
        diag.debug(
            Verbosity::Info,
            &format!("preparing {}x{} plot {:?}", self.rows, self.cols, self.title),
        );

        self.learn_data_range();
        self.dump_scales(diag, "After learning data ranges");

        self.autoscale();
        self.dump_scales(diag, "After autoscaling");

        self.validate()?;

        self.de_degenerate(diag);
        self.dump_scales(diag, "After de-degenerating X and Y");

        self.fill_range();
        self.dump_scales(diag, "After filling Range");

        self.setup_color_and_size_maps();
        Ok(())
    }

    /// Resets all scales and folds the data ranges of every geom into the
    /// scales of its panel.
    pub fn learn_data_range(&mut self) {
        for scale in &mut self.scales {
            scale.reset();
        }
        for (row, panels) in self.panels.iter().enumerate() {
            for (col, panel) in panels.iter().enumerate() {
                let mut ids = self.aes_scales;
                ids[Aes::X.index()] = self.x_scales[col];
                ids[Aes::Y.index()] = self.y_scales[row];
                for geom in &panel.geoms {
                    for (aes, interval) in geom.data_ranges().iter() {
                        self.scales[ids[aes.index()]].update_data(*interval);
                    }
                }
            }
        }
    }

    /// Autoscales each distinct scale once.
    pub fn autoscale(&mut self) {
        for scale in &mut self.scales {
            scale.autoscale();
        }
    }

    /// Repairs degenerate X and Y scales with a warning. The other
    /// aesthetics keep their Limit; mapping onto a degenerate one yields
    /// the neutral fallbacks.
    pub fn de_degenerate(&mut self, diag: &mut dyn Diagnostics) {
        for (axis, ids) in [("X", &self.x_scales), ("Y", &self.y_scales)] {
            for (i, &id) in ids.iter().enumerate() {
                if self.scales[id].de_degenerate() {
                    diag.warn(&format!("Corrected degeneration of {i}th {axis} scale"));
                }
            }
        }
    }

    pub fn fill_range(&mut self) {
        for scale in &mut self.scales {
            scale.fill_range();
        }
    }

    /// Assigns default color and size maps where none is set and maps the
    /// full `[0, 1]` of every color map.
    pub fn setup_color_and_size_maps(&mut self) {
        for aes in [Aes::Color, Aes::Fill] {
            let scale = &mut self.scales[self.aes_scales[aes.index()]];
            if scale.color_map.is_none() {
                let cm: Rc<dyn ColorMap> = match (aes, scale.scale_type) {
                    (Aes::Color, ScaleType::Discrete) => Rc::new(Categorical::category10()),
                    (Aes::Color, _) => Rc::new(Rainbow::default()),
                    _ => Rc::new(Gradient::black_body()),
                };
                scale.color_map = Some(cm);
            }
            if let Some(cm) = &scale.color_map {
                cm.set_min(0.0);
                cm.set_max(1.0);
            }
        }

        let swatch = self.style.legend.discrete_size;
        let size = self.scale_mut(Aes::Size);
        if size.size_map.is_none() {
            size.size_map = Some(SizeMap::for_swatch(swatch));
        }
    }

    /// Rejects scale configurations no data can be drawn with.
    pub fn validate(&self) -> Result<(), ScaleError> {
        for aes in [Aes::Shape, Aes::Stroke] {
            let scale = self.scale(aes);
            if scale.has_data() && scale.scale_type != ScaleType::Discrete {
                return Err(ScaleError::NotDiscrete {
                    aes,
                    scale_type: scale.scale_type.to_string(),
                });
            }
        }

        let check = |aes: Aes, scale: &Scale| {
            let log = scale.scale_type == ScaleType::Logarithmic
                || scale.trans == Transformation::Log10;
            let limit = scale.limit();
            if log && scale.has_data() && !(limit.min > 0.0 && limit.max > 0.0) {
                return Err(ScaleError::LogDomain {
                    aes,
                    min: limit.min,
                    max: limit.max,
                });
            }
            Ok(())
        };
        for &id in &self.x_scales {
            check(Aes::X, &self.scales[id])?;
        }
        for &id in &self.y_scales {
            check(Aes::Y, &self.scales[id])?;
        }
        for aes in Aes::GUIDED {
            check(aes, self.scale(aes))?;
        }
        Ok(())
    }

    fn dump_scales(&self, diag: &mut dyn Diagnostics, phase: &str) {
        if !diag.enabled(Verbosity::Detail) {
            return;
        }
        diag.debug(Verbosity::Detail, phase);
        for (i, &id) in self.x_scales.iter().enumerate() {
            diag.debug(Verbosity::Detail, &format!("  X {i}: {}", self.scales[id]));
        }
        for (i, &id) in self.y_scales.iter().enumerate() {
            diag.debug(Verbosity::Detail, &format!("  Y {i}: {}", self.scales[id]));
        }
        for aes in Aes::GUIDED {
            diag.debug(
                Verbosity::Detail,
                &format!("  {}: {}", aes.name(), self.scale(aes)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectedDiagnostics;
    use crate::geom::{Aesthetics, Point};
    use crate::interval::Interval;
    use approx::assert_abs_diff_eq;

    fn points(xy: &[(f64, f64)]) -> Point {
        Point::new(xy.to_vec())
    }

    #[test]
    fn test_arena_layout() {
        let shared = Plot::new(2, 3, false, false);
        assert_eq!(shared.scales().len(), 2 + 6);
        assert!(shared.x_scales.iter().all(|&id| id == shared.x_scales[0]));

        let free = Plot::new(2, 3, true, true);
        assert_eq!(free.scales().len(), 3 + 2 + 6);
        assert_ne!(free.x_scales[0], free.x_scales[2]);
        assert_eq!(free.scale(Aes::Size).trans, Transformation::Sqrt);
        assert_eq!(free.scale(Aes::Shape).scale_type, ScaleType::Discrete);
    }

    #[test]
    #[should_panic(expected = "outside of the 1x1 grid")]
    fn test_panel_outside_grid_panics() {
        let mut plot = Plot::simple();
        plot.add_geom(1, 0, points(&[(1.0, 1.0)]));
    }

    #[test]
    fn test_free_x_learns_per_column() {
        let mut plot = Plot::new(1, 2, true, false);
        plot.add_geom(0, 0, points(&[(0.0, 1.0), (10.0, 2.0)]));
        plot.add_geom(0, 1, points(&[(100.0, 3.0), (200.0, 4.0)]));
        let mut diag = CollectedDiagnostics::new(Verbosity::Quiet);
        plot.prepare(&mut diag).unwrap();

        assert_eq!(plot.x_scale(0).data(), Interval::new(0.0, 10.0));
        assert_eq!(plot.x_scale(1).data(), Interval::new(100.0, 200.0));
        assert_eq!(plot.y_scale(0).data(), Interval::new(1.0, 4.0));
        assert!(diag.warnings.is_empty());
    }

    #[test]
    fn test_second_prepare_does_not_compound() {
        let mut plot = Plot::simple();
        plot.add_geom(0, 0, points(&[(0.0, 0.0), (10.0, 10.0)]));
        let mut diag = CollectedDiagnostics::new(Verbosity::Quiet);
        plot.prepare(&mut diag).unwrap();
        let first = plot.x_scale(0).limit();
        plot.prepare(&mut diag).unwrap();

        assert_eq!(plot.x_scale(0).limit(), first);
        assert_abs_diff_eq!(first.min, -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(first.max, 10.5, epsilon = 1e-12);
    }

    #[test]
    fn test_unused_y_is_repaired_with_warning() {
        let mut plot = Plot::new(1, 1, false, true);
        let mut diag = CollectedDiagnostics::new(Verbosity::Quiet);
        plot.prepare(&mut diag).unwrap();

        assert_eq!(
            diag.warnings,
            vec![
                "Corrected degeneration of 0th X scale".to_string(),
                "Corrected degeneration of 0th Y scale".to_string(),
            ]
        );
        let y = plot.y_scale(0).limit();
        assert!(y.min.is_finite() && y.max > y.min);
        assert_eq!(plot.y_scale(0).range(), y);
    }

    #[test]
    fn test_default_maps() {
        let mut plot = Plot::simple();
        plot.add_geom(
            0,
            0,
            points(&[(1.0, 1.0)]).with_aes(Aesthetics::new().color(|i| i as f64)),
        );
        plot.prepare(&mut CollectedDiagnostics::new(Verbosity::Quiet))
            .unwrap();

        let color = plot.scale(Aes::Color).color_map.as_ref().unwrap();
        assert_eq!((color.min(), color.max()), (0.0, 1.0));
        assert!(plot.scale(Aes::Fill).color_map.is_some());
        assert_eq!(
            plot.scale(Aes::Size).size_map,
            Some(SizeMap::for_swatch(plot.style.legend.discrete_size))
        );
    }

    #[test]
    fn test_explicit_maps_are_kept() {
        let mut plot = Plot::simple();
        let blues: Rc<dyn ColorMap> = Rc::new(Gradient::blues());
        plot.share_color_map(Rc::clone(&blues));
        plot.scale_mut(Aes::Size).size_map = Some(SizeMap { min: 1.0, max: 3.0 });
        plot.prepare(&mut CollectedDiagnostics::new(Verbosity::Quiet))
            .unwrap();

        let fill = plot.scale(Aes::Fill).color_map.as_ref().unwrap();
        assert!(Rc::ptr_eq(fill, &blues));
        assert_eq!(plot.scale(Aes::Size).size_map, Some(SizeMap { min: 1.0, max: 3.0 }));
    }

    #[test]
    fn test_detail_dumps_every_phase() {
        let mut plot = Plot::simple();
        plot.add_geom(0, 0, points(&[(1.0, 2.0)]));
        let mut diag = CollectedDiagnostics::new(Verbosity::Detail);
        plot.prepare(&mut diag).unwrap();

        let phases: Vec<&str> = diag
            .messages
            .iter()
            .filter(|(_, m)| m.starts_with("After"))
            .map(|(_, m)| m.as_str())
            .collect();
        assert_eq!(
            phases,
            vec![
                "After learning data ranges",
                "After autoscaling",
                "After de-degenerating X and Y",
                "After filling Range",
            ]
        );
    }

    #[test]
    fn test_log_axis_with_zero_fails() {
        let mut plot = Plot::simple();
        plot.x_scale_mut(0).set_log();
        plot.add_geom(0, 0, points(&[(0.0, 1.0), (10.0, 2.0)]));
        let err = plot
            .prepare(&mut CollectedDiagnostics::new(Verbosity::Quiet))
            .unwrap_err();

        match err.downcast_ref::<ScaleError>() {
            Some(ScaleError::LogDomain { aes, .. }) => assert_eq!(*aes, Aes::X),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_log_axis_expands_multiplicatively() {
        let mut plot = Plot::simple();
        plot.x_scale_mut(0).set_log();
        plot.add_geom(0, 0, points(&[(1.0, 1.0), (100.0, 2.0)]));
        plot.prepare(&mut CollectedDiagnostics::new(Verbosity::Quiet))
            .unwrap();

        let limit = plot.x_scale(0).limit();
        assert!(limit.min > 0.0 && limit.min < 1.0);
        assert!(limit.max > 100.0);
    }

    #[test]
    fn test_continuous_shape_is_rejected() {
        let mut plot = Plot::simple();
        plot.scale_mut(Aes::Shape).scale_type = ScaleType::Linear;
        plot.add_geom(
            0,
            0,
            points(&[(1.0, 1.0)]).with_aes(Aesthetics::new().shape(|i| i as i64)),
        );
        let err = plot
            .prepare(&mut CollectedDiagnostics::new(Verbosity::Quiet))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ScaleError>(),
            Some(&ScaleError::NotDiscrete {
                aes: Aes::Shape,
                scale_type: "linear".to_string()
            })
        );
    }
}
