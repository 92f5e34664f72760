// Legends explaining the non-positional scales

use std::rc::Rc;

use crate::aes::Aes;
use crate::canvas::{Canvas, GlyphStyle, LineStyle, Point, Rect};
use crate::diagnostics::{Diagnostics, Verbosity};
use crate::palette::{dashes, fade, ColorMap, Shape, BLACK};
use crate::plot::Plot;
use crate::scale::{Scale, ScaleType};
use crate::ticks::{Tick, Ticker};

/// Reports whether scale sa of aesthetic a and scale sb of aesthetic b can
/// be explained by one guide.
pub fn can_combine(a: Aes, sa: &Scale, b: Aes, sb: &Scale) -> bool {
    if sa.scale_type != sb.scale_type {
        return false;
    }
    if !sa.limit().equal(&sb.limit()) {
        return false;
    }
    if !sa.title.is_empty() && !sb.title.is_empty() && sa.title != sb.title {
        return false;
    }
    if sa.ticker.is_some() && sb.ticker.is_some() && sa.ticks() != sb.ticks() {
        return false;
    }
    if a.is_color() && b.is_color() {
        if let (Some(ca), Some(cb)) = (&sa.color_map, &sb.color_map) {
            return Rc::ptr_eq(ca, cb);
        }
    }
    true
}

/// Partitions the guided scales with data into groups sharing one guide.
/// A scale joins the first group all of whose members it combines with.
pub fn combine_guides(plot: &Plot) -> Vec<Vec<Aes>> {
    let mut groups: Vec<Vec<Aes>> = Vec::new();
    for aes in Aes::GUIDED {
        let scale = plot.scale(aes);
        if !scale.has_data() {
            continue;
        }
        let fits = groups.iter_mut().find(|group| {
            group
                .iter()
                .all(|&other| can_combine(other, plot.scale(other), aes, scale))
        });
        match fits {
            Some(group) => group.push(aes),
            None => groups.push(vec![aes]),
        }
    }
    groups
}

/// The first non-empty title in the group.
pub fn title_for<'a>(plot: &'a Plot, group: &[Aes]) -> &'a str {
    group
        .iter()
        .map(|&aes| plot.scale(aes).title.as_str())
        .find(|t| !t.is_empty())
        .unwrap_or("")
}

/// An explicit ticker of any member, discrete ticks if Shape or Stroke is
/// part of the group, else the ticker of the first scale.
pub fn ticker_for(plot: &Plot, group: &[Aes]) -> Ticker {
    if let Some(t) = group.iter().find_map(|&aes| plot.scale(aes).ticker.clone()) {
        return t;
    }
    if group.iter().any(|aes| aes.requires_discrete()) {
        return Ticker::Discrete;
    }
    match group.first() {
        Some(&aes) => plot.scale(aes).effective_ticker(),
        None => Ticker::Discrete,
    }
}

pub fn color_map_for(plot: &Plot, group: &[Aes]) -> Option<Rc<dyn ColorMap>> {
    group
        .iter()
        .filter(|aes| aes.is_color())
        .find_map(|&aes| plot.scale(aes).color_map.clone())
}

/// A continuous guide is drawn only for groups of continuous Color and
/// Fill scales.
pub fn is_continuous_color_guide(plot: &Plot, group: &[Aes]) -> bool {
    !group.is_empty()
        && group
            .iter()
            .all(|&aes| aes.is_color() && plot.scale(aes).scale_type != ScaleType::Discrete)
}

fn labelled_ticks(plot: &Plot, group: &[Aes]) -> Vec<Tick> {
    let limit = plot.scale(group[0]).limit();
    ticker_for(plot, group)
        .ticks(limit.min, limit.max)
        .into_iter()
        .filter(|t| !t.minor)
        .collect()
}

/// Width needed to draw all guides of the plot, 0 if there are none.
pub fn guides_width(plot: &Plot, canvas: &dyn Canvas) -> f64 {
    let ls = &plot.style.legend;
    let mut width: f64 = 0.0;
    for group in combine_guides(plot) {
        width = width.max(canvas.text_width(title_for(plot, &group), &ls.title));
        let swatch = if is_continuous_color_guide(plot, &group) {
            ls.continuous_size + ls.continuous_tick_length
        } else {
            ls.discrete_size
        };
        for tick in labelled_ticks(plot, &group) {
            let w = swatch + ls.discrete_pad + canvas.text_width(&tick.label, &ls.label);
            width = width.max(w);
        }
    }
    if width > 0.0 {
        width.max(3.0 * ls.discrete_size) + 2.0 * ls.discrete_pad
    } else {
        0.0
    }
}

/// Draws all guides top down into area.
pub fn draw_guides(plot: &Plot, canvas: &mut dyn Canvas, area: Rect, diag: &mut dyn Diagnostics) {
    let pad = plot.style.legend.discrete_pad;
    let x = area.min.x + pad;
    let mut top = area.max.y;
    for group in combine_guides(plot) {
        diag.debug(Verbosity::Trace, &format!("guide for {:?}", group));
        top = if is_continuous_color_guide(plot, &group) {
            draw_continuous_color_guide(plot, canvas, x, top, &group)
        } else {
            draw_discrete_guide(plot, canvas, x, top, &group)
        };
        top -= 2.0 * pad;
    }
}

fn draw_title(plot: &Plot, canvas: &mut dyn Canvas, x: f64, top: f64, group: &[Aes]) -> f64 {
    let title = title_for(plot, group);
    if title.is_empty() {
        return top;
    }
    let style = &plot.style.legend.title;
    canvas.fill_text(Point::new(x, top), title, style);
    top - 1.5 * style.size
}

/// Stacked swatches, one per tick, showing every aesthetic of the group.
/// Returns the y coordinate below the guide.
pub fn draw_discrete_guide(
    plot: &Plot,
    canvas: &mut dyn Canvas,
    x: f64,
    top: f64,
    group: &[Aes],
) -> f64 {
    let ls = &plot.style.legend;
    let has = |aes: Aes| group.contains(&aes);
    let size = ls.discrete_size;
    let mut y = draw_title(plot, canvas, x, top, group);

    for tick in labelled_ticks(plot, group) {
        let v = tick.value;
        let r = Rect::new(x, y - size, x + size, y);
        let center = Point::new(x + size / 2.0, y - size / 2.0);
        canvas.fill_rect(r, plot.style.panel.background);

        let mut color = plot.style.geom.color;
        if let Some(&aes) = group.iter().find(|aes| aes.is_color()) {
            color = plot.scale(aes).map_color(v);
        }
        if has(Aes::Alpha) {
            let a = plot.scale(Aes::Alpha).map(v);
            if (0.0..=1.0).contains(&a) {
                color = fade(color, a);
            }
        }

        if has(Aes::Stroke) {
            let line = LineStyle {
                color,
                width: plot.style.geom.line_width,
                dashes: dashes(v.round() as i64),
            };
            canvas.stroke_path(
                &[Point::new(r.min.x, center.y), Point::new(r.max.x, center.y)],
                &line,
            );
        }

        if has(Aes::Fill) && !has(Aes::Shape) && !has(Aes::Size) {
            let inset = 0.2 * size;
            let inner = Rect::new(r.min.x + inset, r.min.y + inset, r.max.x - inset, r.max.y - inset);
            canvas.fill_rect(inner, color);
        } else if has(Aes::Shape)
            || has(Aes::Size)
            || has(Aes::Color)
            || (has(Aes::Alpha) && !has(Aes::Stroke))
        {
            let radius = if has(Aes::Size) {
                plot.scale(Aes::Size).map_size(v)
            } else {
                size / 5.0
            };
            let shape = if has(Aes::Shape) {
                Shape::nth(v.round() as i64)
            } else {
                Shape::Circle
            };
            if radius > 0.0 {
                canvas.draw_glyph(center, &GlyphStyle { color, radius, shape });
            }
        }

        canvas.stroke_rect(r, &LineStyle::solid(BLACK, 0.3));
        canvas.fill_text(
            Point::new(r.max.x + ls.discrete_pad, center.y),
            &tick.label,
            &ls.label,
        );
        y -= size + ls.discrete_pad;
    }
    y
}

/// A gradient bar with ticks for continuous color scales. Returns the y
/// coordinate below the guide.
pub fn draw_continuous_color_guide(
    plot: &Plot,
    canvas: &mut dyn Canvas,
    x: f64,
    top: f64,
    group: &[Aes],
) -> f64 {
    const STEPS: usize = 101;

    let ls = &plot.style.legend;
    let Some(cm) = color_map_for(plot, group) else {
        return top;
    };
    let y = draw_title(plot, canvas, x, top, group);
    let bar = Rect::new(x, y - ls.continuous_length, x + ls.continuous_size, y);

    let h = bar.height() / STEPS as f64;
    for i in 0..STEPS {
        let t = i as f64 / (STEPS - 1) as f64;
        let color = cm.at(cm.min() + t * (cm.max() - cm.min()));
        let y0 = bar.min.y + i as f64 * h;
        canvas.fill_rect(Rect::new(bar.min.x, y0, bar.max.x, y0 + h), color);
    }

    let scale = plot.scale(group[0]);
    let tl = ls.continuous_tick_length;
    for tick in labelled_ticks(plot, group) {
        let t = scale.map(tick.value);
        if !(0.0..=1.0).contains(&t) {
            continue;
        }
        let ty = bar.min.y + t * bar.height();
        canvas.stroke_path(
            &[Point::new(bar.max.x - tl, ty), Point::new(bar.max.x, ty)],
            &ls.continuous_tick,
        );
        if ls.continuous_tick_mirror {
            canvas.stroke_path(
                &[Point::new(bar.min.x, ty), Point::new(bar.min.x + tl, ty)],
                &ls.continuous_tick,
            );
        }
        canvas.fill_text(
            Point::new(bar.max.x + ls.discrete_pad, ty),
            &tick.label,
            &ls.label,
        );
    }

    canvas.stroke_rect(bar, &LineStyle::solid(BLACK, 0.3));
    bar.min.y
}
