use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, Write};

use gramfacet::aes::Aes;
use gramfacet::backend::render_png;
use gramfacet::csv_reader::{self, Column, CsvData};
use gramfacet::diagnostics::{Diagnostics, Verbosity, WriterDiagnostics};
use gramfacet::geom::{Aesthetics, Line, Point};
use gramfacet::partition::Partitioner;
use gramfacet::plot::Plot;
use gramfacet::scale::ScaleType;
use gramfacet::ticks::{Tick, Ticker};

/// Numeric facet columns with more distinct values are cut into intervals.
const MAX_FACET_LEVELS: usize = 6;
const FACET_PARTITIONS: usize = 4;

#[derive(Parser, Debug)]
#[command(name = "gramfacet")]
#[command(about = "Render faceted scatter plots from CSV data", long_about = None)]
struct Args {
    #[arg(short = 'x', long = "x", required = true, help = "X-axis column (name or 0-based index)")]
    x_column: String,

    #[arg(short = 'y', long = "y", required = true, help = "Y-axis column (name or 0-based index)")]
    y_column: String,

    #[arg(long = "color", help = "Column mapped to the point color")]
    color: Option<String>,

    #[arg(long = "size", help = "Column mapped to the point size")]
    size: Option<String>,

    #[arg(long = "shape", help = "Column mapped to the point shape")]
    shape: Option<String>,

    #[arg(long = "alpha", help = "Column mapped to the opacity")]
    alpha: Option<String>,

    #[arg(long = "facet-row", help = "Column splitting the plot into rows")]
    facet_row: Option<String>,

    #[arg(long = "facet-col", help = "Column splitting the plot into columns")]
    facet_col: Option<String>,

    #[arg(long = "free-x", help = "Scale the X axis of every column independently")]
    free_x: bool,

    #[arg(long = "free-y", help = "Scale the Y axis of every row independently")]
    free_y: bool,

    #[arg(long = "log-x", help = "Logarithmic X axis")]
    log_x: bool,

    #[arg(long = "log-y", help = "Logarithmic Y axis")]
    log_y: bool,

    #[arg(long = "line", help = "Connect the points of each panel")]
    line: bool,

    #[arg(short = 't', long = "title", help = "Plot title")]
    title: Option<String>,

    #[arg(long = "x-label", help = "X-axis label (defaults to column name)")]
    x_label: Option<String>,

    #[arg(long = "y-label", help = "Y-axis label (defaults to column name)")]
    y_label: Option<String>,

    #[arg(long = "width", default_value = "800", help = "Output width in pixels")]
    width: u32,

    #[arg(long = "height", default_value = "600", help = "Output height in pixels")]
    height: u32,

    #[arg(short = 'v', action = clap::ArgAction::Count, help = "More diagnostics (repeatable)")]
    verbose: u8,
}

struct Mapped {
    aes: Aes,
    title: String,
    column: Column,
}

struct Facet {
    labels: Vec<String>,
    codes: Vec<usize>,
}

fn facet(data: &CsvData, column: Option<&str>) -> Result<Facet> {
    let Some(column) = column else {
        return Ok(Facet {
            labels: vec![String::new()],
            codes: vec![0; data.rows.len()],
        });
    };
    let selector = csv_reader::parse_column_selector(column);
    let (_, raw) = csv_reader::extract_column_as_string(data, selector)?;
    let (levels, codes) = csv_reader::levels(&raw);

    let numeric: Option<Vec<f64>> = raw.iter().map(|s| s.trim().parse::<f64>().ok()).collect();
    match numeric {
        Some(values) if levels.len() > MAX_FACET_LEVELS => {
            let mut p = Partitioner::new(FACET_PARTITIONS);
            p.learn(&values);
            Ok(Facet {
                labels: p.labels(),
                codes: values.iter().map(|&v| p.index(v).unwrap_or(0)).collect(),
            })
        }
        _ => Ok(Facet {
            labels: levels,
            codes,
        }),
    }
}

fn mapped_columns(args: &Args, data: &CsvData) -> Result<Vec<Mapped>> {
    let requested = [
        (Aes::Color, "color", &args.color),
        (Aes::Size, "size", &args.size),
        (Aes::Shape, "shape", &args.shape),
        (Aes::Alpha, "alpha", &args.alpha),
    ];
    let mut mapped = Vec::new();
    for (aes, label, column) in requested {
        let Some(column) = column else {
            continue;
        };
        let selector = csv_reader::parse_column_selector(column);
        let (title, column) = csv_reader::extract_mapped_column(data, selector)
            .with_context(|| format!("Failed to extract {} column", label))?;
        mapped.push(Mapped { aes, title, column });
    }
    Ok(mapped)
}

fn configure_scale(plot: &mut Plot, m: &Mapped) {
    let scale = plot.scale_mut(m.aes);
    scale.title = m.title.clone();
    if let Column::Categorical { levels, .. } = &m.column {
        scale.scale_type = ScaleType::Discrete;
        scale.ticker = Some(Ticker::Manual(
            levels
                .iter()
                .enumerate()
                .map(|(i, l)| Tick::major(i as f64, l.clone()))
                .collect(),
        ));
    }
}

// The aesthetics of the points with the given row indices.
fn cell_aesthetics(rows: &[usize], mapped: &[Mapped]) -> Aesthetics {
    let mut aes = Aesthetics::new();
    for m in mapped {
        let all = m.column.values();
        let vals: Vec<f64> = rows.iter().map(|&i| all[i]).collect();
        aes = match m.aes {
            Aes::Color => aes.color(move |k| vals[k]),
            Aes::Size => aes.size(move |k| vals[k]),
            Aes::Shape => aes.shape(move |k| vals[k].round() as i64),
            Aes::Alpha => aes.alpha(move |k| vals[k]),
            _ => aes,
        };
    }
    aes
}

fn build_plot(args: &Args, data: &CsvData) -> Result<Plot> {
    let x_selector = csv_reader::parse_column_selector(&args.x_column);
    let (x_col_name, x_values) = csv_reader::extract_column(data, x_selector)
        .context("Failed to extract X column")?;

    let y_selector = csv_reader::parse_column_selector(&args.y_column);
    let (y_col_name, y_values) = csv_reader::extract_column(data, y_selector)
        .context("Failed to extract Y column")?;

    let rows = facet(data, args.facet_row.as_deref()).context("Failed to extract facet rows")?;
    let cols =
        facet(data, args.facet_col.as_deref()).context("Failed to extract facet columns")?;
    if rows.labels.is_empty() || cols.labels.is_empty() {
        bail!("Facet column has no values");
    }
    let mapped = mapped_columns(args, data)?;

    let mut plot = Plot::new(rows.labels.len(), cols.labels.len(), args.free_x, args.free_y);
    plot.title = args.title.clone().unwrap_or_default();
    plot.row_labels = rows.labels.clone();
    plot.col_labels = cols.labels.clone();
    plot.set_x_title(args.x_label.as_deref().unwrap_or(&x_col_name));
    plot.set_y_title(args.y_label.as_deref().unwrap_or(&y_col_name));
    if args.log_x {
        for col in 0..plot.cols {
            plot.x_scale_mut(col).set_log();
        }
    }
    if args.log_y {
        for row in 0..plot.rows {
            plot.y_scale_mut(row).set_log();
        }
    }
    for m in &mapped {
        configure_scale(&mut plot, m);
    }

    let mut cells = vec![vec![Vec::new(); plot.cols]; plot.rows];
    for i in 0..data.rows.len() {
        cells[rows.codes[i]][cols.codes[i]].push(i);
    }

    for (r, line) in cells.iter().enumerate() {
        for (c, idx) in line.iter().enumerate() {
            if idx.is_empty() {
                continue;
            }
            let xy: Vec<(f64, f64)> = idx.iter().map(|&i| (x_values[i], y_values[i])).collect();
            let aes = cell_aesthetics(idx, &mapped);
            if args.line {
                let line_aes = aes.only(&[Aes::Alpha, Aes::Color]);
                plot.add_geom(r, c, Line::new(xy.clone()).with_aes(line_aes));
            }
            plot.add_geom(r, c, Point::new(xy).with_aes(aes));
        }
    }

    Ok(plot)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut diag = WriterDiagnostics::new(io::stderr(), Verbosity::from_occurrences(args.verbose));

    let csv_data = csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;
    let mut plot = build_plot(&args, &csv_data)?;

    let rendered = render_png(args.width, args.height, |canvas| {
        plot.render(canvas, &mut diag)
    })
    .context("Failed to render plot")?;
    for err in &rendered.errors {
        diag.warn(&format!("drawing backend: {}", err));
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&rendered.png)
        .context("Failed to write PNG to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
