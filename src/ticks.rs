// Tick generation for axes and legends

/// A single tick mark. Minor ticks carry no label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
    pub minor: bool,
}

impl Tick {
    pub fn major(value: f64, label: impl Into<String>) -> Self {
        Tick {
            value,
            label: label.into(),
            minor: false,
        }
    }

    pub fn minor(value: f64) -> Self {
        Tick {
            value,
            label: String::new(),
            minor: true,
        }
    }
}

/// Strategy used to place ticks on an interval.
#[derive(Debug, Clone, PartialEq)]
pub enum Ticker {
    /// Roughly `n` ticks on 1, 2 or 5 times a power of ten.
    Nice(usize),
    /// Major ticks at powers of ten, minor ticks at 2..9 times those.
    Log,
    /// One tick per integer.
    Discrete,
    /// Exactly the given ticks.
    Manual(Vec<Tick>),
}

impl Ticker {
    /// Generates ticks covering `[min, max]`.
    pub fn ticks(&self, min: f64, max: f64) -> Vec<Tick> {
        if !min.is_finite() || !max.is_finite() {
            return Vec::new();
        }
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        match self {
            Ticker::Nice(n) => nice_ticks(min, max, *n),
            Ticker::Log => log_ticks(min, max),
            Ticker::Discrete => discrete_ticks(min, max),
            Ticker::Manual(ticks) => ticks.clone(),
        }
    }
}

fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<Tick> {
    if count == 0 {
        return Vec::new();
    }
    if min == max {
        return vec![Tick::major(min, format_value(min, 0.0))];
    }

    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return vec![
            Tick::major(min, format_value(min, 0.0)),
            Tick::major(max, format_value(max, 0.0)),
        ];
    }

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last)
        .map(|k| {
            let value = k as f64 * step;
            // Avoid printing "-0".
            let value = if value == 0.0 { 0.0 } else { value };
            Tick::major(value, format_value(value, step))
        })
        .collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

fn log_ticks(min: f64, max: f64) -> Vec<Tick> {
    if min <= 0.0 {
        return Vec::new();
    }
    let lo = min.log10().floor() as i32;
    let hi = max.log10().ceil() as i32;

    let mut ticks = Vec::new();
    for exp in lo..=hi {
        let decade = 10_f64.powi(exp);
        if decade >= min && decade <= max {
            ticks.push(Tick::major(decade, format_value(decade, decade)));
        }
        for m in 2..10 {
            let v = m as f64 * decade;
            if v >= min && v <= max {
                ticks.push(Tick::minor(v));
            }
        }
    }
    ticks
}

fn discrete_ticks(min: f64, max: f64) -> Vec<Tick> {
    let first = min.ceil() as i64;
    let last = max.floor() as i64;
    (first..=last)
        .map(|v| Tick::major(v as f64, v.to_string()))
        .collect()
}

/// Formats a tick value with as many decimals as the step requires.
fn format_value(value: f64, step: f64) -> String {
    if value != 0.0 && (value.abs() >= 1e6 || value.abs() < 1e-4) {
        return format!("{:e}", value);
    }
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    format!("{:.*}", decimals, value)
}
