// Diagnostic messages emitted while preparing and drawing a plot

use std::io::Write;

/// How chatty the render pipeline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Warnings only.
    #[default]
    Quiet,
    /// High level progress.
    Info,
    /// Scale dumps after every pipeline phase.
    Detail,
    /// Everything, down to single geoms.
    Trace,
}

impl Verbosity {
    /// Maps a count of `-v` flags to a level.
    pub fn from_occurrences(n: u8) -> Self {
        match n {
            0 => Verbosity::Quiet,
            1 => Verbosity::Info,
            2 => Verbosity::Detail,
            _ => Verbosity::Trace,
        }
    }
}

/// Sink for warnings and debug output of the render pipeline.
pub trait Diagnostics {
    /// A recoverable problem, always reported.
    fn warn(&mut self, msg: &str);

    /// Debug output, only reported if `level <= self.verbosity()`.
    fn debug(&mut self, level: Verbosity, msg: &str);

    fn verbosity(&self) -> Verbosity;

    fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Quiet && level <= self.verbosity()
    }
}

/// Forwards to the `log` facade. Installing a logger is up to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics {
    pub verbosity: Verbosity,
}

impl Diagnostics for LogDiagnostics {
    fn warn(&mut self, msg: &str) {
        log::warn!(target: "gramfacet", "{}", msg);
    }

    fn debug(&mut self, level: Verbosity, msg: &str) {
        if !self.enabled(level) {
            return;
        }
        match level {
            Verbosity::Quiet => {}
            Verbosity::Info => log::info!(target: "gramfacet", "{}", msg),
            Verbosity::Detail => log::debug!(target: "gramfacet", "{}", msg),
            Verbosity::Trace => log::trace!(target: "gramfacet", "{}", msg),
        }
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

/// Writes one line per message, e.g. to stderr.
#[derive(Debug)]
pub struct WriterDiagnostics<W: Write> {
    writer: W,
    verbosity: Verbosity,
}

impl<W: Write> WriterDiagnostics<W> {
    pub fn new(writer: W, verbosity: Verbosity) -> Self {
        WriterDiagnostics { writer, verbosity }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Diagnostics for WriterDiagnostics<W> {
    fn warn(&mut self, msg: &str) {
        // Diagnostics must never abort a render.
        let _ = writeln!(self.writer, "warning: {}", msg);
    }

    fn debug(&mut self, level: Verbosity, msg: &str) {
        if self.enabled(level) {
            let _ = writeln!(self.writer, "{}", msg);
        }
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

/// Keeps all messages in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectedDiagnostics {
    pub verbosity: Verbosity,
    pub warnings: Vec<String>,
    pub messages: Vec<(Verbosity, String)>,
}

impl CollectedDiagnostics {
    pub fn new(verbosity: Verbosity) -> Self {
        CollectedDiagnostics {
            verbosity,
            ..Default::default()
        }
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn warn(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn debug(&mut self, level: Verbosity, msg: &str) {
        if self.enabled(level) {
            self.messages.push((level, msg.to_string()));
        }
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_occurrences() {
        assert_eq!(Verbosity::from_occurrences(0), Verbosity::Quiet);
        assert_eq!(Verbosity::from_occurrences(2), Verbosity::Detail);
        assert_eq!(Verbosity::from_occurrences(9), Verbosity::Trace);
    }

    #[test]
    fn test_writer_gates_on_verbosity() {
        let mut diag = WriterDiagnostics::new(Vec::new(), Verbosity::Info);
        diag.debug(Verbosity::Info, "shown");
        diag.debug(Verbosity::Detail, "hidden");
        diag.warn("careful");
        let out = String::from_utf8(diag.into_inner()).unwrap();
        assert_eq!(out, "shown\nwarning: careful\n");
    }

    #[test]
    fn test_collected_keeps_warnings_when_quiet() {
        let mut diag = CollectedDiagnostics::default();
        diag.warn("w");
        diag.debug(Verbosity::Info, "i");
        assert_eq!(diag.warnings, vec!["w".to_string()]);
        assert!(diag.messages.is_empty());
    }

    #[test]
    fn test_log_diagnostics_without_logger() {
        let mut diag = LogDiagnostics {
            verbosity: Verbosity::Trace,
        };
        diag.warn("nobody listens");
        diag.debug(Verbosity::Trace, "still fine");
        assert!(diag.enabled(Verbosity::Detail));
    }
}
