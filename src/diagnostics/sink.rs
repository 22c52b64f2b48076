use std::io::Write;
use std::sync::Mutex;

use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

use super::{Diagnostic, Level, LINES_TO_SHOW};

/// Default cap on collected ERR diagnostics before the sink promotes the
/// run to FATAL (spec §4.6: "Multiple ERRs are collected up to a
/// configurable cap; hitting the cap promotes to FATAL").
const DEFAULT_ERROR_BUDGET: usize = 64;

struct State {
    entries: Vec<Diagnostic>,
    error_count: usize,
    fatal: bool,
}

/// Collects diagnostics and renders them with source context.
///
/// Internally synchronized: appends happen under one mutex so diagnostics
/// from a single file stay in source order and rendering to stderr never
/// interleaves the frames of two different diagnostics.
pub struct DiagnosticSink {
    state: Mutex<State>,
    error_budget: usize,
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_BUDGET)
    }
}

impl DiagnosticSink {
    pub fn new(error_budget: usize) -> Self {
        DiagnosticSink {
            state: Mutex::new(State {
                entries: Vec::new(),
                error_count: 0,
                fatal: false,
            }),
            error_budget,
        }
    }

    /// Appends a diagnostic. Returns `true` if the pipeline must abort at
    /// its current boundary (the diagnostic was FATAL, or the error budget
    /// was just exhausted and the sink promoted itself to FATAL).
    pub fn report(&self, diagnostic: Diagnostic) -> bool {
        let mut state = self.state.lock().expect("DiagnosticSink mutex poisoned");
        let is_fatal = diagnostic.level == Level::Fatal;
        if diagnostic.level == Level::Err {
            state.error_count += 1;
        }
        state.entries.push(diagnostic);

        if is_fatal {
            state.fatal = true;
        } else if state.error_count >= self.error_budget {
            state.fatal = true;
        }
        state.fatal
    }

    pub fn is_fatal(&self) -> bool {
        self.state.lock().expect("DiagnosticSink mutex poisoned").fatal
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().expect("DiagnosticSink mutex poisoned").entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.state.lock().expect("DiagnosticSink mutex poisoned").entries.len()
    }

    /// Snapshot of all diagnostics collected so far, in insertion order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.state.lock().expect("DiagnosticSink mutex poisoned").entries.clone()
    }

    /// Renders every collected diagnostic to `stream`, resolving source
    /// context through `source`. A single write lock on `stream` (its
    /// caller-provided `StandardStream`) keeps two diagnostics' frames from
    /// interleaving when called from multiple threads.
    pub fn render_all(&self, stream: &mut StandardStream, source: &dyn LineSource) -> std::io::Result<()> {
        for diagnostic in self.diagnostics() {
            render_one(stream, &diagnostic, source)?;
        }
        Ok(())
    }
}

/// Abstracts over where a diagnostic fetches its surrounding source lines
/// from: a single file's [`SourceReader`](crate::source::SourceReader) or
/// the process-wide [`FileCache`](crate::source::FileCache).
pub trait LineSource {
    fn line(&self, file_name: &str, line_no: u32) -> Option<String>;
}

fn level_color(level: Level) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_bold(true);
    match level {
        Level::Note => {
            spec.set_fg(Some(Color::Cyan));
        }
        Level::Warn => {
            spec.set_fg(Some(Color::Yellow));
        }
        Level::Err => {
            spec.set_fg(Some(Color::Red));
        }
        Level::Fatal => {
            // termcolor has no blink attribute; bold + intense red is the
            // closest terminal-safe approximation (recorded in DESIGN.md).
            spec.set_fg(Some(Color::Red)).set_intense(true);
        }
    }
    spec
}

fn render_one(
    stream: &mut StandardStream,
    diagnostic: &Diagnostic,
    source: &dyn LineSource,
) -> std::io::Result<()> {
    stream.set_color(&level_color(diagnostic.level))?;
    write!(stream, "{}", diagnostic.level)?;
    stream.reset()?;
    write!(stream, ": {}", diagnostic.message)?;

    if diagnostic.is_synthetic_location() {
        writeln!(stream, " ({})", diagnostic.file_name)?;
        return print_fix(stream, diagnostic);
    }

    let mut green = ColorSpec::new();
    green.set_fg(Some(Color::Green));
    write!(stream, " at ")?;
    stream.set_color(&green)?;
    write!(stream, "{}", diagnostic.file_name)?;
    stream.reset()?;
    writeln!(stream, ":{}:{}", diagnostic.line, diagnostic.column)?;

    print_context(stream, diagnostic, source)?;
    print_fix(stream, diagnostic)
}

fn print_context(
    stream: &mut StandardStream,
    diagnostic: &Diagnostic,
    source: &dyn LineSource,
) -> std::io::Result<()> {
    let half = LINES_TO_SHOW / 2;
    let start = diagnostic.line.saturating_sub(half).max(1);

    for line_no in start..start + LINES_TO_SHOW {
        let Some(text) = source.line(&diagnostic.file_name, line_no) else {
            continue;
        };
        if line_no == diagnostic.line {
            print_error_line(stream, &text, diagnostic)?;
        } else {
            writeln!(stream, "{line_no:>4} | {text}")?;
        }
    }
    writeln!(stream)
}

fn print_error_line(
    stream: &mut StandardStream,
    line: &str,
    diagnostic: &Diagnostic,
) -> std::io::Result<()> {
    let col = diagnostic.column.saturating_sub(1) as usize;
    let col = col.min(line.len());
    let span_end = (col + diagnostic.span_length as usize).min(line.len());

    writeln!(stream, "{:>4} | {}", diagnostic.line, line)?;
    write!(stream, "     | {}", " ".repeat(col))?;

    let mut red = ColorSpec::new();
    red.set_fg(Some(Color::Red));
    stream.set_color(&red)?;
    write!(stream, "{}", "^".repeat((span_end - col).max(1)))?;
    stream.reset()?;
    writeln!(stream)
}

fn print_fix(stream: &mut StandardStream, diagnostic: &Diagnostic) -> std::io::Result<()> {
    match &diagnostic.fix {
        Some(fix) => {
            let mut green = ColorSpec::new();
            green.set_fg(Some(Color::Green));
            stream.set_color(&green)?;
            write!(stream, "  fix")?;
            stream.reset()?;
            writeln!(stream, ": {fix}")
        }
        None => writeln!(stream),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoSource;
    impl LineSource for NoSource {
        fn line(&self, _file_name: &str, _line_no: u32) -> Option<String> {
            None
        }
    }

    #[test]
    fn fatal_diagnostic_aborts_immediately() {
        let sink = DiagnosticSink::default();
        let aborted = sink.report(Diagnostic::new(Level::Fatal, "a.hlx", 1, 1, 1, "boom"));
        assert!(aborted);
        assert!(sink.is_fatal());
    }

    #[test]
    fn error_budget_promotes_to_fatal() {
        let sink = DiagnosticSink::new(2);
        assert!(!sink.report(Diagnostic::new(Level::Err, "a.hlx", 1, 1, 1, "e1")));
        assert!(sink.report(Diagnostic::new(Level::Err, "a.hlx", 2, 1, 1, "e2")));
        assert!(sink.is_fatal());
    }

    #[test]
    fn diagnostics_preserve_insertion_order() {
        let sink = DiagnosticSink::default();
        sink.report(Diagnostic::new(Level::Note, "a.hlx", 1, 1, 1, "first"));
        sink.report(Diagnostic::new(Level::Warn, "a.hlx", 2, 1, 1, "second"));
        let entries = sink.diagnostics();
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].message, "second");
    }

    #[test]
    fn render_synthetic_location_skips_code_frame() {
        let sink = DiagnosticSink::default();
        sink.report(Diagnostic::new(Level::Err, "<repl>", 1, 1, 1, "oops"));
        let mut stream = StandardStream::stdout(termcolor::ColorChoice::Never);
        sink.render_all(&mut stream, &NoSource).unwrap();
    }
}
