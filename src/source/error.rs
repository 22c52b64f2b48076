use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors produced while opening or mapping a source file.
///
/// Mirrors the `IoError` branch of the core's error taxonomy: these surface
/// into the [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) at the
/// boundary where the file name is still in scope.
#[derive(Debug)]
pub enum SourceError {
    NotFound(PathBuf),
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound(path) => write!(f, "file not found: {}", path.display()),
            SourceError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::NotFound(_) => None,
            SourceError::Io { source, .. } => Some(source),
        }
    }
}
