use std::fs::File;
use std::path::{Path, PathBuf};

use log::warn;
use memmap2::Mmap;

use super::error::SourceError;

/// Files at or below this size skip `mmap` entirely: the syscall overhead
/// of mapping dwarfs a single `read` for anything this small.
const SMALL_FILE_THRESHOLD: u64 = 16 * 1024;

/// Backing storage for a mapped source file.
///
/// Memory mapping is the fast path (matches the compiler's original
/// `T_FileReader`, which mmaps for "rapid file access"); a straight
/// read-into-buffer is used for empty files (mapping a zero-length file is
/// undefined on several platforms), files at or below
/// [`SMALL_FILE_THRESHOLD`], and whenever mapping itself fails.
enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Backing {
    fn bytes(&self) -> &[u8] {
        match self {
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Owned(buf) => &buf[..],
        }
    }
}

/// Memory-mapped, line-indexed access to one source file.
///
/// Immutable after construction: any number of threads may call
/// [`read_line`](SourceReader::read_line) / [`read_lines`](SourceReader::read_lines)
/// concurrently without external synchronization, because nothing mutates
/// the line index or the backing bytes after `open` returns.
pub struct SourceReader {
    file_name: String,
    backing: Backing,
    /// Byte offset of the start of each 1-based line, 0-indexed by `line - 1`.
    line_starts: Vec<u32>,
}

// SAFETY-relevant note (not unsafe code): `Mmap` and `Vec<u8>` are both
// `Send + Sync`, so `SourceReader` is automatically `Send + Sync` and no
// manual impl is required.

impl SourceReader {
    /// Opens `path`, maps it (falling back to a full read), and builds the
    /// line index in one sequential scan.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let metadata = file.metadata().map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let backing = if metadata.len() == 0 {
            Backing::Owned(Vec::new())
        } else if metadata.len() <= SMALL_FILE_THRESHOLD {
            let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Backing::Owned(bytes)
        } else {
            match Self::try_map(&file, path) {
                Some(mmap) => Backing::Mapped(mmap),
                None => {
                    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
                        path: path.to_path_buf(),
                        source,
                    })?;
                    Backing::Owned(bytes)
                }
            }
        };

        let line_starts = build_line_index(backing.bytes());

        Ok(SourceReader {
            file_name: path.to_string_lossy().into_owned(),
            backing,
            line_starts,
        })
    }

    #[cfg(unix)]
    fn try_map(file: &File, path: &Path) -> Option<Mmap> {
        match unsafe { Mmap::map(file) } {
            Ok(mmap) => {
                // Sequential scan (line index build) followed by random
                // access: advise the kernel accordingly.
                let _ = mmap.advise(memmap2::Advice::Sequential);
                Some(mmap)
            }
            Err(err) => {
                warn!("mmap failed for {}: {err}; falling back to a full read", path.display());
                None
            }
        }
    }

    #[cfg(not(unix))]
    fn try_map(file: &File, path: &Path) -> Option<Mmap> {
        match unsafe { Mmap::map(file) } {
            Ok(mmap) => Some(mmap),
            Err(err) => {
                warn!("mmap failed for {}: {err}; falling back to a full read", path.display());
                None
            }
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn total_lines(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Bytes of `line_no` (1-based), excluding the trailing newline.
    /// Out-of-range returns an empty slice.
    pub fn read_line(&self, line_no: u32) -> &str {
        if line_no == 0 || line_no > self.total_lines() {
            return "";
        }
        let (start, end) = self.line_bounds(line_no);
        std::str::from_utf8(&self.backing.bytes()[start..end]).unwrap_or("")
    }

    /// A contiguous slice covering `count` lines starting at `start_line`,
    /// each separated by a single newline. Clips to the available range.
    pub fn read_lines(&self, start_line: u32, count: u32) -> String {
        if start_line == 0 || count == 0 || start_line > self.total_lines() {
            return String::new();
        }
        let last_line = (start_line + count - 1).min(self.total_lines());
        (start_line..=last_line)
            .map(|n| self.read_line(n))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn read_file(&self) -> &str {
        std::str::from_utf8(self.backing.bytes()).unwrap_or("")
    }

    fn line_bounds(&self, line_no: u32) -> (usize, usize) {
        let idx = (line_no - 1) as usize;
        let start = self.line_starts[idx] as usize;
        let end = if idx + 1 < self.line_starts.len() {
            self.line_starts[idx + 1] as usize - 1
        } else {
            let bytes = self.backing.bytes();
            if bytes.last() == Some(&b'\n') {
                bytes.len() - 1
            } else {
                bytes.len()
            }
        };
        (start, end)
    }
}

/// Scans `blob` once, recording the byte offset each 1-based line begins at.
fn build_line_index(blob: &[u8]) -> Vec<u32> {
    if blob.is_empty() {
        return Vec::new();
    }

    let newline_count = blob.iter().filter(|&&b| b == b'\n').count();
    let ends_with_newline = blob.last() == Some(&b'\n');
    let total_lines = if ends_with_newline {
        newline_count
    } else {
        newline_count + 1
    };

    let mut starts = Vec::with_capacity(total_lines);
    starts.push(0u32);
    for (i, &b) in blob.iter().enumerate() {
        if b == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts.truncate(total_lines);
    starts
}

impl crate::diagnostics::LineSource for SourceReader {
    fn line(&self, file_name: &str, line_no: u32) -> Option<String> {
        if file_name != self.file_name() || line_no == 0 || line_no > self.total_lines() {
            return None;
        }
        Some(self.read_line(line_no).to_string())
    }
}

/// Canonicalizes `path` the way the core expects paths to compare: absolute,
/// normalized. Falls back to the original path if canonicalization fails
/// (e.g. the file does not exist yet).
pub fn canonical_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
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
    fn empty_file_has_zero_lines() {
        let f = write_temp("");
        let reader = SourceReader::open(f.path()).unwrap();
        assert_eq!(reader.total_lines(), 0);
        assert_eq!(reader.read_line(1), "");
    }

    #[test]
    fn trailing_newline_does_not_add_phantom_line() {
        let f = write_temp("a\nb\n");
        let reader = SourceReader::open(f.path()).unwrap();
        assert_eq!(reader.total_lines(), 2);
        assert_eq!(reader.read_line(1), "a");
        assert_eq!(reader.read_line(2), "b");
    }

    #[test]
    fn missing_trailing_newline_counts_last_line() {
        let f = write_temp("a\nb");
        let reader = SourceReader::open(f.path()).unwrap();
        assert_eq!(reader.total_lines(), 2);
        assert_eq!(reader.read_line(2), "b");
    }

    #[test]
    fn read_lines_clips_to_available_range() {
        let f = write_temp("one\ntwo\nthree\n");
        let reader = SourceReader::open(f.path()).unwrap();
        assert_eq!(reader.read_lines(2, 10), "two\nthree");
    }

    #[test]
    fn out_of_range_line_is_empty() {
        let f = write_temp("only\n");
        let reader = SourceReader::open(f.path()).unwrap();
        assert_eq!(reader.read_line(5), "");
    }

    #[test]
    fn read_file_returns_whole_blob() {
        let f = write_temp("whole\nfile\n");
        let reader = SourceReader::open(f.path()).unwrap();
        assert_eq!(reader.read_file(), "whole\nfile\n");
    }

    #[test]
    fn last_line_excludes_trailing_newline_even_when_larger_than_small_file_threshold() {
        let mut contents = String::new();
        for _ in 0..2000 {
            contents.push_str("line of filler text to cross the small-file threshold\n");
        }
        contents.push_str("final\n");
        let f = write_temp(&contents);
        let reader = SourceReader::open(f.path()).unwrap();
        assert_eq!(reader.read_line(reader.total_lines()), "final");
    }

    #[test]
    fn small_file_stays_under_threshold_and_still_parses_lines_correctly() {
        let f = write_temp("a\nb\n");
        let metadata = std::fs::metadata(f.path()).unwrap();
        assert!(metadata.len() <= SMALL_FILE_THRESHOLD);
        let reader = SourceReader::open(f.path()).unwrap();
        assert_eq!(reader.read_line(1), "a");
        assert_eq!(reader.read_line(2), "b");
    }
}
