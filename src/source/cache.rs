use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Process-wide mapping from canonical absolute path to file contents.
///
/// A single mutex guards the map; `get`/`put` are the only critical
/// sections, and values handed back are cloned `Arc<str>`s so no reference
/// into the cache ever escapes the lock (the lifetime concern raised in
/// the design notes around "Concurrency of FileCache reads returning
/// references").
#[derive(Default)]
pub struct FileCache {
    entries: Mutex<HashMap<PathBuf, Arc<str>>>,
}

impl FileCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, path: &Path) -> Option<Arc<str>> {
        let guard = self.entries.lock().expect("FileCache mutex poisoned");
        guard.get(path).cloned()
    }

    /// Idempotent: last writer wins. Callers are expected to only ever put
    /// byte-identical contents for a given path.
    pub fn put(&self, path: PathBuf, contents: Arc<str>) {
        let mut guard = self.entries.lock().expect("FileCache mutex poisoned");
        guard.insert(path, contents);
    }

    /// Convenience used by the diagnostic renderer when a [`SourceReader`](
    /// crate::source::SourceReader) is not at hand: linearly scans the
    /// cached contents for the requested 1-based line.
    pub fn get_line(&self, path: &Path, line_no: u32) -> Option<String> {
        let contents = self.get(path)?;
        if line_no == 0 {
            return None;
        }
        contents.split('\n').nth((line_no - 1) as usize).map(|s| s.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("FileCache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl crate::diagnostics::LineSource for FileCache {
    fn line(&self, file_name: &str, line_no: u32) -> Option<String> {
        self.get_line(Path::new(file_name), line_no)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let cache = FileCache::new();
        let path = PathBuf::from("/tmp/does-not-matter.hlx");
        cache.put(path.clone(), Arc::from("let a = 1;\n"));
        assert_eq!(cache.get(&path).as_deref(), Some("let a = 1;\n"));
    }

    #[test]
    fn get_line_scans_cached_contents() {
        let cache = FileCache::new();
        let path = PathBuf::from("/tmp/multi.hlx");
        cache.put(path.clone(), Arc::from("one\ntwo\nthree"));
        assert_eq!(cache.get_line(&path, 2).as_deref(), Some("two"));
        assert_eq!(cache.get_line(&path, 99), None);
    }

    #[test]
    fn missing_entry_is_none() {
        let cache = FileCache::new();
        assert!(cache.get(Path::new("/nope")).is_none());
    }
}
