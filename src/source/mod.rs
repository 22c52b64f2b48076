//! Source access: memory-mapped line-indexed reading and the process-wide
//! file cache that memoizes contents across a compilation unit.

mod cache;
mod error;
mod reader;

pub use cache::FileCache;
pub use error::SourceError;
pub use reader::{canonical_path, SourceReader};
